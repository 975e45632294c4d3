//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `BookStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Uniqueness and existence are enforced inside single statements
//! (`ON CONFLICT`, `UPDATE ... RETURNING`, `DELETE ... RETURNING`) so no
//! operation is ever a separate check followed by a write.

use async_trait::async_trait;
use bookstore_core::domain::{Book, BookDraft, BookFilter, BookKey, BookPage, PageOptions};
use bookstore_core::ports::{BookStore, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const BOOK_COLUMNS: &str = "id, title, isbn, price, author, category, review, created_at, updated_at";

/// A database adapter that implements the `BookStore` port.
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    /// Creates a new `PgBookStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct BookRecord {
    id: Uuid,
    title: String,
    isbn: String,
    price: f64,
    author: String,
    category: String,
    review: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookRecord {
    fn into_domain(self) -> Book {
        Book {
            id: self.id,
            title: self.title,
            isbn: self.isbn,
            price: self.price,
            author: self.author,
            category: self.category,
            review: self.review,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Maps a write error, surfacing unique-index violations as duplicates.
fn map_write_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return StoreError::Duplicate(db.message().to_string());
        }
    }
    StoreError::Unexpected(e.to_string())
}

fn unexpected(e: sqlx::Error) -> StoreError {
    StoreError::Unexpected(e.to_string())
}

type BookQuery<'q> =
    sqlx::query::QueryAs<'q, Postgres, BookRecord, sqlx::postgres::PgArguments>;

/// Binds the six mutable fields in the positional order shared by the insert
/// and update statements.
fn bind_draft<'q>(query: BookQuery<'q>, draft: &'q BookDraft) -> BookQuery<'q> {
    query
        .bind(&draft.title)
        .bind(&draft.isbn)
        .bind(draft.price)
        .bind(&draft.author)
        .bind(&draft.category)
        .bind(&draft.review)
}

/// Appends the WHERE clause for the single filter criterion. An `id` that is
/// not a valid UUID cannot match any row.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    match filter {
        BookFilter::All => {}
        BookFilter::Id(raw) => match Uuid::parse_str(raw) {
            Ok(id) => {
                qb.push(" WHERE id = ").push_bind(id);
            }
            Err(_) => {
                qb.push(" WHERE FALSE");
            }
        },
        BookFilter::TitleText(text) => {
            qb.push(" WHERE to_tsvector('english', title) @@ plainto_tsquery('english', ")
                .push_bind(text.clone())
                .push(")");
        }
        BookFilter::Isbn(isbn) => {
            qb.push(" WHERE isbn = ").push_bind(isbn.clone());
        }
        BookFilter::Author(author) => {
            qb.push(" WHERE author = ").push_bind(author.clone());
        }
        BookFilter::Category(category) => {
            qb.push(" WHERE category = ").push_bind(category.clone());
        }
        BookFilter::PriceAbove(min) => {
            qb.push(" WHERE price > ").push_bind(*min);
        }
        BookFilter::PriceBelow(max) => {
            qb.push(" WHERE price < ").push_bind(*max);
        }
    }
}

//=========================================================================================
// `BookStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookStore for PgBookStore {
    async fn insert_book(&self, draft: BookDraft) -> StoreResult<Book> {
        const INSERT: &str = "INSERT INTO books \
                 (title, isbn, price, author, category, review, id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (isbn) DO NOTHING \
             RETURNING id, title, isbn, price, author, category, review, created_at, updated_at";

        let record = bind_draft(sqlx::query_as(INSERT), &draft)
            .bind(Uuid::new_v4())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_err)?;

        // No row back means the conflict arm fired.
        record
            .map(BookRecord::into_domain)
            .ok_or_else(|| StoreError::Duplicate(draft.isbn.clone()))
    }

    async fn update_book(&self, key: &BookKey, draft: BookDraft) -> StoreResult<Book> {
        const UPDATE_BY_ID: &str = "UPDATE books \
             SET title = $1, isbn = $2, price = $3, author = $4, category = $5, review = $6, \
                 updated_at = now() \
             WHERE id = $7 \
             RETURNING id, title, isbn, price, author, category, review, created_at, updated_at";
        const UPDATE_BY_ISBN: &str = "UPDATE books \
             SET title = $1, isbn = $2, price = $3, author = $4, category = $5, review = $6, \
                 updated_at = now() \
             WHERE isbn = $7 \
             RETURNING id, title, isbn, price, author, category, review, created_at, updated_at";

        let record = match key {
            BookKey::Id(raw) => {
                let Ok(id) = Uuid::parse_str(raw) else {
                    return Err(StoreError::NotFound(raw.clone()));
                };
                bind_draft(sqlx::query_as(UPDATE_BY_ID), &draft)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
            }
            BookKey::Isbn(isbn) => bind_draft(sqlx::query_as(UPDATE_BY_ISBN), &draft)
                .bind(isbn.clone())
                .fetch_optional(&self.pool)
                .await,
        }
        .map_err(map_write_err)?;

        record
            .map(BookRecord::into_domain)
            .ok_or_else(|| StoreError::NotFound(format!("{key:?}")))
    }

    async fn delete_book(&self, key: &BookKey) -> StoreResult<()> {
        let deleted = match key {
            BookKey::Id(raw) => {
                let Ok(id) = Uuid::parse_str(raw) else {
                    return Err(StoreError::NotFound(raw.clone()));
                };
                sqlx::query_scalar::<_, Uuid>("DELETE FROM books WHERE id = $1 RETURNING id")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(unexpected)?
            }
            BookKey::Isbn(isbn) => {
                sqlx::query_scalar::<_, Uuid>("DELETE FROM books WHERE isbn = $1 RETURNING id")
                    .bind(isbn.clone())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(unexpected)?
            }
        };

        match deleted {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("{key:?}"))),
        }
    }

    async fn find_page(&self, filter: &BookFilter, options: &PageOptions) -> StoreResult<BookPage> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_filter(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;

        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {BOOK_COLUMNS} FROM books"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(options.limit))
            .push(" OFFSET ")
            .push_bind(options.offset() as i64);

        let records: Vec<BookRecord> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        let books = records.into_iter().map(BookRecord::into_domain).collect();
        Ok(BookPage::new(total as u64, books, options.limit))
    }
}
