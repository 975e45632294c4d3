//! services/api/src/adapters/memory.rs
//!
//! An in-memory implementation of the `BookStore` port. Used by the test
//! suite and useful for running the service without a database. The whole
//! catalogue lives behind one mutex, so every operation is atomic by
//! construction, matching the conditional-write contract of the port.

use std::sync::Mutex;

use async_trait::async_trait;
use bookstore_core::domain::{Book, BookDraft, BookFilter, BookKey, BookPage, PageOptions};
use bookstore_core::ports::{BookStore, StoreError, StoreResult};
use chrono::Utc;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryBookStore {
    books: Mutex<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of books currently stored.
    pub fn len(&self) -> usize {
        self.books.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The oldest stored book, if any. Convenient for tests.
    pub fn first_book(&self) -> Option<Book> {
        self.books.lock().unwrap().first().cloned()
    }
}

fn matches(book: &Book, filter: &BookFilter) -> bool {
    match filter {
        BookFilter::All => true,
        BookFilter::Id(id) => book.id.to_string() == *id,
        // Stands in for the database's full-text title index.
        BookFilter::TitleText(text) => book
            .title
            .to_lowercase()
            .contains(&text.to_lowercase()),
        BookFilter::Isbn(isbn) => book.isbn == *isbn,
        BookFilter::Author(author) => book.author == *author,
        BookFilter::Category(category) => book.category == *category,
        BookFilter::PriceAbove(min) => book.price > *min,
        BookFilter::PriceBelow(max) => book.price < *max,
    }
}

fn matches_key(book: &Book, key: &BookKey) -> bool {
    match key {
        BookKey::Id(id) => book.id.to_string() == *id,
        BookKey::Isbn(isbn) => book.isbn == *isbn,
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert_book(&self, draft: BookDraft) -> StoreResult<Book> {
        let mut books = self.books.lock().unwrap();
        if books.iter().any(|b| b.isbn == draft.isbn) {
            return Err(StoreError::Duplicate(draft.isbn));
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: draft.title,
            isbn: draft.isbn,
            price: draft.price,
            author: draft.author,
            category: draft.category,
            review: draft.review,
            created_at: now,
            updated_at: now,
        };
        books.push(book.clone());
        Ok(book)
    }

    async fn update_book(&self, key: &BookKey, draft: BookDraft) -> StoreResult<Book> {
        let mut books = self.books.lock().unwrap();

        if books
            .iter()
            .any(|b| b.isbn == draft.isbn && !matches_key(b, key))
        {
            return Err(StoreError::Duplicate(draft.isbn));
        }

        let book = books
            .iter_mut()
            .find(|b| matches_key(b, key))
            .ok_or_else(|| StoreError::NotFound(format!("{key:?}")))?;

        book.title = draft.title;
        book.isbn = draft.isbn;
        book.price = draft.price;
        book.author = draft.author;
        book.category = draft.category;
        book.review = draft.review;
        book.updated_at = Utc::now();
        Ok(book.clone())
    }

    async fn delete_book(&self, key: &BookKey) -> StoreResult<()> {
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|b| !matches_key(b, key));
        if books.len() == before {
            return Err(StoreError::NotFound(format!("{key:?}")));
        }
        Ok(())
    }

    async fn find_page(&self, filter: &BookFilter, options: &PageOptions) -> StoreResult<BookPage> {
        let books = self.books.lock().unwrap();

        // Newest first: insertion order reversed.
        let matching: Vec<Book> = books
            .iter()
            .rev()
            .filter(|b| matches(b, filter))
            .cloned()
            .collect();

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(options.offset() as usize)
            .take(options.limit as usize)
            .collect();

        Ok(BookPage::new(total, page, options.limit))
    }
}
