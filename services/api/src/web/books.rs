//! services/api/src/web/books.rs
//!
//! Contains the Axum handlers for the book endpoints and the master
//! definition for the OpenAPI specification.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, OpenApi, ToSchema};

use bookstore_core::domain::{Book, BookDraft, BookFilter, BookKey, BookPage, PageOptions};

use crate::error::ApiError;
use crate::web::envelope::Envelope;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::validate::{checked_body, checked_query, FieldErrors};

/// Fixed page size for the search endpoint.
const SEARCH_PAGE_SIZE: u32 = 20;

/// Default and maximum page size for the list endpoint.
const LIST_PAGE_LIMIT: u32 = 100;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books,
        search_books,
        add_book,
        update_book,
        delete_book,
    ),
    components(
        schemas(BookDto, BookPageDto, BookPayload, UpdateBookPayload, DeleteBookPayload)
    ),
    tags(
        (name = "Online Bookstore API", description = "CRUD endpoints for the book catalogue. \
         Every JSON body is wrapped in the uniform envelope \
         {hasError, statusCode, message, data}.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Payload and Response Structs
//=========================================================================================

/// Body for creating a book.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub isbn: String,
    pub price: f64,
    pub author: String,
    pub category: String,
    pub review: Option<String>,
}

impl BookPayload {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("title", &self.title);
        errors.require_non_empty("isbn", &self.isbn);
        errors.require_non_empty("author", &self.author);
        errors.require_non_empty("category", &self.category);
        errors.require_non_negative("price", self.price);
        errors.finish()
    }

    fn into_draft(self) -> BookDraft {
        BookDraft {
            title: self.title,
            isbn: self.isbn,
            price: self.price,
            author: self.author,
            category: self.category,
            review: self.review,
        }
    }
}

/// Body for updating a book. The target resolves by `id` when present,
/// else by `isbn`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookPayload {
    pub id: Option<String>,
    pub title: String,
    pub isbn: String,
    pub price: f64,
    pub author: String,
    pub category: String,
    pub review: Option<String>,
}

impl UpdateBookPayload {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("title", &self.title);
        errors.require_non_empty("isbn", &self.isbn);
        errors.require_non_empty("author", &self.author);
        errors.require_non_empty("category", &self.category);
        errors.require_non_negative("price", self.price);
        errors.finish()
    }

    fn into_parts(self) -> (Option<BookKey>, BookDraft) {
        let key = BookKey::resolve(non_empty(self.id), Some(self.isbn.clone()));
        let draft = BookDraft {
            title: self.title,
            isbn: self.isbn,
            price: self.price,
            author: self.author,
            category: self.category,
            review: self.review,
        };
        (key, draft)
    }
}

/// Body for deleting a book, by `id` or `isbn`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBookPayload {
    pub id: Option<String>,
    pub isbn: Option<String>,
}

/// Query parameters for the paginated list.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBooksQuery {
    /// Results per page, capped at 100. Defaults to 100.
    pub limit: Option<u32>,
    /// Page number, starting at 1. Defaults to 1.
    pub page: Option<u32>,
}

/// Query parameters for the single-criterion search. The first present
/// parameter in declaration order decides the filter.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SearchBooksQuery {
    pub id: Option<String>,
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
}

/// A book as serialized to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: String,
    pub title: String,
    pub isbn: String,
    pub price: f64,
    pub author: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title,
            isbn: book.isbn,
            price: book.price,
            author: book.author,
            category: book.category,
            review: book.review,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// One page of catalogue results.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPageDto {
    pub total_book: u64,
    pub books: Vec<BookDto>,
    pub total_pages: u64,
}

impl From<BookPage> for BookPageDto {
    fn from(page: BookPage) -> Self {
        Self {
            total_book: page.total_books,
            books: page.books.into_iter().map(BookDto::from).collect(),
            total_pages: page.total_pages,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /book - paginated catalogue list, newest first.
#[utoipa::path(
    get,
    path = "/book",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "One page of books, in the standard envelope", body = BookPageDto),
        (status = 400, description = "Malformed query parameters")
    )
)]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListBooksQuery>, QueryRejection>,
) -> Result<Envelope<BookPageDto>, ApiError> {
    let query = checked_query(query)?;

    let limit = query.limit.unwrap_or(LIST_PAGE_LIMIT).min(LIST_PAGE_LIMIT);
    let page = query.page.unwrap_or(1);

    let data = state
        .books
        .get_books(&BookFilter::All, &PageOptions::new(limit, page))
        .await?;

    Ok(Envelope::ok(data.into()))
}

/// GET /book/search - single-criterion search with a fixed page size of 20.
#[utoipa::path(
    get,
    path = "/book/search",
    params(SearchBooksQuery),
    responses(
        (status = 200, description = "Matching books, in the standard envelope", body = BookPageDto),
        (status = 400, description = "Malformed query parameters")
    )
)]
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchBooksQuery>, QueryRejection>,
) -> Result<Envelope<BookPageDto>, ApiError> {
    let query = checked_query(query)?;

    let page = query.page.unwrap_or(1);
    let filter = build_search_filter(query);

    let data = state
        .books
        .get_books(&filter, &PageOptions::new(SEARCH_PAGE_SIZE, page))
        .await?;

    Ok(Envelope::ok(data.into()))
}

/// POST /book - create a book. Requires a bearer credential.
#[utoipa::path(
    post,
    path = "/book",
    request_body = BookPayload,
    responses(
        (status = 200, description = "Created; the envelope data is an empty object"),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Missing or invalid credential"),
        (status = 409, description = "A book with this isbn already exists")
    )
)]
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Envelope<serde_json::Value>, ApiError> {
    let payload = checked_body(payload)?;
    payload.validate()?;

    let isbn = payload.isbn.clone();
    state.books.add_book(payload.into_draft()).await?;
    info!(user = %user.subject, %isbn, "book created");

    Ok(Envelope::ok(serde_json::json!({})))
}

/// PUT /book - overwrite a book's mutable fields. Requires a bearer credential.
#[utoipa::path(
    put,
    path = "/book",
    request_body = UpdateBookPayload,
    responses(
        (status = 200, description = "Updated; the envelope data is an empty object"),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Missing or invalid credential"),
        (status = 404, description = "No book matches the supplied identifier")
    )
)]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpdateBookPayload>, JsonRejection>,
) -> Result<Envelope<serde_json::Value>, ApiError> {
    let payload = checked_body(payload)?;
    payload.validate()?;

    let (key, draft) = payload.into_parts();
    state.books.update_book(key, draft).await?;
    info!(user = %user.subject, "book updated");

    Ok(Envelope::ok(serde_json::json!({})))
}

/// DELETE /book - remove a book by id or isbn. Requires a bearer credential.
#[utoipa::path(
    delete,
    path = "/book",
    request_body = DeleteBookPayload,
    responses(
        (status = 200, description = "Deleted; the envelope data is an empty object"),
        (status = 401, description = "Missing or invalid credential"),
        (status = 404, description = "No book matches the supplied identifier")
    )
)]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<DeleteBookPayload>, JsonRejection>,
) -> Result<Envelope<serde_json::Value>, ApiError> {
    let payload = checked_body(payload)?;

    let key = BookKey::resolve(non_empty(payload.id), non_empty(payload.isbn));
    state.books.delete_book(key).await?;
    info!(user = %user.subject, "book deleted");

    Ok(Envelope::ok(serde_json::json!({})))
}

//=========================================================================================
// Filter construction
//=========================================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Chooses exactly one filter clause, first-match-wins:
/// id > title text > isbn > author > category > minPrice > maxPrice.
/// Empty-string parameters count as absent.
fn build_search_filter(query: SearchBooksQuery) -> BookFilter {
    if let Some(id) = non_empty(query.id) {
        BookFilter::Id(id)
    } else if let Some(title) = non_empty(query.title) {
        BookFilter::TitleText(title)
    } else if let Some(isbn) = non_empty(query.isbn) {
        BookFilter::Isbn(isbn)
    } else if let Some(author) = non_empty(query.author) {
        BookFilter::Author(author)
    } else if let Some(category) = non_empty(query.category) {
        BookFilter::Category(category)
    } else if let Some(min) = query.min_price {
        BookFilter::PriceAbove(min)
    } else if let Some(max) = query.max_price {
        BookFilter::PriceBelow(max)
    } else {
        BookFilter::All
    }
}
