//! crates/bookstore_core/src/domain.rs
//!
//! Defines the pure, core data structures for the bookstore.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single book in the catalogue.
#[derive(Debug, Clone)]
pub struct Book {
    /// Generated at creation, never reused or mutated afterwards.
    pub id: Uuid,
    pub title: String,
    /// Globally unique; enforced by the store's unique index.
    pub isbn: String,
    pub price: f64,
    pub author: String,
    pub category: String,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The mutable fields of a book, used for both create and update.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub title: String,
    pub isbn: String,
    pub price: f64,
    pub author: String,
    pub category: String,
    pub review: Option<String>,
}

/// Identifies the target of an update or delete.
///
/// The resolution rule: `id` takes priority over `isbn` whenever both are
/// supplied. The `id` is kept as the raw string the client sent; a string
/// that is not a valid identifier simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookKey {
    Id(String),
    Isbn(String),
}

impl BookKey {
    /// Applies the resolution rule to a pair of optional identifiers.
    /// Returns `None` when neither is present.
    pub fn resolve(id: Option<String>, isbn: Option<String>) -> Option<Self> {
        match (id, isbn) {
            (Some(id), _) => Some(BookKey::Id(id)),
            (None, Some(isbn)) => Some(BookKey::Isbn(isbn)),
            (None, None) => None,
        }
    }
}

/// Exactly one search clause, chosen by the caller with first-match-wins
/// precedence over the raw query parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum BookFilter {
    /// No clause; match everything.
    All,
    Id(String),
    /// Full-text match against the title index.
    TitleText(String),
    Isbn(String),
    Author(String),
    Category(String),
    /// `price > min`
    PriceAbove(f64),
    /// `price < max`
    PriceBelow(f64),
}

/// Pagination options for a catalogue query. Results are always sorted by
/// creation time, newest first.
#[derive(Debug, Clone, Copy)]
pub struct PageOptions {
    pub limit: u32,
    pub page: u32,
}

impl PageOptions {
    pub fn new(limit: u32, page: u32) -> Self {
        Self {
            limit: limit.max(1),
            page: page.max(1),
        }
    }

    /// Row offset of the first result on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of query results plus the totals the client needs to paginate.
#[derive(Debug, Clone)]
pub struct BookPage {
    pub total_books: u64,
    pub books: Vec<Book>,
    pub total_pages: u64,
}

impl BookPage {
    /// Builds a page from the matching rows and the overall match count.
    /// `total_pages` is `ceil(total / limit)`, zero when nothing matched.
    pub fn new(total_books: u64, books: Vec<Book>, limit: u32) -> Self {
        let limit = u64::from(limit.max(1));
        Self {
            total_books,
            books,
            total_pages: total_books.div_ceil(limit),
        }
    }
}
