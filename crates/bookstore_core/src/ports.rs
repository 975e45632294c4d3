//! crates/bookstore_core/src/ports.rs
//!
//! Defines the service contract (trait) for the bookstore's persistence.
//! This trait forms the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete store implementation.

use async_trait::async_trait;

use crate::domain::{Book, BookDraft, BookFilter, BookKey, BookPage, PageOptions};

/// A generic error type for all store operations.
/// This abstracts away the specific errors of the underlying database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint (the `isbn` index) rejected the write.
    #[error("Duplicate value: {0}")]
    Duplicate(String),
    /// The conditional write matched no record.
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected store error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence port for the book catalogue.
///
/// Every mutating operation is a single atomic conditional write: uniqueness
/// and existence are decided by the store in the same operation that performs
/// the mutation, never by a separate lookup beforehand. This closes the
/// check-then-act race a naive find-then-write sequence would have.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Inserts a new book, generating its `id` and timestamps.
    /// Fails with [`StoreError::Duplicate`] when the `isbn` is already taken.
    async fn insert_book(&self, draft: BookDraft) -> StoreResult<Book>;

    /// Overwrites all mutable fields of the book matching `key` in place.
    /// Fails with [`StoreError::NotFound`] when no record matches.
    async fn update_book(&self, key: &BookKey, draft: BookDraft) -> StoreResult<Book>;

    /// Removes the book matching `key`.
    /// Fails with [`StoreError::NotFound`] when no record matches.
    async fn delete_book(&self, key: &BookKey) -> StoreResult<()>;

    /// Runs a paginated query for the single clause in `filter`, sorted by
    /// creation time descending.
    async fn find_page(&self, filter: &BookFilter, options: &PageOptions) -> StoreResult<BookPage>;
}
