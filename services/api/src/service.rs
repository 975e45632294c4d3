//! services/api/src/service.rs
//!
//! The book service: business rules between the HTTP handlers and the
//! persistence port. Existence and uniqueness are decided by the store's
//! atomic conditional writes; this layer translates the outcomes into the
//! service's domain errors.

use std::sync::Arc;

use bookstore_core::domain::{BookDraft, BookFilter, BookKey, BookPage, PageOptions};
use bookstore_core::ports::BookStore;

use crate::error::ApiError;

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Creates a new book. Fails with the already-exists condition when the
    /// `isbn` is taken.
    pub async fn add_book(&self, draft: BookDraft) -> Result<(), ApiError> {
        self.store.insert_book(draft).await?;
        Ok(())
    }

    /// Overwrites all mutable fields of the book resolved by `key`.
    /// Fails with the not-found condition when no book matches, including
    /// when no identifier was supplied at all.
    pub async fn update_book(&self, key: Option<BookKey>, draft: BookDraft) -> Result<(), ApiError> {
        let key = key.ok_or_else(book_not_found)?;
        self.store.update_book(&key, draft).await?;
        Ok(())
    }

    /// Removes the book resolved by `key`, with the same not-found rule as
    /// [`Self::update_book`].
    pub async fn delete_book(&self, key: Option<BookKey>) -> Result<(), ApiError> {
        let key = key.ok_or_else(book_not_found)?;
        self.store.delete_book(&key).await?;
        Ok(())
    }

    /// Runs a paginated catalogue query.
    pub async fn get_books(
        &self,
        filter: &BookFilter,
        options: &PageOptions,
    ) -> Result<BookPage, ApiError> {
        Ok(self.store.find_page(filter, options).await?)
    }
}

fn book_not_found() -> ApiError {
    ApiError::NotFound("The book does not exist.".to_string())
}
