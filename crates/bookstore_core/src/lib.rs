pub mod domain;
pub mod ports;
pub mod sum;

pub use domain::{Book, BookDraft, BookFilter, BookKey, BookPage, PageOptions};
pub use ports::{BookStore, StoreError, StoreResult};
