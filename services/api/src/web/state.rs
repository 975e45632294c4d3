//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use crate::config::Config;
use crate::service::BookService;

/// The shared application state, created once at startup and passed to all
/// handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub books: BookService,
}
