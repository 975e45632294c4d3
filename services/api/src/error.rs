//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its
//! conversion into the uniform error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookstore_core::ports::StoreError;
use tracing::error;

use crate::config::ConfigError;
use crate::web::envelope::ErrorEnvelope;

/// Internal status codes carried inside the response envelope. These are
/// domain-specific and distinct from HTTP status codes.
///
/// The whole table is part of the wire contract shared with clients. Success
/// and validation envelopes carry the plain HTTP status (200, 400) instead,
/// so `SUCCESS`, `VALID_VALUE` and `INVALID_VALUE` are reserved here and not
/// emitted by this service.
pub mod internal_code {
    pub const SUCCESS: u16 = 7000;
    pub const SERVER_ERROR: u16 = 7001;
    pub const VALID_VALUE: u16 = 7002;
    pub const INVALID_VALUE: u16 = 7003;
    pub const NOT_FOUND: u16 = 7004;
    pub const EXPIRED_VALUE: u16 = 7005;
    pub const EXISTED_VALUE: u16 = 7006;
    pub const UNAUTHORIZATION: u16 = 7007;
}

/// The primary error type for the `api` service.
///
/// Every failure in the request pipeline converts into one of these variants,
/// and each variant renders as the uniform error envelope. Validation
/// failures carry the HTTP status 400 in the envelope; domain failures carry
/// their internal code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request shape or failed field-level checks.
    #[error("{0}")]
    Validation(String),

    /// The targeted book does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A book with the same unique value already exists.
    #[error("{0}")]
    Existed(String),

    /// Missing or invalid bearer credential.
    #[error("{0}")]
    Unauthorized(String),

    /// The presented bearer credential has expired.
    #[error("{0}")]
    Expired(String),

    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an unexpected error from the persistence adapter.
    #[error("Store error: {0}")]
    Store(String),

    /// Represents an error from the underlying database library.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding a socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ApiError::Existed("The book already exists.".to_string()),
            StoreError::NotFound(_) => ApiError::NotFound("The book does not exist.".to_string()),
            StoreError::Unexpected(msg) => ApiError::Store(msg),
        }
    }
}

impl ApiError {
    /// The HTTP status and the envelope's internal status code for this error.
    fn status_codes(&self) -> (StatusCode, u16) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, 400),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, internal_code::NOT_FOUND),
            ApiError::Existed(_) => (StatusCode::CONFLICT, internal_code::EXISTED_VALUE),
            ApiError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, internal_code::UNAUTHORIZATION)
            }
            ApiError::Expired(_) => (StatusCode::UNAUTHORIZED, internal_code::EXPIRED_VALUE),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_code::SERVER_ERROR,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (http_status, status_code) = self.status_codes();

        // Server faults keep their detail in the log, not in the response.
        let message = if http_status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed with a server fault");
            "An unexpected internal error occurred.".to_string()
        } else {
            error!(error = %self, status_code, "request failed");
            self.to_string()
        };

        (http_status, ErrorEnvelope::new(status_code, message)).into_response()
    }
}
