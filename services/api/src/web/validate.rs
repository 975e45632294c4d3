//! services/api/src/web/validate.rs
//!
//! Request validation helpers.
//!
//! Shape errors (missing required field, wrong overall body shape, bad
//! types) are caught by the extractor and surface as the generic
//! "Check required value" message. Field-level rules run afterwards against
//! the deserialized value; every failing field is collected before reporting,
//! and the messages are joined into a single validation error.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;

use crate::error::ApiError;

/// The generic message for a request whose shape did not match the schema.
pub const CHECK_REQUIRED: &str = "Check required value";

/// Unwraps a JSON body extraction, mapping any rejection to the generic
/// shape error.
pub fn checked_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|_| ApiError::Validation(CHECK_REQUIRED.to_string()))
}

/// Unwraps a query-string extraction, mapping any rejection to the generic
/// shape error.
pub fn checked_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|_| ApiError::Validation(CHECK_REQUIRED.to_string()))
}

/// Collects field-level validation failures across a whole payload.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A required string field may not be empty or whitespace.
    pub fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.errors
                .push(format!("\"{field}\" is not allowed to be empty"));
        }
    }

    /// A numeric field may not be negative.
    pub fn require_non_negative(&mut self, field: &str, value: f64) {
        if value < 0.0 {
            self.errors
                .push(format!("\"{field}\" must be greater than or equal to 0"));
        }
    }

    /// Reports all collected failures at once, joined with ", ".
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_field_errors_are_collected() {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("title", "");
        errors.require_non_empty("isbn", "  ");
        errors.require_non_empty("author", "ok");

        let err = errors.finish().unwrap_err();
        let ApiError::Validation(message) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(
            message,
            "\"title\" is not allowed to be empty, \"isbn\" is not allowed to be empty"
        );
    }

    #[test]
    fn negative_numbers_are_rejected_and_zero_is_allowed() {
        let mut errors = FieldErrors::new();
        errors.require_non_negative("price", -5.0);
        errors.require_non_negative("price", 0.0);

        let err = errors.finish().unwrap_err();
        let ApiError::Validation(message) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(message, "\"price\" must be greater than or equal to 0");
    }

    #[test]
    fn no_errors_means_ok() {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("title", "fine");
        assert!(errors.finish().is_ok());
    }
}
