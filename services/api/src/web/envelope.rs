//! services/api/src/web/envelope.rs
//!
//! The uniform wrapper placed around every JSON response body.
//!
//! The envelope is a typed decorator applied where handlers produce their
//! responses, rather than an interception of the serializer: success bodies
//! are built with [`Envelope::ok`], error bodies with [`ErrorEnvelope`], and
//! nothing else ever reaches the wire.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// The uniform success envelope: `hasError` is always false, `statusCode`
/// always 200, `message` always "Successful".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub has_error: bool,
    pub status_code: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            has_error: false,
            status_code: 200,
            message: "Successful".to_string(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// The uniform error envelope. `data` is always an empty object.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub has_error: bool,
    pub status_code: u16,
    pub message: String,
    pub data: serde_json::Value,
}

impl ErrorEnvelope {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            has_error: true,
            status_code,
            message: message.into(),
            data: serde_json::json!({}),
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
