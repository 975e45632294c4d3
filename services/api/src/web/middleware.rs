//! services/api/src/web/middleware.rs
//!
//! Bearer-credential middleware for protecting the mutating routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::web::state::AppState;

/// Claims carried by a bearer token. Issuance lives with the credential
/// service; this middleware only verifies.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

/// The authenticated identity, inserted into request extensions for the
/// handlers downstream.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
}

/// Middleware that requires a valid `Authorization: Bearer <token>` header.
///
/// On any failure the request short-circuits before the handler runs: a
/// missing or invalid credential is unauthorized, an expired one is reported
/// distinctly.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)?;

    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::Expired("The token has expired.".to_string()),
        _ => unauthorized(),
    })?;

    // A token claiming a lifetime beyond the issuer's expiration policy did
    // not come from the issuer.
    let max_exp = chrono::Utc::now().timestamp() + state.config.jwt_expiration_minutes * 60;
    if token_data.claims.exp > max_exp as u64 {
        return Err(unauthorized());
    }

    req.extensions_mut().insert(AuthUser {
        subject: token_data.claims.sub,
    });

    Ok(next.run(req).await)
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Please authenticate.".to_string())
}
