//! services/api/src/web/mod.rs
//!
//! The HTTP surface: router construction, the liveness probe, and the
//! fallback for unmatched routes.

pub mod books;
pub mod envelope;
pub mod middleware;
pub mod state;
pub mod validate;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::middleware as axum_middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

pub use books::ApiDoc;
pub use middleware::require_auth;

use envelope::{Envelope, ErrorEnvelope};
use state::AppState;

/// Builds the application router. Mutating book routes sit behind the auth
/// guard; reads and the probe are public. Unmatched requests fall through to
/// the uniform 404 envelope.
pub fn router(state: Arc<AppState>) -> Router {
    let mutating = post(books::add_book)
        .put(books::update_book)
        .delete(books::delete_book)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/book", get(books::list_books).merge(mutating))
        .route("/book/search", get(books::search_books))
        .route("/ping", get(ping))
        .fallback(not_found)
        .with_state(state)
}

/// GET /ping - liveness probe with build metadata.
async fn ping() -> Envelope<serde_json::Value> {
    Envelope::ok(serde_json::json!({
        "message": "Connected To Online Bookstore API",
        "build": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

/// Uniform 404 body for any unknown request.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, ErrorEnvelope::new(404, "Not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBookStore;
    use crate::config::Config;
    use crate::error::internal_code;
    use crate::service::BookService;
    use crate::web::middleware::Claims;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tracing::Level;

    const SECRET: &str = "test-secret";

    fn test_app() -> (Router, Arc<MemoryBookStore>) {
        let store = Arc::new(MemoryBookStore::new());
        let config = Arc::new(Config {
            bind_address: ([127, 0, 0, 1], 0).into(),
            database_url: String::new(),
            log_level: Level::INFO,
            jwt_secret: SECRET.to_string(),
            jwt_expiration_minutes: 30,
        });
        let state = Arc::new(AppState {
            config,
            books: BookService::new(store.clone()),
        });
        (router(state), store)
    }

    fn bearer_token(expires_in_secs: i64) -> String {
        let claims = Claims {
            sub: "tester".to_string(),
            exp: (chrono::Utc::now().timestamp() + expires_in_secs) as u64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    fn book_body(title: &str, isbn: &str) -> Value {
        json!({
            "title": title,
            "isbn": isbn,
            "price": 12.5,
            "author": "Author",
            "category": "Fiction",
        })
    }

    #[tokio::test]
    async fn ping_is_wrapped_in_the_success_envelope() {
        let (app, _) = test_app();
        let req = Request::builder().uri("/ping").body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasError"], false);
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["message"], "Successful");
        assert_eq!(body["data"]["message"], "Connected To Online Bookstore API");
        assert!(body["data"]["build"]["version"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_returns_the_404_envelope() {
        let (app, _) = test_app();
        let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["hasError"], true);
        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["message"], "Not found");
        assert_eq!(body["data"], json!({}));
    }

    #[tokio::test]
    async fn created_book_appears_in_the_list() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        let (status, body) = send(
            app.clone(),
            json_request("POST", "/book", book_body("Dune", "978-0"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasError"], false);
        assert_eq!(body["data"], json!({}));

        let req = Request::builder().uri("/book").body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalBook"], 1);
        assert_eq!(body["data"]["totalPages"], 1);
        assert_eq!(body["data"]["books"][0]["title"], "Dune");
    }

    #[tokio::test]
    async fn mutating_without_a_credential_never_reaches_the_store() {
        let (app, store) = test_app();

        let (status, body) = send(
            app,
            json_request("POST", "/book", book_body("Dune", "978-0"), None),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["hasError"], true);
        assert_eq!(
            body["statusCode"],
            u64::from(internal_code::UNAUTHORIZATION)
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn garbage_credential_is_unauthorized() {
        let (app, store) = test_app();

        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/book",
                book_body("Dune", "978-0"),
                Some("not-a-token"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["statusCode"],
            u64::from(internal_code::UNAUTHORIZATION)
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn expired_credential_is_reported_distinctly() {
        let (app, store) = test_app();
        // Outside the default validation leeway.
        let token = bearer_token(-3600);

        let (status, body) = send(
            app,
            json_request("POST", "/book", book_body("Dune", "978-0"), Some(&token)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["statusCode"], u64::from(internal_code::EXPIRED_VALUE));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn credential_outliving_the_expiration_policy_is_unauthorized() {
        let (app, store) = test_app();
        // Policy allows 30 minutes; this token claims a full day.
        let token = bearer_token(24 * 3600);

        let (status, body) = send(
            app,
            json_request("POST", "/book", book_body("Dune", "978-0"), Some(&token)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["statusCode"],
            u64::from(internal_code::UNAUTHORIZATION)
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn duplicate_isbn_returns_the_conflict_envelope() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        let (status, _) = send(
            app.clone(),
            json_request("POST", "/book", book_body("First", "978-0"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            app,
            json_request("POST", "/book", book_body("Second", "978-0"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["statusCode"], u64::from(internal_code::EXISTED_VALUE));
        assert_eq!(body["message"], "The book already exists.");
        assert_eq!(body["data"], json!({}));
    }

    #[tokio::test]
    async fn updating_a_missing_book_is_not_found() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        let (status, body) = send(
            app,
            json_request("PUT", "/book", book_body("Ghost", "978-9"), Some(&token)),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["statusCode"], u64::from(internal_code::NOT_FOUND));
        assert_eq!(body["message"], "The book does not exist.");
    }

    #[tokio::test]
    async fn update_by_id_overwrites_fields_and_keeps_the_id() {
        let (app, store) = test_app();
        let token = bearer_token(600);

        send(
            app.clone(),
            json_request("POST", "/book", book_body("Before", "978-0"), Some(&token)),
        )
        .await;
        let id = store.first_book().unwrap().id.to_string();

        let mut update = book_body("After", "978-0");
        update["id"] = json!(id);
        update["price"] = json!(99.0);
        let (status, _) = send(
            app.clone(),
            json_request("PUT", "/book", update, Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let book = store.first_book().unwrap();
        assert_eq!(book.id.to_string(), id);
        assert_eq!(book.title, "After");
        assert_eq!(book.price, 99.0);
    }

    #[tokio::test]
    async fn deleted_book_is_gone_from_search() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        send(
            app.clone(),
            json_request("POST", "/book", book_body("Doomed", "978-0"), Some(&token)),
        )
        .await;

        let (status, _) = send(
            app.clone(),
            json_request("DELETE", "/book", json!({"isbn": "978-0"}), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let req = Request::builder()
            .uri("/book/search?isbn=978-0")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalBook"], 0);
    }

    #[tokio::test]
    async fn deleting_with_an_empty_body_is_not_found() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        let (status, body) = send(
            app,
            json_request("DELETE", "/book", json!({}), Some(&token)),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["statusCode"], u64::from(internal_code::NOT_FOUND));
    }

    #[tokio::test]
    async fn missing_required_field_gets_the_generic_message() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/book",
                json!({"isbn": "978-0", "price": 1.0}),
                Some(&token),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"], "Check required value");
    }

    #[tokio::test]
    async fn empty_fields_get_concatenated_field_messages() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        let mut body_in = book_body("", "978-0");
        body_in["category"] = json!(" ");
        let (status, body) = send(
            app,
            json_request("POST", "/book", body_in, Some(&token)),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "\"title\" is not allowed to be empty, \"category\" is not allowed to be empty"
        );
    }

    #[tokio::test]
    async fn list_clamps_the_limit_to_one_hundred() {
        let (app, store) = test_app();
        let token = bearer_token(600);

        for i in 0..120 {
            send(
                app.clone(),
                json_request(
                    "POST",
                    "/book",
                    book_body(&format!("B{i}"), &format!("isbn-{i}")),
                    Some(&token),
                ),
            )
            .await;
        }
        assert_eq!(store.len(), 120);

        let req = Request::builder()
            .uri("/book?limit=500&page=1")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalBook"], 120);
        assert_eq!(body["data"]["books"].as_array().unwrap().len(), 100);
        assert_eq!(body["data"]["totalPages"], 2);
    }

    #[tokio::test]
    async fn search_by_author_is_exact() {
        let (app, _) = test_app();
        let token = bearer_token(600);

        let mut a = book_body("One", "isbn-1");
        a["author"] = json!("Tolkien");
        let mut b = book_body("Two", "isbn-2");
        b["author"] = json!("Herbert");
        send(app.clone(), json_request("POST", "/book", a, Some(&token))).await;
        send(app.clone(), json_request("POST", "/book", b, Some(&token))).await;

        let req = Request::builder()
            .uri("/book/search?author=Tolkien")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(app, req).await;
        assert_eq!(body["data"]["totalBook"], 1);
        assert_eq!(body["data"]["books"][0]["title"], "One");
    }
}
