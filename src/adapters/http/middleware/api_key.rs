//! Bearer API key check for routes that must not be publicly callable.
//!
//! ```ignore
//! let key: ApiKeyState = Arc::new(SecretString::new("...".into()));
//! let routes = Router::new()
//!     .route("/links/:request_key", post(create_payment_link))
//!     .route_layer(middleware::from_fn_with_state(key, require_api_key));
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::{ExposeSecret, SecretString};

use crate::adapters::http::callback::ErrorResponse;

/// Expected key, shared by every request through the layer.
pub type ApiKeyState = Arc<SecretString>;

/// Rejects the request with 401 unless it carries
/// `Authorization: Bearer <key>` with the configured key.
pub async fn require_api_key(
    State(expected): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let verdict = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| keys_match(token, expected.expose_secret()));

    match verdict {
        Some(true) => next.run(request).await,
        Some(false) => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with wrong API key");
            unauthorized("Invalid API key")
        }
        None => unauthorized("Missing bearer API key"),
    }
}

fn keys_match(presented: &str, expected: &str) -> bool {
    // memcmp::eq requires equal lengths
    presented.len() == expected.len()
        && openssl::memcmp::eq(presented.as_bytes(), expected.as_bytes())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("UNAUTHORIZED", message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::post;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    const KEY: &str = "links-key-0123456789";

    fn app() -> Router {
        let key: ApiKeyState = Arc::new(SecretString::new(KEY.to_string()));
        Router::new()
            .route("/guarded", post(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(key, require_api_key))
    }

    async fn status_with(auth: Option<&str>) -> StatusCode {
        let mut builder = HttpRequest::builder().method("POST").uri("/guarded");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn matching_key_passes() {
        assert_eq!(status_with(Some(&format!("Bearer {}", KEY))).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(status_with(None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_or_malformed_key_is_unauthorized() {
        assert_eq!(status_with(Some("Bearer nope")).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_with(Some(&format!("Bearer {}x", KEY))).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_with(Some(KEY)).await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn keys_match_requires_exact_bytes() {
        assert!(keys_match(KEY, KEY));
        assert!(!keys_match("links-key-0123456788", KEY));
        assert!(!keys_match("", KEY));
    }
}
