//! Axum router configuration for the payment endpoints.

use std::sync::Arc;

use axum::middleware;
use axum::routing::post;
use axum::Router;

use crate::adapters::http::middleware::require_api_key;

use super::handlers::{create_payment_link, handle_callback, CallbackAppState, CallbackHttpSettings};

/// Routes relative to the payment mount point.
///
/// - `POST /callback` - Gateway notification
/// - `POST /links/:request_key` - Create a payment link (bearer API key;
///   only mounted when a key is configured)
pub fn callback_routes(settings: &CallbackHttpSettings) -> Router<CallbackAppState> {
    let routes = Router::new().route("/callback", post(handle_callback));

    match &settings.links_api_key {
        Some(key) => routes.merge(
            Router::new()
                .route("/links/:request_key", post(create_payment_link))
                .route_layer(middleware::from_fn_with_state(
                    Arc::new(key.clone()),
                    require_api_key,
                )),
        ),
        None => routes,
    }
}

/// Payment routes mounted at `/api/payment`.
pub fn callback_router(settings: &CallbackHttpSettings) -> Router<CallbackAppState> {
    Router::new().nest("/api/payment", callback_routes(settings))
}
