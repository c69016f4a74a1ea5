//! HTTP adapters - REST API implementations.

pub mod callback;
pub mod client_ip;
pub mod health;
pub mod middleware;

use std::time::Duration;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use callback::{callback_router, CallbackAppState, CallbackHttpSettings};
pub use health::{health_router, HealthInfo};

/// Largest accepted request body. Gateway notifications are a few hundred bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Full application router with the standard middleware stack.
pub fn app_router(state: CallbackAppState, health: HealthInfo, request_timeout: Duration) -> Router {
    let payment = callback_router(&state.settings).with_state(state);

    Router::new()
        .merge(payment)
        .merge(health_router(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
