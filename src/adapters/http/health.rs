//! Liveness endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct HealthInfo {
    pub environment: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
}

/// GET /health
pub async fn health(State(info): State<HealthInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: info.environment,
    })
}

pub fn health_router(info: HealthInfo) -> Router {
    Router::new().route("/health", get(health)).with_state(info)
}
