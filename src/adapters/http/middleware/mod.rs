//! HTTP middleware for axum.
//!
//! - `api_key` - Shared bearer key for operator-facing routes

pub mod api_key;

pub use api_key::{require_api_key, ApiKeyState};
