//! HTTP adapter for the payment endpoints.
//!
//! - `POST /api/payment/callback` - Gateway notification (signature verified)
//! - `POST /api/payment/links/:request_key` - Create a hosted payment link (API key)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{CallbackApiError, CallbackAppState, CallbackHttpSettings};
pub use routes::{callback_router, callback_routes};
