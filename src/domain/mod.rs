//! Domain layer - Core business logic.
//!
//! - `foundation` - Shared value objects, identifiers, and errors
//! - `purchase` - Purchase requests, payment profiles, settlement
//! - `signature` - Gateway key and signature verification
//! - `callback` - Callback parsing, validation, and result mapping

pub mod callback;
pub mod foundation;
pub mod purchase;
pub mod signature;
