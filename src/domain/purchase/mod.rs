//! Purchase domain module.
//!
//! The purchase requests and payment profiles a gateway callback is matched
//! against, and the settlement decisions a callback can apply to them.
//!
//! # Module Structure
//!
//! - `purchase_request` - PurchaseRequest entity
//! - `payment_profile` - PaymentProfile entity
//! - `state` - PurchaseRequestState state machine
//! - `settlement` - SettlementDecision and SettlementOutcome
//! - `money` - Amount rounding and formatting

pub mod money;
mod payment_profile;
mod purchase_request;
mod settlement;
mod state;

pub use payment_profile::PaymentProfile;
pub use purchase_request::PurchaseRequest;
pub use settlement::{SettlementDecision, SettlementOutcome};
pub use state::PurchaseRequestState;
