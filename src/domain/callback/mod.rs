//! Callback domain module.
//!
//! Verification of inbound gateway notifications.
//!
//! # Module Structure
//!
//! - `parser` - InboundCallback to CallbackState
//! - `state` - CallbackState and the CallbackOutcome state machine
//! - `validator` - Ordered validation checks
//! - `result_mapper` - Transaction status to settlement decision
//! - `duplicate_guard` - Default platform validator
//! - `allow_list` - Source address allow-list
//! - `rejection` - Rejection reasons and severities
//! - `redaction` - Log-safe callback details

mod allow_list;
mod duplicate_guard;
mod fields;
mod parser;
mod redaction;
mod rejection;
mod result_mapper;
mod state;
mod validator;

pub use allow_list::{IpAllowList, DEFAULT_GATEWAY_IPS};
pub use duplicate_guard::{DuplicateDeliveryGuard, ALREADY_PROCESSED};
pub use fields::CallbackFields;
pub use parser::{CallbackParser, InboundCallback, UNKNOWN_STATUS};
pub use redaction::{mask_email, payload_fingerprint, CallbackLogDetails};
pub use rejection::{LogSeverity, PlatformRejection, Rejection, RejectionKind, RejectionReason};
pub use result_mapper::{ResultMapper, STATUS_DECLINED, STATUS_PAID};
pub use state::{CallbackOutcome, CallbackState};
pub use validator::CallbackValidator;
