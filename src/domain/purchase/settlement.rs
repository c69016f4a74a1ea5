//! Settlement decisions derived from a validated callback.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an accepted callback means for the matched purchase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementDecision {
    /// No settlement change. Also used for unrecognised transaction statuses.
    #[default]
    None,

    /// The payer's money was received.
    PaymentReceived,

    /// The gateway reported the payment as declined after the fact.
    PaymentReinstated,
}

impl SettlementDecision {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for SettlementDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::PaymentReceived => "payment_received",
            Self::PaymentReinstated => "payment_reinstated",
        };
        write!(f, "{}", s)
    }
}

/// Result of applying a settlement decision to stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// State changed.
    Applied,

    /// Request was already in (or past) the target state.
    AlreadyApplied,
}
