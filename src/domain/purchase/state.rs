//! Purchase request lifecycle.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

use super::SettlementDecision;

/// State of a purchase request as seen by the callback pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseRequestState {
    /// Issued to the payer, awaiting the gateway's confirmation.
    Pending,

    /// Gateway confirmed payment.
    Completed,

    /// Payment was reversed. The request no longer accepts callbacks.
    Reversed,
}

impl PurchaseRequestState {
    /// Returns true if callbacks may still be matched against this request.
    ///
    /// A completed request stays open so a later reversal can be delivered.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Completed)
    }

    /// Target state a settlement decision moves a request into.
    pub fn settlement_target(decision: SettlementDecision) -> Option<Self> {
        match decision {
            SettlementDecision::PaymentReceived => Some(Self::Completed),
            SettlementDecision::PaymentReinstated => Some(Self::Reversed),
            SettlementDecision::None => None,
        }
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Reversed => "reversed",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "reversed" => Some(Self::Reversed),
            _ => None,
        }
    }
}

impl StateMachine for PurchaseRequestState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PurchaseRequestState::*;
        matches!(
            (self, target),
            (Pending, Completed) | (Pending, Reversed) | (Completed, Reversed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PurchaseRequestState::*;
        match self {
            Pending => vec![Completed, Reversed],
            Completed => vec![Reversed],
            Reversed => vec![],
        }
    }
}
