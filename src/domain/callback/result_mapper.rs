//! Maps an accepted callback's transaction status to a settlement decision.

use super::state::CallbackState;
use crate::domain::purchase::SettlementDecision;

/// Gateway status for a completed payment.
pub const STATUS_PAID: &str = "Paid";

/// Gateway status for a declined payment.
pub const STATUS_DECLINED: &str = "Declined";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMapper;

impl ResultMapper {
    pub fn new() -> Self {
        Self
    }

    /// Decision for a status string, if it is one the gateway settles on.
    pub fn decision_for(status: &str) -> Option<SettlementDecision> {
        match status {
            STATUS_PAID => Some(SettlementDecision::PaymentReceived),
            STATUS_DECLINED => Some(SettlementDecision::PaymentReinstated),
            _ => None,
        }
    }

    /// Sets the decision on an accepted callback.
    ///
    /// An unrecognised status leaves the decision at `None` and records an
    /// anomaly; the callback stays accepted. Non-accepted callbacks are not
    /// touched.
    pub fn map(&self, state: &mut CallbackState) {
        if !state.is_accepted() {
            return;
        }

        match Self::decision_for(state.status()) {
            Some(decision) => state.set_decision(decision),
            None => {
                let reason = format!("invalid transaction status: {}", state.status());
                tracing::error!(
                    callback_id = %state.callback_id(),
                    transaction_id = state.transaction_id().unwrap_or_default(),
                    status = %state.status(),
                    "Accepted callback has no settlement decision"
                );
                state.flag_anomaly(reason);
            }
        }
    }
}
