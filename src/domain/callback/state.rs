//! Per-delivery callback state.
//!
//! One `CallbackState` is built by the parser for each inbound delivery,
//! advanced by the validator and result mapper, then dropped once the
//! response is sent.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CallbackId, StateMachine, Timestamp};
use crate::domain::purchase::{PurchaseRequest, SettlementDecision};

use super::fields::CallbackFields;
use super::parser::UNKNOWN_STATUS;
use super::rejection::{LogSeverity, PlatformRejection, Rejection, RejectionReason};

/// Validation outcome of a callback. Both non-initial states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackOutcome {
    Unvalidated,
    Rejected,
    Accepted,
}

impl StateMachine for CallbackOutcome {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CallbackOutcome::*;
        matches!((self, target), (Unvalidated, Rejected) | (Unvalidated, Accepted))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CallbackOutcome::*;
        match self {
            Unvalidated => vec![Rejected, Accepted],
            Rejected | Accepted => vec![],
        }
    }
}

/// State of a single callback delivery.
#[derive(Debug, Clone)]
pub struct CallbackState {
    callback_id: CallbackId,
    received_at: Timestamp,
    provider_id: String,
    source_ip: String,
    raw_payload: Bytes,
    fields: CallbackFields,
    signature: Option<String>,
    matched_request: Option<PurchaseRequest>,
    outcome: CallbackOutcome,
    rejection: Option<Rejection>,
    rejection_reason: Option<String>,
    log_severity: Option<LogSeverity>,
    decision: SettlementDecision,
}

impl CallbackState {
    pub(crate) fn new(
        callback_id: CallbackId,
        received_at: Timestamp,
        provider_id: String,
        source_ip: String,
        raw_payload: Bytes,
        fields: CallbackFields,
        signature: Option<String>,
    ) -> Self {
        Self {
            callback_id,
            received_at,
            provider_id,
            source_ip,
            raw_payload,
            fields,
            signature,
            matched_request: None,
            outcome: CallbackOutcome::Unvalidated,
            rejection: None,
            rejection_reason: None,
            log_severity: None,
            decision: SettlementDecision::None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn callback_id(&self) -> CallbackId {
        self.callback_id
    }

    pub fn received_at(&self) -> Timestamp {
        self.received_at
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn source_ip(&self) -> &str {
        &self.source_ip
    }

    /// The body exactly as received.
    pub fn raw_payload(&self) -> &[u8] {
        &self.raw_payload
    }

    pub fn fields(&self) -> &CallbackFields {
        &self.fields
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.fields.transaction_id.as_deref()
    }

    /// Purchase request key, carried by the gateway as `orderId`.
    pub fn request_key(&self) -> Option<&str> {
        self.fields.order_id.as_deref()
    }

    /// Gateway transaction status, `"unknown"` when absent.
    pub fn status(&self) -> &str {
        self.fields
            .transaction_status
            .as_deref()
            .unwrap_or(UNKNOWN_STATUS)
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn matched_request(&self) -> Option<&PurchaseRequest> {
        self.matched_request.as_ref()
    }

    pub fn outcome(&self) -> CallbackOutcome {
        self.outcome
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    /// Rejection reason, or the anomaly note on an accepted callback.
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn log_severity(&self) -> Option<LogSeverity> {
        self.log_severity
    }

    pub fn decision(&self) -> SettlementDecision {
        self.decision
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome == CallbackOutcome::Accepted
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn set_matched_request(&mut self, request: Option<PurchaseRequest>) {
        self.matched_request = request;
    }

    /// Rejects with a core reason. No-op once the outcome is terminal.
    pub fn reject(&mut self, reason: RejectionReason) {
        self.apply_rejection(Rejection::Core(reason));
    }

    /// Rejects with a platform-supplied reason and severity.
    pub fn reject_platform(&mut self, rejection: PlatformRejection) {
        self.apply_rejection(Rejection::Platform(rejection));
    }

    fn apply_rejection(&mut self, rejection: Rejection) {
        if !self.advance(CallbackOutcome::Rejected) {
            return;
        }
        self.rejection_reason = Some(rejection.to_string());
        self.log_severity = Some(rejection.severity());
        self.rejection = Some(rejection);
    }

    pub fn accept(&mut self) {
        self.advance(CallbackOutcome::Accepted);
    }

    /// Records the settlement decision. Only meaningful on an accepted callback.
    pub fn set_decision(&mut self, decision: SettlementDecision) {
        if self.outcome != CallbackOutcome::Accepted {
            tracing::warn!(
                callback_id = %self.callback_id,
                outcome = ?self.outcome,
                "Ignoring settlement decision on non-accepted callback"
            );
            return;
        }
        self.decision = decision;
    }

    /// Notes an anomaly on an accepted callback without rejecting it.
    pub fn flag_anomaly(&mut self, reason: impl Into<String>) {
        self.rejection_reason = Some(reason.into());
        self.log_severity = Some(LogSeverity::Error);
    }

    fn advance(&mut self, target: CallbackOutcome) -> bool {
        match self.outcome.transition_to(target) {
            Ok(next) => {
                self.outcome = next;
                true
            }
            Err(e) => {
                tracing::warn!(
                    callback_id = %self.callback_id,
                    error = %e,
                    "Ignoring invalid callback outcome transition"
                );
                false
            }
        }
    }
}
