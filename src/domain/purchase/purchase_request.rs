//! PurchaseRequest entity.
//!
//! The minimal view of a purchase request the callback pipeline needs:
//! what was charged, through which payment profile, and where it stands.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PaymentProfileId, StateMachine, ValidationError};

use super::{PurchaseRequestState, SettlementDecision, SettlementOutcome};

/// A purchase request previously issued to a payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    request_key: String,
    payment_profile_id: PaymentProfileId,
    cost_amount: Decimal,
    cost_currency: String,
    provider_metadata: Option<String>,
    state: PurchaseRequestState,
}

impl PurchaseRequest {
    /// Creates a new pending purchase request.
    pub fn new(
        request_key: impl Into<String>,
        payment_profile_id: PaymentProfileId,
        cost_amount: Decimal,
        cost_currency: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let request_key = request_key.into();
        if request_key.trim().is_empty() {
            return Err(ValidationError::empty_field("request_key"));
        }
        let cost_currency = cost_currency.into();
        if cost_currency.trim().is_empty() {
            return Err(ValidationError::empty_field("cost_currency"));
        }
        if cost_amount.is_sign_negative() {
            return Err(ValidationError::invalid_format(
                "cost_amount",
                "must not be negative",
            ));
        }

        Ok(Self {
            request_key,
            payment_profile_id,
            cost_amount,
            cost_currency,
            provider_metadata: None,
            state: PurchaseRequestState::Pending,
        })
    }

    /// Reconstitutes a purchase request from storage without validation.
    pub fn reconstitute(
        request_key: String,
        payment_profile_id: PaymentProfileId,
        cost_amount: Decimal,
        cost_currency: String,
        provider_metadata: Option<String>,
        state: PurchaseRequestState,
    ) -> Self {
        Self {
            request_key,
            payment_profile_id,
            cost_amount,
            cost_currency,
            provider_metadata,
            state,
        }
    }

    pub fn request_key(&self) -> &str {
        &self.request_key
    }

    pub fn payment_profile_id(&self) -> PaymentProfileId {
        self.payment_profile_id
    }

    pub fn cost_amount(&self) -> Decimal {
        self.cost_amount
    }

    pub fn cost_currency(&self) -> &str {
        &self.cost_currency
    }

    /// Gateway-side identifier recorded when the payment link was created.
    pub fn provider_metadata(&self) -> Option<&str> {
        self.provider_metadata.as_deref()
    }

    pub fn state(&self) -> PurchaseRequestState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Builder-style state override, mostly for fixtures.
    pub fn with_state(mut self, state: PurchaseRequestState) -> Self {
        self.state = state;
        self
    }

    pub fn attach_provider_metadata(&mut self, metadata: impl Into<String>) {
        self.provider_metadata = Some(metadata.into());
    }

    /// Applies a settlement decision.
    ///
    /// Redelivery of the same decision, or a decision the current state has
    /// already moved past, is reported as `AlreadyApplied`.
    pub fn apply_settlement(&mut self, decision: SettlementDecision) -> SettlementOutcome {
        let Some(target) = PurchaseRequestState::settlement_target(decision) else {
            return SettlementOutcome::AlreadyApplied;
        };

        match self.state.transition_to(target) {
            Ok(next) => {
                self.state = next;
                SettlementOutcome::Applied
            }
            Err(_) => SettlementOutcome::AlreadyApplied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request() -> PurchaseRequest {
        PurchaseRequest::new(
            "req-1",
            PaymentProfileId::new(1).unwrap(),
            Decimal::from_str("25.50").unwrap(),
            "EUR",
        )
        .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn new_request_is_pending() {
        let req = request();
        assert_eq!(req.state(), PurchaseRequestState::Pending);
        assert!(req.provider_metadata().is_none());
        assert!(req.is_open());
    }

    #[test]
    fn rejects_empty_request_key() {
        let result = PurchaseRequest::new(
            "  ",
            PaymentProfileId::new(1).unwrap(),
            Decimal::ONE,
            "EUR",
        );
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn rejects_negative_cost() {
        let result = PurchaseRequest::new(
            "req-1",
            PaymentProfileId::new(1).unwrap(),
            Decimal::NEGATIVE_ONE,
            "EUR",
        );
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Settlement
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn payment_received_completes_pending_request() {
        let mut req = request();
        assert_eq!(
            req.apply_settlement(SettlementDecision::PaymentReceived),
            SettlementOutcome::Applied
        );
        assert_eq!(req.state(), PurchaseRequestState::Completed);
    }

    #[test]
    fn redelivered_payment_received_is_already_applied() {
        let mut req = request();
        req.apply_settlement(SettlementDecision::PaymentReceived);
        assert_eq!(
            req.apply_settlement(SettlementDecision::PaymentReceived),
            SettlementOutcome::AlreadyApplied
        );
        assert_eq!(req.state(), PurchaseRequestState::Completed);
    }

    #[test]
    fn reinstated_reverses_completed_request() {
        let mut req = request().with_state(PurchaseRequestState::Completed);
        assert_eq!(
            req.apply_settlement(SettlementDecision::PaymentReinstated),
            SettlementOutcome::Applied
        );
        assert_eq!(req.state(), PurchaseRequestState::Reversed);
        assert!(!req.is_open());
    }

    #[test]
    fn no_decision_changes_nothing() {
        let mut req = request();
        assert_eq!(
            req.apply_settlement(SettlementDecision::None),
            SettlementOutcome::AlreadyApplied
        );
        assert_eq!(req.state(), PurchaseRequestState::Pending);
    }

    #[test]
    fn attach_provider_metadata_records_gateway_id() {
        let mut req = request();
        req.attach_provider_metadata("3a16a4f0-27b0");
        assert_eq!(req.provider_metadata(), Some("3a16a4f0-27b0"));
    }
}
