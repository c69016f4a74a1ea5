//! PurchaseRequestStore port - persistence of issued purchase requests.
//!
//! The callback pipeline only reads during validation. Writes happen after a
//! settlement decision (idempotent) and when a payment link is created.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::purchase::{PurchaseRequest, SettlementDecision, SettlementOutcome};

#[async_trait]
pub trait PurchaseRequestStore: Send + Sync {
    /// Finds a purchase request by its key.
    ///
    /// Returns `None` if no request exists with that key.
    async fn find_by_key(&self, request_key: &str) -> Result<Option<PurchaseRequest>, DomainError>;

    /// Records the gateway-side identifier for a request.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseRequestNotFound` if the request does not exist.
    async fn attach_provider_metadata(
        &self,
        request_key: &str,
        metadata: &str,
    ) -> Result<(), DomainError>;

    /// Applies a settlement decision.
    ///
    /// Must be idempotent: applying the same decision twice reports
    /// `AlreadyApplied` the second time and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseRequestNotFound` if the request does not exist.
    async fn apply_settlement(
        &self,
        request_key: &str,
        decision: SettlementDecision,
    ) -> Result<SettlementOutcome, DomainError>;
}
