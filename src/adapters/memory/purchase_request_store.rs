//! In-memory purchase request store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::purchase::{PurchaseRequest, SettlementDecision, SettlementOutcome};
use crate::ports::PurchaseRequestStore;

/// Purchase requests held in a map keyed by request key.
///
/// Used by tests and by the service when no database is configured.
#[derive(Default)]
pub struct InMemoryPurchaseRequestStore {
    requests: RwLock<HashMap<String, PurchaseRequest>>,
}

impl InMemoryPurchaseRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given requests.
    pub fn with_requests(requests: impl IntoIterator<Item = PurchaseRequest>) -> Self {
        let map = requests
            .into_iter()
            .map(|r| (r.request_key().to_string(), r))
            .collect();
        Self {
            requests: RwLock::new(map),
        }
    }

    /// Inserts or replaces a request.
    pub async fn insert(&self, request: PurchaseRequest) {
        self.requests
            .write()
            .await
            .insert(request.request_key().to_string(), request);
    }
}

fn not_found(request_key: &str) -> DomainError {
    DomainError::new(
        ErrorCode::PurchaseRequestNotFound,
        format!("Purchase request not found: {}", request_key),
    )
}

#[async_trait]
impl PurchaseRequestStore for InMemoryPurchaseRequestStore {
    async fn find_by_key(&self, request_key: &str) -> Result<Option<PurchaseRequest>, DomainError> {
        Ok(self.requests.read().await.get(request_key).cloned())
    }

    async fn attach_provider_metadata(
        &self,
        request_key: &str,
        metadata: &str,
    ) -> Result<(), DomainError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(request_key)
            .ok_or_else(|| not_found(request_key))?;
        request.attach_provider_metadata(metadata);
        Ok(())
    }

    async fn apply_settlement(
        &self,
        request_key: &str,
        decision: SettlementDecision,
    ) -> Result<SettlementOutcome, DomainError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(request_key)
            .ok_or_else(|| not_found(request_key))?;
        Ok(request.apply_settlement(decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PaymentProfileId;
    use crate::domain::purchase::PurchaseRequestState;
    use rust_decimal::Decimal;

    fn request(key: &str) -> PurchaseRequest {
        PurchaseRequest::new(key, PaymentProfileId::new(1).unwrap(), Decimal::TEN, "USD").unwrap()
    }

    #[tokio::test]
    async fn finds_seeded_request() {
        let store = InMemoryPurchaseRequestStore::with_requests(vec![request("a")]);
        assert!(store.find_by_key("a").await.unwrap().is_some());
        assert!(store.find_by_key("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn settlement_is_idempotent() {
        let store = InMemoryPurchaseRequestStore::with_requests(vec![request("a")]);

        let first = store
            .apply_settlement("a", SettlementDecision::PaymentReceived)
            .await
            .unwrap();
        let second = store
            .apply_settlement("a", SettlementDecision::PaymentReceived)
            .await
            .unwrap();

        assert_eq!(first, SettlementOutcome::Applied);
        assert_eq!(second, SettlementOutcome::AlreadyApplied);
        assert_eq!(
            store.find_by_key("a").await.unwrap().unwrap().state(),
            PurchaseRequestState::Completed
        );
    }

    #[tokio::test]
    async fn settlement_of_unknown_request_is_not_found() {
        let store = InMemoryPurchaseRequestStore::new();
        let err = store
            .apply_settlement("missing", SettlementDecision::PaymentReceived)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PurchaseRequestNotFound);
    }

    #[tokio::test]
    async fn attaches_metadata() {
        let store = InMemoryPurchaseRequestStore::new();
        store.insert(request("a")).await;
        store.attach_provider_metadata("a", "link-1").await.unwrap();
        assert_eq!(
            store
                .find_by_key("a")
                .await
                .unwrap()
                .unwrap()
                .provider_metadata(),
            Some("link-1")
        );
    }
}
