//! HandleGatewayCallbackHandler - Command handler for inbound gateway notifications.

use std::sync::Arc;

use bytes::Bytes;
use tracing::Instrument;

use crate::domain::callback::{
    payload_fingerprint, CallbackParser, CallbackState, CallbackValidator, InboundCallback,
    LogSeverity, RejectionKind, ResultMapper,
};
use crate::domain::foundation::DomainError;
use crate::domain::purchase::{SettlementDecision, SettlementOutcome};
use crate::ports::{
    Clock, ProcessedCallbackRecord, ProcessedCallbackRepository, PurchaseRequestStore, SaveResult,
};

/// Command to process one callback delivery.
#[derive(Debug, Clone)]
pub struct HandleGatewayCallbackCommand {
    /// Provider the caller claims to be.
    pub provider_id: String,
    /// Transport-layer origin address.
    pub source_ip: String,
    /// Detached base64 signature header, if sent.
    pub signature: Option<String>,
    /// Raw request body.
    pub body: Bytes,
}

/// Result of processing a callback delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleGatewayCallbackResult {
    /// Callback verified. `settlement` is set when the decision was applied.
    Accepted {
        decision: SettlementDecision,
        settlement: Option<SettlementOutcome>,
        anomaly: Option<String>,
    },
    /// Callback rejected by a validation step.
    Rejected {
        reason: String,
        kind: RejectionKind,
        severity: LogSeverity,
    },
}

/// Handler driving a delivery through parse, validate and map, then
/// settling the matched purchase request.
///
/// Settlement runs before the processed-callback record is written. A
/// failure between the two is retried by the gateway and the second
/// settlement attempt reports `AlreadyApplied`.
pub struct HandleGatewayCallbackHandler {
    parser: CallbackParser,
    validator: Arc<CallbackValidator>,
    mapper: ResultMapper,
    purchase_requests: Arc<dyn PurchaseRequestStore>,
    processed: Arc<dyn ProcessedCallbackRepository>,
    clock: Arc<dyn Clock>,
}

impl HandleGatewayCallbackHandler {
    pub fn new(
        validator: Arc<CallbackValidator>,
        purchase_requests: Arc<dyn PurchaseRequestStore>,
        processed: Arc<dyn ProcessedCallbackRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            parser: CallbackParser::new(),
            validator,
            mapper: ResultMapper::new(),
            purchase_requests,
            processed,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleGatewayCallbackCommand,
    ) -> Result<HandleGatewayCallbackResult, DomainError> {
        let inbound = InboundCallback::new(cmd.provider_id, cmd.source_ip, cmd.signature, cmd.body)
            .with_received_at(self.clock.now());
        let mut state = self.parser.parse(inbound);

        let span = tracing::info_span!(
            "gateway_callback",
            callback_id = %state.callback_id(),
            source_ip = %state.source_ip(),
            transaction_id = state.transaction_id().unwrap_or_default(),
        );

        self.process(&mut state).instrument(span).await
    }

    async fn process(
        &self,
        state: &mut CallbackState,
    ) -> Result<HandleGatewayCallbackResult, DomainError> {
        self.validator.validate(state).await;

        if let Some(rejection) = state.rejection() {
            return Ok(HandleGatewayCallbackResult::Rejected {
                reason: rejection.to_string(),
                kind: rejection.kind(),
                severity: rejection.severity(),
            });
        }

        self.mapper.map(state);

        let decision = state.decision();
        let anomaly = state.rejection_reason().map(str::to_string);
        if decision.is_none() {
            tracing::warn!(
                status = state.status(),
                anomaly = anomaly.as_deref().unwrap_or_default(),
                "Callback accepted without settlement decision"
            );
            return Ok(HandleGatewayCallbackResult::Accepted {
                decision,
                settlement: None,
                anomaly,
            });
        }

        let settlement = self.settle(state, decision).await?;

        Ok(HandleGatewayCallbackResult::Accepted {
            decision,
            settlement: Some(settlement),
            anomaly,
        })
    }

    async fn settle(
        &self,
        state: &CallbackState,
        decision: SettlementDecision,
    ) -> Result<SettlementOutcome, DomainError> {
        // The validator guarantees both identifiers on an accepted callback.
        let request_key = state.request_key().unwrap_or_default().to_string();
        let transaction_id = state.transaction_id().unwrap_or_default().to_string();

        let outcome = self
            .purchase_requests
            .apply_settlement(&request_key, decision)
            .await
            .map_err(|e| {
                tracing::error!(
                    request_key = %request_key,
                    decision = %decision,
                    error = %e,
                    "Failed to apply settlement"
                );
                e
            })?;

        let record = ProcessedCallbackRecord {
            transaction_id: transaction_id.clone(),
            request_key: request_key.clone(),
            callback_id: state.callback_id(),
            status: state.status().to_string(),
            decision,
            outcome,
            payload_sha256: payload_fingerprint(state.raw_payload()),
            processed_at: *self.clock.now().as_datetime(),
        };

        match self.processed.save(record).await {
            Ok(SaveResult::Inserted) => {}
            Ok(SaveResult::AlreadyExists) => {
                tracing::info!("Processed callback already recorded by a concurrent delivery");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to record processed callback");
                return Err(e);
            }
        }

        tracing::info!(
            request_key = %request_key,
            decision = %decision,
            outcome = ?outcome,
            "Settlement applied"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPaymentProfileStore, InMemoryProcessedCallbackRepository,
        InMemoryPurchaseRequestStore,
    };
    use crate::domain::callback::{DuplicateDeliveryGuard, IpAllowList, ALREADY_PROCESSED};
    use crate::domain::foundation::{ErrorCode, PaymentProfileId, Timestamp};
    use crate::domain::purchase::{PaymentProfile, PurchaseRequest, PurchaseRequestState};
    use crate::domain::signature::{test_fixtures, PublicKey};
    use crate::ports::{KeyProvider, KeyUnavailable, SystemClock};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use secrecy::SecretString;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    const GATEWAY_IP: &str = "62.84.126.140";

    struct FixtureKeyProvider;

    #[async_trait]
    impl KeyProvider for FixtureKeyProvider {
        async fn public_key(&self) -> Result<PublicKey, KeyUnavailable> {
            Ok(test_fixtures::public_key())
        }

        async fn invalidate(&self) {}
    }

    struct FailingSettlementStore;

    #[async_trait]
    impl PurchaseRequestStore for FailingSettlementStore {
        async fn find_by_key(
            &self,
            request_key: &str,
        ) -> Result<Option<PurchaseRequest>, DomainError> {
            Ok(Some(
                PurchaseRequest::new(request_key, profile_id(), Decimal::new(2550, 2), "EUR")
                    .unwrap(),
            ))
        }

        async fn attach_provider_metadata(&self, _: &str, _: &str) -> Result<(), DomainError> {
            Ok(())
        }

        async fn apply_settlement(
            &self,
            _: &str,
            _: SettlementDecision,
        ) -> Result<SettlementOutcome, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "connection reset"))
        }
    }

    struct Harness {
        handler: HandleGatewayCallbackHandler,
        requests: Arc<InMemoryPurchaseRequestStore>,
        processed: Arc<InMemoryProcessedCallbackRepository>,
    }

    fn profile_id() -> PaymentProfileId {
        PaymentProfileId::new(1).unwrap()
    }

    fn build(
        store: Arc<dyn PurchaseRequestStore>,
    ) -> (HandleGatewayCallbackHandler, Arc<InMemoryProcessedCallbackRepository>) {
        let profiles = Arc::new(InMemoryPaymentProfileStore::with_profiles(vec![
            PaymentProfile::new(profile_id(), "wata", SecretString::new("t".to_string()), true),
        ]));
        let processed = Arc::new(InMemoryProcessedCallbackRepository::new());

        let validator = Arc::new(CallbackValidator::new(
            IpAllowList::gateway_defaults(),
            Arc::new(FixtureKeyProvider),
            store.clone(),
            profiles,
            Arc::new(DuplicateDeliveryGuard::new(processed.clone())),
        ));

        let handler = HandleGatewayCallbackHandler::new(
            validator,
            store,
            processed.clone(),
            Arc::new(SystemClock),
        );
        (handler, processed)
    }

    fn harness() -> Harness {
        let requests = Arc::new(InMemoryPurchaseRequestStore::with_requests(vec![
            PurchaseRequest::new("req-1", profile_id(), Decimal::new(2550, 2), "EUR").unwrap(),
        ]));
        let (handler, processed) = build(requests.clone());
        Harness {
            handler,
            requests,
            processed,
        }
    }

    fn body(status: &str) -> String {
        format!(
            r#"{{"transactionId":"tx-1","transactionStatus":"{}","amount":25.50,"currency":"EUR","orderId":"req-1"}}"#,
            status
        )
    }

    fn command(ip: &str, body: &str) -> HandleGatewayCallbackCommand {
        HandleGatewayCallbackCommand {
            provider_id: "wata".to_string(),
            source_ip: ip.to_string(),
            signature: Some(test_fixtures::sign(body.as_bytes())),
            body: Bytes::from(body.to_string()),
        }
    }

    async fn state_of(h: &Harness) -> PurchaseRequestState {
        h.requests.find_by_key("req-1").await.unwrap().unwrap().state()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Settlement
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn paid_callback_completes_request_and_records_it() {
        let h = harness();

        let result = h.handler.handle(command(GATEWAY_IP, &body("Paid"))).await.unwrap();

        assert_eq!(
            result,
            HandleGatewayCallbackResult::Accepted {
                decision: SettlementDecision::PaymentReceived,
                settlement: Some(SettlementOutcome::Applied),
                anomaly: None,
            }
        );
        assert_eq!(state_of(&h).await, PurchaseRequestState::Completed);

        let record = h.processed.find_by_transaction_id("tx-1").await.unwrap().unwrap();
        assert_eq!(record.request_key, "req-1");
        assert_eq!(record.decision, SettlementDecision::PaymentReceived);
        assert_eq!(record.payload_sha256.len(), 64);
    }

    #[tokio::test]
    async fn declined_callback_reverses_request() {
        let h = harness();

        let result = h.handler.handle(command(GATEWAY_IP, &body("Declined"))).await.unwrap();

        assert!(matches!(
            result,
            HandleGatewayCallbackResult::Accepted {
                decision: SettlementDecision::PaymentReinstated,
                ..
            }
        ));
        assert_eq!(state_of(&h).await, PurchaseRequestState::Reversed);
    }

    #[tokio::test]
    async fn unknown_status_is_accepted_without_settlement() {
        let h = harness();

        let result = h.handler.handle(command(GATEWAY_IP, &body("Pending"))).await.unwrap();

        match result {
            HandleGatewayCallbackResult::Accepted {
                decision,
                settlement,
                anomaly,
            } => {
                assert!(decision.is_none());
                assert!(settlement.is_none());
                assert_eq!(anomaly.as_deref(), Some("invalid transaction status: Pending"));
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
        assert_eq!(state_of(&h).await, PurchaseRequestState::Pending);
        assert!(h.processed.is_empty().await);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejections and redelivery
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn rejected_callback_changes_nothing() {
        let h = harness();

        let result = h.handler.handle(command("10.0.0.1", &body("Paid"))).await.unwrap();

        assert_eq!(
            result,
            HandleGatewayCallbackResult::Rejected {
                reason: "invalid IP address".to_string(),
                kind: RejectionKind::Source,
                severity: LogSeverity::Error,
            }
        );
        assert_eq!(state_of(&h).await, PurchaseRequestState::Pending);
        assert!(h.processed.is_empty().await);
    }

    #[tokio::test]
    async fn redelivery_is_skipped_with_info_severity() {
        let h = harness();
        h.handler.handle(command(GATEWAY_IP, &body("Paid"))).await.unwrap();

        let result = h.handler.handle(command(GATEWAY_IP, &body("Paid"))).await.unwrap();

        assert_eq!(
            result,
            HandleGatewayCallbackResult::Rejected {
                reason: ALREADY_PROCESSED.to_string(),
                kind: RejectionKind::Platform,
                severity: LogSeverity::Info,
            }
        );
        assert_eq!(h.processed.len().await, 1);
    }

    #[tokio::test]
    async fn settlement_failure_propagates_and_leaves_no_record() {
        let (handler, processed) = build(Arc::new(FailingSettlementStore));

        let err = handler
            .handle(command(GATEWAY_IP, &body("Paid")))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(processed.is_empty().await);
    }

    #[tokio::test]
    async fn received_at_comes_from_clock() {
        struct FixedClock(Timestamp);
        impl Clock for FixedClock {
            fn now(&self) -> Timestamp {
                self.0
            }
        }

        let fixed = Timestamp::from_datetime(
            chrono::DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        );
        let h = harness();
        let handler = HandleGatewayCallbackHandler {
            clock: Arc::new(FixedClock(fixed)),
            ..h.handler
        };

        handler.handle(command(GATEWAY_IP, &body("Paid"))).await.unwrap();

        let record = h.processed.find_by_transaction_id("tx-1").await.unwrap().unwrap();
        assert_eq!(record.processed_at, *fixed.as_datetime());
    }
}
