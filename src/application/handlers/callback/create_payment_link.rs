//! CreatePaymentLinkHandler - Command handler for hosted payment links.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::purchase::PurchaseRequestState;
use crate::ports::{
    GatewayError, PaymentLinkProvider, PaymentLinkRequest, PaymentProfileStore,
    PurchaseRequestStore,
};

/// Command to create a payment link for a pending purchase request.
#[derive(Debug, Clone)]
pub struct CreatePaymentLinkCommand {
    pub request_key: String,
}

/// Result of creating a payment link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentLinkResult {
    /// Gateway link id, stored as the request's provider metadata.
    pub link_id: String,
    /// URL the payer is redirected to.
    pub url: String,
}

/// Handler for creating hosted payment links.
pub struct CreatePaymentLinkHandler {
    purchase_requests: Arc<dyn PurchaseRequestStore>,
    payment_profiles: Arc<dyn PaymentProfileStore>,
    links: Arc<dyn PaymentLinkProvider>,
    supported_currencies: Vec<String>,
    fallback_token: SecretString,
}

impl CreatePaymentLinkHandler {
    /// `fallback_token` is used when the request's payment profile carries
    /// no token of its own.
    pub fn new(
        purchase_requests: Arc<dyn PurchaseRequestStore>,
        payment_profiles: Arc<dyn PaymentProfileStore>,
        links: Arc<dyn PaymentLinkProvider>,
        supported_currencies: Vec<String>,
        fallback_token: SecretString,
    ) -> Self {
        Self {
            purchase_requests,
            payment_profiles,
            links,
            supported_currencies,
            fallback_token,
        }
    }

    fn supports_currency(&self, currency: &str) -> bool {
        self.supported_currencies.iter().any(|c| c == currency)
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentLinkCommand,
    ) -> Result<CreatePaymentLinkResult, DomainError> {
        // 1. Load the purchase request
        let request = self
            .purchase_requests
            .find_by_key(&cmd.request_key)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PurchaseRequestNotFound,
                    format!("Purchase request not found: {}", cmd.request_key),
                )
            })?;

        if request.state() != PurchaseRequestState::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Payment links can only be created for pending purchase requests",
            )
            .with_detail("state", request.state().as_str()));
        }

        // 2. Currency must be one the gateway accepts
        if !self.supports_currency(request.cost_currency()) {
            return Err(DomainError::new(
                ErrorCode::UnsupportedCurrency,
                format!("Currency not supported: {}", request.cost_currency()),
            ));
        }

        // 3. Resolve the provider credential
        let profile = self
            .payment_profiles
            .get(request.payment_profile_id())
            .await?
            .filter(|p| p.is_active())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PaymentProfileNotFound,
                    format!(
                        "No active payment profile {}",
                        request.payment_profile_id().value()
                    ),
                )
            })?;

        let token = if profile.has_token() {
            profile.token()
        } else {
            &self.fallback_token
        };

        // 4. Ask the gateway for a link
        let link_request = PaymentLinkRequest {
            request_key: request.request_key().to_string(),
            amount: request.cost_amount(),
            currency: request.cost_currency().to_string(),
        };

        let link = self
            .links
            .create_payment_link(&link_request, token)
            .await
            .map_err(|e| gateway_failure(&cmd.request_key, e))?;

        // 5. Remember the link id against the request
        self.purchase_requests
            .attach_provider_metadata(request.request_key(), &link.id)
            .await?;

        tracing::info!(
            request_key = %cmd.request_key,
            link_id = %link.id,
            "Payment link created"
        );

        Ok(CreatePaymentLinkResult {
            link_id: link.id,
            url: link.url,
        })
    }
}

fn gateway_failure(request_key: &str, err: GatewayError) -> DomainError {
    tracing::error!(request_key = %request_key, error = %err, "Payment link creation failed");
    DomainError::new(ErrorCode::GatewayError, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPaymentProfileStore, InMemoryPurchaseRequestStore};
    use crate::domain::foundation::PaymentProfileId;
    use crate::domain::purchase::{PaymentProfile, PurchaseRequest};
    use crate::ports::PaymentLink;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use secrecy::ExposeSecret;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock implementations
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct MockLinkProvider {
        calls: Mutex<Vec<(PaymentLinkRequest, String)>>,
        fail: bool,
    }

    impl MockLinkProvider {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(PaymentLinkRequest, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentLinkProvider for MockLinkProvider {
        async fn create_payment_link(
            &self,
            request: &PaymentLinkRequest,
            token: &SecretString,
        ) -> Result<PaymentLink, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((request.clone(), token.expose_secret().clone()));
            if self.fail {
                return Err(GatewayError::Status {
                    status: 400,
                    body: "Amount is too small".to_string(),
                });
            }
            Ok(PaymentLink {
                id: "link-42".to_string(),
                url: "https://pay.wata.pro/link-42".to_string(),
            })
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    fn profile_id() -> PaymentProfileId {
        PaymentProfileId::new(7).unwrap()
    }

    fn request(currency: &str) -> PurchaseRequest {
        PurchaseRequest::new("req-9", profile_id(), Decimal::new(2550, 2), currency).unwrap()
    }

    fn profile(token: &str, active: bool) -> PaymentProfile {
        PaymentProfile::new(profile_id(), "wata", SecretString::new(token.to_string()), active)
    }

    struct Harness {
        handler: CreatePaymentLinkHandler,
        requests: Arc<InMemoryPurchaseRequestStore>,
        links: Arc<MockLinkProvider>,
    }

    fn harness(request: PurchaseRequest, profile: PaymentProfile, links: MockLinkProvider) -> Harness {
        let requests = Arc::new(InMemoryPurchaseRequestStore::with_requests(vec![request]));
        let profiles = Arc::new(InMemoryPaymentProfileStore::with_profiles(vec![profile]));
        let links = Arc::new(links);
        let handler = CreatePaymentLinkHandler::new(
            requests.clone(),
            profiles,
            links.clone(),
            vec!["USD".to_string(), "EUR".to_string(), "RUB".to_string()],
            SecretString::new("fallback-token".to_string()),
        );
        Harness {
            handler,
            requests,
            links,
        }
    }

    fn cmd() -> CreatePaymentLinkCommand {
        CreatePaymentLinkCommand {
            request_key: "req-9".to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_link_and_attaches_metadata() {
        let h = harness(request("EUR"), profile("profile-token", true), MockLinkProvider::default());

        let result = h.handler.handle(cmd()).await.unwrap();

        assert_eq!(result.link_id, "link-42");
        assert_eq!(result.url, "https://pay.wata.pro/link-42");

        let calls = h.links.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.amount, Decimal::new(2550, 2));
        assert_eq!(calls[0].0.currency, "EUR");
        assert_eq!(calls[0].1, "profile-token");

        let stored = h.requests.find_by_key("req-9").await.unwrap().unwrap();
        assert_eq!(stored.provider_metadata(), Some("link-42"));
    }

    #[tokio::test]
    async fn uses_fallback_token_when_profile_has_none() {
        let h = harness(request("USD"), profile("  ", true), MockLinkProvider::default());

        h.handler.handle(cmd()).await.unwrap();

        assert_eq!(h.links.calls()[0].1, "fallback-token");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failures
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let h = harness(request("EUR"), profile("t", true), MockLinkProvider::default());

        let err = h
            .handler
            .handle(CreatePaymentLinkCommand {
                request_key: "missing".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PurchaseRequestNotFound);
        assert!(h.links.calls().is_empty());
    }

    #[tokio::test]
    async fn unsupported_currency_is_rejected_before_gateway_call() {
        let h = harness(request("GBP"), profile("t", true), MockLinkProvider::default());

        let err = h.handler.handle(cmd()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::UnsupportedCurrency);
        assert!(h.links.calls().is_empty());
    }

    #[tokio::test]
    async fn settled_request_cannot_get_new_link() {
        let settled = request("EUR").with_state(PurchaseRequestState::Completed);
        let h = harness(settled, profile("t", true), MockLinkProvider::default());

        let err = h.handler.handle(cmd()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn inactive_profile_is_not_found() {
        let h = harness(request("EUR"), profile("t", false), MockLinkProvider::default());

        let err = h.handler.handle(cmd()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PaymentProfileNotFound);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_metadata_untouched() {
        let h = harness(request("EUR"), profile("t", true), MockLinkProvider::failing());

        let err = h.handler.handle(cmd()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::GatewayError);
        assert!(err.message.contains("Amount is too small"));
        let stored = h.requests.find_by_key("req-9").await.unwrap().unwrap();
        assert_eq!(stored.provider_metadata(), None);
    }
}
