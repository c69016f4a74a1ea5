//! Gateway ports - outbound calls to the payment gateway's API.
//!
//! Two narrow capabilities are needed: fetching the current signing key for
//! callback verification, and creating a hosted payment link for a purchase
//! request. Neither is retried inline.

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from gateway API calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transport failure (DNS, connect, timeout).
    #[error("gateway request failed: {0}")]
    Network(String),

    /// Non-success HTTP status. `body` is truncated for logging.
    #[error("gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    /// Key material could not be parsed.
    #[error("invalid gateway public key: {0}")]
    InvalidKey(String),
}

/// Source of the gateway's PEM-encoded public signing key.
#[async_trait]
pub trait PublicKeySource: Send + Sync {
    /// Fetches the current public key PEM.
    async fn fetch_public_key_pem(&self) -> Result<String, GatewayError>;
}

/// Request for a hosted payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLinkRequest {
    pub request_key: String,
    pub amount: Decimal,
    pub currency: String,
}

impl PaymentLinkRequest {
    /// Description shown to the payer on the gateway page.
    pub fn description(&self) -> String {
        format!("Order #{}", self.request_key)
    }
}

/// Hosted payment link returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Gateway-side identifier, stored as the request's provider metadata.
    pub id: String,
    /// URL the payer is redirected to.
    pub url: String,
}

/// Creates hosted payment links.
#[async_trait]
pub trait PaymentLinkProvider: Send + Sync {
    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
        token: &SecretString,
    ) -> Result<PaymentLink, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_uses_request_key() {
        let req = PaymentLinkRequest {
            request_key: "abc123".to_string(),
            amount: Decimal::new(2550, 2),
            currency: "EUR".to_string(),
        };
        assert_eq!(req.description(), "Order #abc123");
    }

    #[test]
    fn status_error_display_includes_code() {
        let err = GatewayError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "gateway returned HTTP 503: unavailable");
    }
}
