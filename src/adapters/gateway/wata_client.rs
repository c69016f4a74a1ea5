//! Wata H2H API client.
//!
//! Implements `PublicKeySource` and `PaymentLinkProvider` over the
//! gateway's REST API:
//!
//! - `GET {base}public-key` returns `{"value": "<PEM>"}`
//! - `POST {base}links` with a bearer token returns `{"id": .., "url": ..}`
//!
//! # Configuration
//!
//! ```ignore
//! let config = WataClientConfig::new("https://api.wata.pro/api/h2h/")
//!     .with_timeout(Duration::from_secs(10));
//! let client = WataGatewayClient::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::purchase::money::format_amount;
use crate::ports::{GatewayError, PaymentLink, PaymentLinkProvider, PaymentLinkRequest, PublicKeySource};

/// Production API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.wata.pro/api/h2h/";

/// Maximum characters of a gateway error body kept for logs and errors.
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct WataClientConfig {
    api_base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl WataClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let mut api_base_url = api_base_url.into();
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }
        Self {
            api_base_url,
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Overall per-request timeout. The connect timeout is capped by it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

impl Default for WataClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

#[derive(Debug, Deserialize)]
struct PublicKeyResponse {
    value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateLinkBody<'a> {
    amount: String,
    currency: &'a str,
    description: String,
    order_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct CreateLinkResponse {
    id: Option<String>,
    url: Option<String>,
    error: Option<String>,
}

/// HTTP client for the Wata gateway.
pub struct WataGatewayClient {
    config: WataClientConfig,
    http_client: reqwest::Client,
}

impl WataGatewayClient {
    pub fn new(config: WataClientConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &WataClientConfig {
        &self.config
    }
}

#[async_trait]
impl PublicKeySource for WataGatewayClient {
    async fn fetch_public_key_pem(&self) -> Result<String, GatewayError> {
        let url = self.config.endpoint("public-key");
        tracing::debug!(url = %url, "Fetching gateway public key");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch gateway public key");
                GatewayError::Network(e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = truncate_body(&response.text().await.unwrap_or_default());
            tracing::error!(status = status.as_u16(), body = %body, "Public key endpoint returned error");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PublicKeyResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse public key response");
            GatewayError::InvalidResponse(e.to_string())
        })?;

        match parsed.value.filter(|v| !v.trim().is_empty()) {
            Some(pem) => Ok(pem),
            None => {
                tracing::error!("Public key response has no value");
                Err(GatewayError::InvalidResponse(
                    "missing 'value' in public key response".to_string(),
                ))
            }
        }
    }
}

#[async_trait]
impl PaymentLinkProvider for WataGatewayClient {
    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
        token: &SecretString,
    ) -> Result<PaymentLink, GatewayError> {
        let url = self.config.endpoint("links");
        let body = CreateLinkBody {
            amount: format_amount(request.amount),
            currency: &request.currency,
            description: request.description(),
            order_id: &request.request_key,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(request_key = %request.request_key, error = %e, "Payment link request failed");
                GatewayError::Network(e.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let parsed: CreateLinkResponse = serde_json::from_str(&text).unwrap_or_default();

        let id = parsed.id.filter(|s| !s.is_empty());
        let link_url = parsed.url.filter(|s| !s.is_empty());

        match (status.as_u16(), id, link_url) {
            (200, Some(id), Some(url)) => {
                tracing::info!(request_key = %request.request_key, link_id = %id, "Payment link created");
                Ok(PaymentLink { id, url })
            }
            (200, _, _) => Err(GatewayError::InvalidResponse(
                parsed
                    .error
                    .unwrap_or_else(|| "missing id or url in link response".to_string()),
            )),
            (code, _, _) => {
                let body = truncate_body(parsed.error.as_deref().unwrap_or(&text));
                tracing::error!(
                    request_key = %request.request_key,
                    status = code,
                    body = %body,
                    "Payment link creation failed"
                );
                Err(GatewayError::Status { status: code, body })
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
