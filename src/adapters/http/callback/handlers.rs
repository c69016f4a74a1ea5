//! HTTP handlers for the payment endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::SecretString;

use crate::adapters::http::client_ip::client_ip;
use crate::application::handlers::callback::{
    CreatePaymentLinkCommand, CreatePaymentLinkHandler, HandleGatewayCallbackCommand,
    HandleGatewayCallbackHandler, HandleGatewayCallbackResult,
};
use crate::domain::callback::{LogSeverity, RejectionKind};
use crate::domain::foundation::{DomainError, ErrorCode};

use super::dto::{CallbackAckResponse, CallbackQuery, ErrorResponse, PaymentLinkResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Request-independent settings of the callback route.
#[derive(Debug, Clone)]
pub struct CallbackHttpSettings {
    /// Header carrying the detached signature.
    pub signature_header: String,
    /// Provider id used when the query string names none.
    pub default_provider_id: String,
    pub trust_forwarded_for: bool,
    /// Bearer key guarding the payment-link route.
    pub links_api_key: Option<SecretString>,
}

impl Default for CallbackHttpSettings {
    fn default() -> Self {
        Self {
            signature_header: "X-Signature".to_string(),
            default_provider_id: "wata".to_string(),
            trust_forwarded_for: false,
            links_api_key: None,
        }
    }
}

/// Shared state for the payment endpoints.
#[derive(Clone)]
pub struct CallbackAppState {
    pub callbacks: Arc<HandleGatewayCallbackHandler>,
    pub payment_links: Arc<CreatePaymentLinkHandler>,
    pub settings: Arc<CallbackHttpSettings>,
}

impl CallbackAppState {
    pub fn new(
        callbacks: HandleGatewayCallbackHandler,
        payment_links: CreatePaymentLinkHandler,
        settings: CallbackHttpSettings,
    ) -> Self {
        Self {
            callbacks: Arc::new(callbacks),
            payment_links: Arc::new(payment_links),
            settings: Arc::new(settings),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payment/callback - Gateway notification
pub async fn handle_callback(
    State(state): State<CallbackAppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, CallbackApiError> {
    let settings = &state.settings;

    let source_ip = client_ip(&headers, connect_info.as_ref(), settings.trust_forwarded_for)
        .unwrap_or_default();
    let signature = headers
        .get(settings.signature_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let provider_id = query
        .provider
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| settings.default_provider_id.clone());

    let cmd = HandleGatewayCallbackCommand {
        provider_id,
        source_ip,
        signature,
        body,
    };

    match state.callbacks.handle(cmd).await? {
        HandleGatewayCallbackResult::Accepted { .. } => {
            Ok((StatusCode::OK, Json(CallbackAckResponse::ok())).into_response())
        }
        HandleGatewayCallbackResult::Rejected {
            reason,
            kind: RejectionKind::Platform,
            severity: LogSeverity::Info,
        } => Ok((StatusCode::OK, Json(CallbackAckResponse::ignored(reason))).into_response()),
        HandleGatewayCallbackResult::Rejected { reason, kind, .. } => {
            Err(CallbackApiError::Rejected { kind, reason })
        }
    }
}

/// POST /api/payment/links/:request_key - Create a hosted payment link
pub async fn create_payment_link(
    State(state): State<CallbackAppState>,
    Path(request_key): Path<String>,
) -> Result<impl IntoResponse, CallbackApiError> {
    let result = state
        .payment_links
        .handle(CreatePaymentLinkCommand { request_key })
        .await?;

    Ok(Json(PaymentLinkResponse { url: result.url }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error that converts to HTTP responses.
#[derive(Debug)]
pub enum CallbackApiError {
    /// Callback failed validation.
    Rejected { kind: RejectionKind, reason: String },
    /// Store or gateway failure.
    Domain(DomainError),
}

impl From<DomainError> for CallbackApiError {
    fn from(err: DomainError) -> Self {
        CallbackApiError::Domain(err)
    }
}

impl IntoResponse for CallbackApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            CallbackApiError::Rejected { kind, reason } => {
                let (status, code) = match kind {
                    RejectionKind::Integrity => (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE"),
                    RejectionKind::Source => (StatusCode::FORBIDDEN, "FORBIDDEN_SOURCE"),
                    RejectionKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
                    RejectionKind::Platform => (StatusCode::BAD_REQUEST, "PLATFORM_REJECTED"),
                };
                (status, code.to_string(), reason)
            }
            CallbackApiError::Domain(err) => {
                let status = match err.code {
                    ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => {
                        StatusCode::BAD_REQUEST
                    }
                    ErrorCode::PurchaseRequestNotFound | ErrorCode::PaymentProfileNotFound => {
                        StatusCode::NOT_FOUND
                    }
                    ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
                    ErrorCode::UnsupportedCurrency => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorCode::GatewayError => StatusCode::BAD_GATEWAY,
                    ErrorCode::DatabaseError | ErrorCode::InternalError => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                // Infrastructure details stay in the logs
                let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
                    "Internal error".to_string()
                } else {
                    err.message
                };
                (status, err.code.to_string(), message)
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
