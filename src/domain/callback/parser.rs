//! Callback parsing.
//!
//! Turns an inbound HTTP delivery into a `CallbackState`. Parsing never
//! fails: unknown keys are dropped, wrong-typed or missing values become
//! `None`, and a body that is not a JSON object yields empty fields for the
//! validator to reject.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::domain::foundation::{CallbackId, Timestamp};
use crate::domain::purchase::money::parse_amount;

use super::fields::{CallbackFields, NUMERIC_FIELDS, STRING_FIELDS};
use super::state::CallbackState;

/// Status used when the gateway omits `transactionStatus`.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Transport-level facts about one delivery.
#[derive(Debug, Clone)]
pub struct InboundCallback {
    pub callback_id: CallbackId,
    pub received_at: Timestamp,
    /// Provider the caller claims to be (route/query supplied).
    pub provider_id: String,
    /// Peer address as observed by the transport.
    pub source_ip: String,
    /// Raw signature header value, if present.
    pub signature: Option<String>,
    /// Exact request body.
    pub body: Bytes,
}

impl InboundCallback {
    pub fn new(
        provider_id: impl Into<String>,
        source_ip: impl Into<String>,
        signature: Option<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            callback_id: CallbackId::new(),
            received_at: Timestamp::now(),
            provider_id: provider_id.into(),
            source_ip: source_ip.into(),
            signature,
            body: body.into(),
        }
    }

    pub fn with_received_at(mut self, received_at: Timestamp) -> Self {
        self.received_at = received_at;
        self
    }
}

/// Stateless parser for gateway notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallbackParser;

impl CallbackParser {
    pub fn new() -> Self {
        Self
    }

    /// Builds the initial, unvalidated callback state.
    pub fn parse(&self, inbound: InboundCallback) -> CallbackState {
        let fields = match serde_json::from_slice::<Value>(&inbound.body) {
            Ok(Value::Object(map)) => extract_fields(&map),
            Ok(_) => {
                tracing::debug!(callback_id = %inbound.callback_id, "Callback body is not a JSON object");
                CallbackFields::default()
            }
            Err(e) => {
                tracing::debug!(callback_id = %inbound.callback_id, error = %e, "Callback body is not valid JSON");
                CallbackFields::default()
            }
        };

        let signature = inbound
            .signature
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        CallbackState::new(
            inbound.callback_id,
            inbound.received_at,
            inbound.provider_id,
            inbound.source_ip.trim().to_string(),
            inbound.body,
            fields,
            signature,
        )
    }
}

fn extract_fields(map: &Map<String, Value>) -> CallbackFields {
    let mut fields = CallbackFields::default();
    for name in STRING_FIELDS {
        fields.set_string(name, map.get(name).and_then(coerce_string));
    }
    for name in NUMERIC_FIELDS {
        fields.set_number(name, map.get(name).and_then(coerce_decimal));
    }
    fields
}

fn coerce_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Numbers are read from their JSON text so no binary float rounding
/// occurs before the cost comparison.
fn coerce_decimal(value: &Value) -> Option<rust_decimal::Decimal> {
    match value {
        Value::Number(n) => parse_amount(&n.to_string()),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}
