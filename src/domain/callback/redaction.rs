//! Log-safe views of a callback.
//!
//! Rejection logs carry enough to investigate a delivery without writing
//! payer PII or the raw body to the log stream: the email is masked and the
//! body is reduced to its length and a SHA-256 fingerprint.

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::fields::CallbackFields;
use super::state::CallbackState;

/// Masks an email address, keeping the first character and the domain.
///
/// `jane@example.com` becomes `j***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        },
        None => "***".to_string(),
    }
}

/// Lowercase hex SHA-256 of the payload.
pub fn payload_fingerprint(payload: &[u8]) -> String {
    hex_encode(&Sha256::digest(payload))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Structured details attached to callback log entries.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackLogDetails {
    pub ip: String,
    /// Unix seconds at receipt.
    pub request_time: i64,
    pub input: CallbackFields,
    pub payload_length: usize,
    pub payload_sha256: String,
}

impl CallbackLogDetails {
    pub fn from_state(state: &CallbackState) -> Self {
        let mut input = state.fields().clone();
        input.email = input.email.as_deref().map(mask_email);

        Self {
            ip: state.source_ip().to_string(),
            request_time: state.received_at().unix_seconds(),
            input,
            payload_length: state.raw_payload().len(),
            payload_sha256: payload_fingerprint(state.raw_payload()),
        }
    }

    /// Compact JSON for a single log field.
    pub fn to_log_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::callback::{CallbackParser, InboundCallback};

    #[test]
    fn masks_email_local_part() {
        assert_eq!(mask_email("jane@example.com"), "j***@example.com");
        assert_eq!(mask_email("@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        assert_eq!(
            payload_fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn log_details_never_contain_raw_email_or_body() {
        let body = br#"{"email":"jane.doe@example.com","orderId":"r-1","amount":5}"#;
        let state = CallbackParser::new().parse(InboundCallback::new(
            "wata",
            "62.84.126.140",
            None,
            body.to_vec(),
        ));

        let details = CallbackLogDetails::from_state(&state);
        let logged = details.to_log_string();

        assert!(!logged.contains("jane.doe"));
        assert!(logged.contains("j***@example.com"));
        assert!(logged.contains("\"orderId\":\"r-1\""));
        assert_eq!(details.payload_length, body.len());
        assert_eq!(details.ip, "62.84.126.140");
    }
}
