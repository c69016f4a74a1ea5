//! Request/response DTOs for the payment endpoints.

use serde::{Deserialize, Serialize};

/// Query string of the callback route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    /// Provider the gateway is configured to call as.
    #[serde(rename = "_xfProvider")]
    pub provider: Option<String>,
}

/// Acknowledgement returned to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackAckResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CallbackAckResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            reason: None,
        }
    }

    pub fn ignored(reason: impl Into<String>) -> Self {
        Self {
            status: "ignored".to_string(),
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentLinkResponse {
    pub url: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_ack_omits_reason() {
        let json = serde_json::to_value(CallbackAckResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn ignored_ack_carries_reason() {
        let json = serde_json::to_value(CallbackAckResponse::ignored("duplicate")).unwrap();
        assert_eq!(json["status"], "ignored");
        assert_eq!(json["reason"], "duplicate");
    }
}
