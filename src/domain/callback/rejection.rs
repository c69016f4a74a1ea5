//! Rejection reasons and severities.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Severity a rejection or anomaly is logged at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    /// Expected condition, such as a redelivered notification.
    Info,
    Error,
}

/// Broad class of a rejection, used for logging and HTTP mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// The request is not from the allow-listed gateway addresses.
    Source,
    /// Signature missing or not verifiable. Possible forgery.
    Integrity,
    /// Content does not match a known, open purchase request.
    Validation,
    /// Raised by the host platform's hook.
    Platform,
}

/// Reasons the core validator rejects a callback.
///
/// Display strings are stable; they are logged and returned to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RejectionReason {
    #[error("invalid IP address")]
    InvalidIpAddress,

    #[error("empty signature")]
    EmptySignature,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid provider")]
    InvalidProvider,

    #[error("missing transaction data")]
    MissingTransactionData,

    #[error("invalid purchase request")]
    InvalidPurchaseRequest,

    #[error("invalid payment amount")]
    InvalidPaymentAmount,

    #[error("invalid payment currency")]
    InvalidPaymentCurrency,
}

impl RejectionReason {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::InvalidIpAddress => RejectionKind::Source,
            Self::EmptySignature | Self::InvalidSignature => RejectionKind::Integrity,
            _ => RejectionKind::Validation,
        }
    }

    /// Returns true for failures that may indicate a forged notification.
    pub fn is_integrity_failure(&self) -> bool {
        self.kind() == RejectionKind::Integrity
    }
}

/// Rejection raised by a `PlatformValidator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRejection {
    pub message: String,
    pub severity: LogSeverity,
}

impl PlatformRejection {
    /// An expected rejection that should be acknowledged, not retried.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: LogSeverity::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: LogSeverity::Error,
        }
    }
}

impl fmt::Display for PlatformRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Why a callback ended up `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Core(RejectionReason),
    Platform(PlatformRejection),
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::Core(reason) => reason.kind(),
            Self::Platform(_) => RejectionKind::Platform,
        }
    }

    pub fn severity(&self) -> LogSeverity {
        match self {
            Self::Core(_) => LogSeverity::Error,
            Self::Platform(p) => p.severity,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(reason) => write!(f, "{}", reason),
            Self::Platform(p) => write!(f, "{}", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_display_exact_messages() {
        let cases = [
            (RejectionReason::InvalidIpAddress, "invalid IP address"),
            (RejectionReason::EmptySignature, "empty signature"),
            (RejectionReason::InvalidSignature, "invalid signature"),
            (RejectionReason::InvalidProvider, "invalid provider"),
            (RejectionReason::MissingTransactionData, "missing transaction data"),
            (RejectionReason::InvalidPurchaseRequest, "invalid purchase request"),
            (RejectionReason::InvalidPaymentAmount, "invalid payment amount"),
            (RejectionReason::InvalidPaymentCurrency, "invalid payment currency"),
        ];
        for (reason, expected) in cases {
            assert_eq!(reason.to_string(), expected);
        }
    }

    #[test]
    fn signature_failures_are_integrity_failures() {
        assert!(RejectionReason::EmptySignature.is_integrity_failure());
        assert!(RejectionReason::InvalidSignature.is_integrity_failure());
        assert!(!RejectionReason::InvalidPaymentAmount.is_integrity_failure());
        assert_eq!(RejectionReason::InvalidIpAddress.kind(), RejectionKind::Source);
    }

    #[test]
    fn platform_rejection_keeps_its_severity() {
        let rejection = Rejection::Platform(PlatformRejection::info("already done"));
        assert_eq!(rejection.severity(), LogSeverity::Info);
        assert_eq!(rejection.kind(), RejectionKind::Platform);
        assert_eq!(rejection.to_string(), "already done");
    }

    #[test]
    fn core_rejections_are_errors() {
        assert_eq!(
            Rejection::Core(RejectionReason::InvalidProvider).severity(),
            LogSeverity::Error
        );
    }
}
