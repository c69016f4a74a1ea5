//! ProcessedCallbackRepository port - log of settled gateway transactions.
//!
//! The gateway may deliver the same notification more than once (timeouts,
//! retries after a non-2xx response). A transaction id that already produced
//! a settlement is recorded here and skipped on redelivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::{CallbackId, DomainError};
use crate::domain::purchase::{SettlementDecision, SettlementOutcome};

/// Record of a callback that produced a settlement decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedCallbackRecord {
    /// Gateway transaction id.
    pub transaction_id: String,

    /// Purchase request the transaction settled.
    pub request_key: String,

    /// Correlation id of the delivery that was processed.
    pub callback_id: CallbackId,

    /// Gateway-reported status ("Paid", "Declined").
    pub status: String,

    pub decision: SettlementDecision,

    /// Whether the settlement changed stored state.
    pub outcome: SettlementOutcome,

    /// SHA-256 fingerprint of the raw body, for audit.
    pub payload_sha256: String,

    pub processed_at: DateTime<Utc>,
}

impl ProcessedCallbackRecord {
    /// Storage representation of the outcome.
    pub fn outcome_str(&self) -> &'static str {
        match self.outcome {
            SettlementOutcome::Applied => "applied",
            SettlementOutcome::AlreadyApplied => "already_applied",
        }
    }
}

/// Result of attempting to save a processed callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// First record for this transaction id.
    Inserted,
    /// A record already existed (concurrent or repeated delivery).
    AlreadyExists,
}

/// Port for the processed-callback log.
///
/// Implementations should enforce uniqueness on `transaction_id` with a
/// database constraint so concurrent deliveries cannot both insert.
#[async_trait]
pub trait ProcessedCallbackRepository: Send + Sync {
    /// Finds the record for a transaction id, if any.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<ProcessedCallbackRecord>, DomainError>;

    /// Inserts a record unless one exists for the same transaction id.
    async fn save(&self, record: ProcessedCallbackRecord) -> Result<SaveResult, DomainError>;
}
