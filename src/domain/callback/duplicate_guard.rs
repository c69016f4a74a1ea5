//! Default platform validator: skip redelivered transactions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ports::{PlatformValidator, ProcessedCallbackRepository};

use super::rejection::PlatformRejection;
use super::state::CallbackState;

/// Message for a transaction that already produced a settlement.
pub const ALREADY_PROCESSED: &str = "Transaction already processed. Skipping.";

/// Rejects callbacks whose transaction id is already in the processed log.
///
/// The rejection is logged at info: redelivery is expected gateway
/// behaviour and is acknowledged rather than failed.
pub struct DuplicateDeliveryGuard {
    processed: Arc<dyn ProcessedCallbackRepository>,
}

impl DuplicateDeliveryGuard {
    pub fn new(processed: Arc<dyn ProcessedCallbackRepository>) -> Self {
        Self { processed }
    }
}

#[async_trait]
impl PlatformValidator for DuplicateDeliveryGuard {
    async fn validate(&self, state: &CallbackState) -> Result<(), PlatformRejection> {
        let Some(transaction_id) = state.transaction_id() else {
            return Ok(());
        };

        match self.processed.find_by_transaction_id(transaction_id).await {
            Ok(Some(_)) => Err(PlatformRejection::info(ALREADY_PROCESSED)),
            Ok(None) => Ok(()),
            Err(e) => {
                tracing::error!(
                    callback_id = %state.callback_id(),
                    transaction_id = %transaction_id,
                    error = %e,
                    "Processed callback lookup failed"
                );
                Err(PlatformRejection::error("unable to check transaction history"))
            }
        }
    }
}
