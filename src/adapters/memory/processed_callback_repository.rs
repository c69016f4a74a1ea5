//! In-memory processed callback log.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::{ProcessedCallbackRecord, ProcessedCallbackRepository, SaveResult};

#[derive(Default)]
pub struct InMemoryProcessedCallbackRepository {
    records: RwLock<HashMap<String, ProcessedCallbackRecord>>,
}

impl InMemoryProcessedCallbackRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProcessedCallbackRepository for InMemoryProcessedCallbackRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<ProcessedCallbackRecord>, DomainError> {
        Ok(self.records.read().await.get(transaction_id).cloned())
    }

    async fn save(&self, record: ProcessedCallbackRecord) -> Result<SaveResult, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.transaction_id) {
            return Ok(SaveResult::AlreadyExists);
        }
        records.insert(record.transaction_id.clone(), record);
        Ok(SaveResult::Inserted)
    }
}
