//! In-memory payment profile store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PaymentProfileId};
use crate::domain::purchase::PaymentProfile;
use crate::ports::PaymentProfileStore;

#[derive(Default)]
pub struct InMemoryPaymentProfileStore {
    profiles: RwLock<HashMap<PaymentProfileId, PaymentProfile>>,
}

impl InMemoryPaymentProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = PaymentProfile>) -> Self {
        let map = profiles.into_iter().map(|p| (p.id(), p)).collect();
        Self {
            profiles: RwLock::new(map),
        }
    }

    pub async fn insert(&self, profile: PaymentProfile) {
        self.profiles.write().await.insert(profile.id(), profile);
    }
}

#[async_trait]
impl PaymentProfileStore for InMemoryPaymentProfileStore {
    async fn get(&self, id: PaymentProfileId) -> Result<Option<PaymentProfile>, DomainError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }
}
