//! PaymentProfileStore port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentProfileId};
use crate::domain::purchase::PaymentProfile;

/// Read access to payment profiles.
#[async_trait]
pub trait PaymentProfileStore: Send + Sync {
    /// Returns the profile, or `None` if it does not exist.
    async fn get(&self, id: PaymentProfileId) -> Result<Option<PaymentProfile>, DomainError>;
}
