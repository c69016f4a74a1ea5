//! PlatformValidator port - host-platform checks run after the core checks.

use async_trait::async_trait;

use crate::domain::callback::{CallbackState, PlatformRejection};

/// Final validation step supplied by the hosting platform.
///
/// Invoked only after every gateway-level check has passed. A rejection is
/// propagated verbatim, including its severity.
#[async_trait]
pub trait PlatformValidator: Send + Sync {
    async fn validate(&self, state: &CallbackState) -> Result<(), PlatformRejection>;
}
