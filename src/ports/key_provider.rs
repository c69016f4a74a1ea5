//! KeyProvider port - the gateway's current signing key.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::signature::PublicKey;

/// The signing key could not be obtained.
///
/// Callers treat this as a failed signature check; it never aborts the
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("gateway public key unavailable: {reason}")]
pub struct KeyUnavailable {
    pub reason: String,
}

impl KeyUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Provides the public key used to verify callback signatures.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Returns the current key, fetching it if no usable key is cached.
    async fn public_key(&self) -> Result<PublicKey, KeyUnavailable>;

    /// Drops any cached key so the next call fetches a fresh one.
    async fn invalidate(&self);
}
