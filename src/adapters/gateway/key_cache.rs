//! Cached gateway public key.
//!
//! The key is fetched lazily on first use and kept in memory. With
//! `RefreshPolicy::Ttl` an entry older than the TTL is refetched; if that
//! refetch fails the stale key keeps being served. Concurrent misses share a
//! single fetch, and after a failed fetch no new attempt is made until
//! `REFRESH_RETRY_INTERVAL` has passed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::Timestamp;
use crate::domain::signature::PublicKey;
use crate::ports::{Clock, GatewayError, KeyProvider, KeyUnavailable, PublicKeySource};

/// Minimum gap between a failed fetch and the next attempt.
pub const REFRESH_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// When a cached key is considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Keep the first key for the life of the process.
    Never,
    /// Refetch once the cached key is older than the duration.
    Ttl(Duration),
}

impl RefreshPolicy {
    /// `0` means never refresh.
    pub fn from_ttl_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::Never
        } else {
            Self::Ttl(Duration::from_secs(secs))
        }
    }

    fn is_stale(&self, fetched_at: Timestamp, now: Timestamp) -> bool {
        match self {
            Self::Never => false,
            Self::Ttl(ttl) => now
                .duration_since(&fetched_at)
                .to_std()
                .map(|age| age >= *ttl)
                .unwrap_or(false),
        }
    }
}

struct CachedKey {
    key: PublicKey,
    fetched_at: Timestamp,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CachedKey>,
    last_failure: Option<Timestamp>,
}

impl CacheState {
    fn current_key(&self) -> Option<PublicKey> {
        self.entry.as_ref().map(|c| c.key.clone())
    }
}

enum Lookup {
    Fresh(PublicKey),
    /// A recent fetch failed; carries the stale key if there is one.
    BackingOff(Option<PublicKey>),
    Expired,
}

/// `KeyProvider` backed by a `PublicKeySource` with an in-memory cache.
pub struct CachedKeyProvider {
    source: Arc<dyn PublicKeySource>,
    clock: Arc<dyn Clock>,
    policy: RefreshPolicy,
    state: RwLock<CacheState>,
    fetch_gate: Mutex<()>,
}

impl CachedKeyProvider {
    pub fn new(
        source: Arc<dyn PublicKeySource>,
        clock: Arc<dyn Clock>,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            source,
            clock,
            policy,
            state: RwLock::new(CacheState::default()),
            fetch_gate: Mutex::new(()),
        }
    }

    async fn lookup(&self) -> Lookup {
        let state = self.state.read().await;
        let now = self.clock.now();

        if let Some(cached) = &state.entry {
            if !self.policy.is_stale(cached.fetched_at, now) {
                return Lookup::Fresh(cached.key.clone());
            }
        }

        if let Some(failed_at) = state.last_failure {
            let retry_pending = now
                .duration_since(&failed_at)
                .to_std()
                .map(|since| since < REFRESH_RETRY_INTERVAL)
                .unwrap_or(true);
            if retry_pending {
                return Lookup::BackingOff(state.current_key());
            }
        }

        Lookup::Expired
    }

    async fn fetch(&self) -> Result<PublicKey, GatewayError> {
        let pem = self.source.fetch_public_key_pem().await?;
        PublicKey::from_pem(&pem).map_err(|e| GatewayError::InvalidKey(e.to_string()))
    }
}

fn backing_off(stale: Option<PublicKey>) -> Result<PublicKey, KeyUnavailable> {
    stale.ok_or_else(|| KeyUnavailable::new("last fetch failed, waiting before retrying"))
}

#[async_trait]
impl KeyProvider for CachedKeyProvider {
    async fn public_key(&self) -> Result<PublicKey, KeyUnavailable> {
        match self.lookup().await {
            Lookup::Fresh(key) => return Ok(key),
            Lookup::BackingOff(stale) => return backing_off(stale),
            Lookup::Expired => {}
        }

        let _gate = self.fetch_gate.lock().await;

        // Another caller may have fetched, or failed to, while we waited.
        match self.lookup().await {
            Lookup::Fresh(key) => return Ok(key),
            Lookup::BackingOff(stale) => return backing_off(stale),
            Lookup::Expired => {}
        }

        let fetched = self.fetch().await;
        let mut state = self.state.write().await;
        match fetched {
            Ok(key) => {
                tracing::info!(bits = key.bits(), "Gateway public key cached");
                state.entry = Some(CachedKey {
                    key: key.clone(),
                    fetched_at: self.clock.now(),
                });
                state.last_failure = None;
                Ok(key)
            }
            Err(e) => {
                state.last_failure = Some(self.clock.now());
                match state.current_key() {
                    Some(key) => {
                        tracing::warn!(error = %e, "Key refresh failed, serving stale gateway key");
                        Ok(key)
                    }
                    None => {
                        tracing::error!(error = %e, "Gateway public key unavailable");
                        Err(KeyUnavailable::new(e.to_string()))
                    }
                }
            }
        }
    }

    async fn invalidate(&self) {
        *self.state.write().await = CacheState::default();
        tracing::info!("Gateway public key cache cleared");
    }
}
