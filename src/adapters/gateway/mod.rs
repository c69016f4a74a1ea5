//! Wata gateway adapters.
//!
//! - `wata_client` - reqwest client for the gateway API
//! - `key_cache` - `KeyProvider` with lazy fetch and optional refresh

mod key_cache;
mod wata_client;

pub use key_cache::{CachedKeyProvider, RefreshPolicy};
pub use wata_client::{WataClientConfig, WataGatewayClient, DEFAULT_API_BASE_URL};
