//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `gateway` - Wata H2H API client and the cached key provider
//! - `http` - Axum routes for callbacks, payment links and health
//! - `memory` - In-memory stores (tests, database-less deployments)
//! - `postgres` - PostgreSQL stores

pub mod gateway;
pub mod http;
pub mod memory;
pub mod postgres;

pub use gateway::{CachedKeyProvider, RefreshPolicy, WataClientConfig, WataGatewayClient};
pub use memory::{
    InMemoryPaymentProfileStore, InMemoryProcessedCallbackRepository,
    InMemoryPurchaseRequestStore,
};
pub use postgres::{
    PostgresPaymentProfileStore, PostgresProcessedCallbackRepository,
    PostgresPurchaseRequestStore,
};
