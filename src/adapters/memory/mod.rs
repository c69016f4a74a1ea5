//! In-memory store adapters.
//!
//! Back the persistence ports with `tokio::sync::RwLock`-guarded maps. State
//! is lost on restart.

mod payment_profile_store;
mod processed_callback_repository;
mod purchase_request_store;

pub use payment_profile_store::InMemoryPaymentProfileStore;
pub use processed_callback_repository::InMemoryProcessedCallbackRepository;
pub use purchase_request_store::InMemoryPurchaseRequestStore;
