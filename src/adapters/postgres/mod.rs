//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPurchaseRequestStore` - Purchase requests and settlement
//! - `PostgresPaymentProfileStore` - Payment profiles
//! - `PostgresProcessedCallbackRepository` - Processed callback log
//!
//! Schema lives in `migrations/`.

mod payment_profile_store;
mod processed_callback_repository;
mod purchase_request_store;

pub use payment_profile_store::PostgresPaymentProfileStore;
pub use processed_callback_repository::PostgresProcessedCallbackRepository;
pub use purchase_request_store::PostgresPurchaseRequestStore;
