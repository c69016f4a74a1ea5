//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Gateway Ports
//!
//! - `KeyProvider` - Cached access to the gateway's signing key
//! - `PublicKeySource` - Raw key fetch from the gateway
//! - `PaymentLinkProvider` - Hosted payment link creation
//!
//! ## Persistence Ports
//!
//! - `PurchaseRequestStore` - Issued purchase requests and their settlement
//! - `PaymentProfileStore` - Provider bindings
//! - `ProcessedCallbackRepository` - Redelivery tracking
//!
//! ## Other
//!
//! - `PlatformValidator` - Host-platform validation hook
//! - `Clock` - Injected time source

mod clock;
mod gateway;
mod key_provider;
mod payment_profile_store;
mod platform_validator;
mod processed_callback_repository;
mod purchase_request_store;

pub use clock::{Clock, SystemClock};
pub use gateway::{GatewayError, PaymentLink, PaymentLinkProvider, PaymentLinkRequest, PublicKeySource};
pub use key_provider::{KeyProvider, KeyUnavailable};
pub use payment_profile_store::PaymentProfileStore;
pub use platform_validator::PlatformValidator;
pub use processed_callback_repository::{ProcessedCallbackRecord, ProcessedCallbackRepository, SaveResult};
pub use purchase_request_store::PurchaseRequestStore;
