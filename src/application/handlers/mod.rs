//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod callback;

pub use callback::{
    CreatePaymentLinkCommand, CreatePaymentLinkHandler, CreatePaymentLinkResult,
    HandleGatewayCallbackCommand, HandleGatewayCallbackHandler, HandleGatewayCallbackResult,
};
