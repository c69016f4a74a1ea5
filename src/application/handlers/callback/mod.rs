//! Gateway callback handlers.
//!
//! ## Commands
//! - Processing inbound gateway notifications
//! - Creating hosted payment links

mod create_payment_link;
mod handle_gateway_callback;

pub use create_payment_link::{
    CreatePaymentLinkCommand, CreatePaymentLinkHandler, CreatePaymentLinkResult,
};
pub use handle_gateway_callback::{
    HandleGatewayCallbackCommand, HandleGatewayCallbackHandler, HandleGatewayCallbackResult,
};
