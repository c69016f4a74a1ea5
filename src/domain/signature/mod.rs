//! Signature domain module.
//!
//! Public key handling and detached-signature verification for gateway
//! callbacks.

mod public_key;
mod verifier;

pub use public_key::{KeyParseError, PublicKey};
pub use verifier::SignatureVerifier;

#[cfg(test)]
pub(crate) use verifier::test_fixtures;
