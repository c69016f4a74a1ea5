//! Detached signature verification over raw callback bodies.
//!
//! The gateway signs the exact request body with its private key (SHA-512
//! digest) and sends the base64 signature in a header. Verification runs
//! over the bytes as received; the body is never re-serialized first.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use openssl::hash::MessageDigest;
use openssl::sign::Verifier;

use super::PublicKey;

/// Verifies gateway signatures.
///
/// Stateless. Every failure mode (bad base64, unusable key, OpenSSL error,
/// mismatch) yields `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Returns true if `signature_b64` is a valid SHA-512 signature of
    /// `payload` under `key`.
    pub fn verify(&self, payload: &[u8], signature_b64: &str, key: &PublicKey) -> bool {
        let signature = match STANDARD.decode(signature_b64.trim()) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                tracing::debug!("Signature decoded to zero bytes");
                return false;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Signature is not valid base64");
                return false;
            }
        };

        let mut verifier = match Verifier::new(MessageDigest::sha512(), key.as_pkey()) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Public key cannot verify SHA-512 signatures");
                return false;
            }
        };

        if let Err(e) = verifier.update(payload) {
            tracing::warn!(error = %e, "Failed to digest callback payload");
            return false;
        }

        match verifier.verify(&signature) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::debug!(error = %e, "Signature verification errored");
                false
            }
        }
    }
}
