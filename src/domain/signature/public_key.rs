//! Gateway public signing key.

use std::fmt;

use openssl::pkey::{PKey, Public};
use openssl::rsa::Rsa;
use thiserror::Error;

/// Errors parsing a PEM-encoded public key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("public key PEM is empty")]
    Empty,

    #[error("public key PEM could not be parsed: {0}")]
    Malformed(String),
}

/// Parsed public key used to verify callback signatures.
///
/// Cheap to clone; the underlying OpenSSL key is reference counted.
#[derive(Clone)]
pub struct PublicKey {
    key: PKey<Public>,
}

impl PublicKey {
    /// Parses a PEM public key.
    ///
    /// Accepts SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`) and PKCS#1
    /// (`BEGIN RSA PUBLIC KEY`) encodings.
    pub fn from_pem(pem: &str) -> Result<Self, KeyParseError> {
        let pem = pem.trim();
        if pem.is_empty() {
            return Err(KeyParseError::Empty);
        }

        if let Ok(key) = PKey::public_key_from_pem(pem.as_bytes()) {
            return Ok(Self { key });
        }

        let rsa = Rsa::public_key_from_pem_pkcs1(pem.as_bytes())
            .map_err(|e| KeyParseError::Malformed(e.to_string()))?;
        let key = PKey::from_rsa(rsa).map_err(|e| KeyParseError::Malformed(e.to_string()))?;
        Ok(Self { key })
    }

    /// Wraps an already-parsed OpenSSL key.
    pub fn from_pkey(key: PKey<Public>) -> Self {
        Self { key }
    }

    pub(crate) fn as_pkey(&self) -> &PKey<Public> {
        &self.key
    }

    /// Key size in bits.
    pub fn bits(&self) -> u32 {
        self.key.bits()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("id", &self.key.id())
            .field("bits", &self.key.bits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsa_pems() -> (String, String) {
        let rsa = Rsa::generate(2048).unwrap();
        let spki = String::from_utf8(rsa.public_key_to_pem().unwrap()).unwrap();
        let pkcs1 = String::from_utf8(rsa.public_key_to_pem_pkcs1().unwrap()).unwrap();
        (spki, pkcs1)
    }

    #[test]
    fn parses_spki_pem() {
        let (spki, _) = rsa_pems();
        let key = PublicKey::from_pem(&spki).unwrap();
        assert_eq!(key.bits(), 2048);
    }

    #[test]
    fn parses_pkcs1_pem() {
        let (_, pkcs1) = rsa_pems();
        assert!(PublicKey::from_pem(&pkcs1).is_ok());
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let (spki, _) = rsa_pems();
        assert!(PublicKey::from_pem(&format!("\n  {}\n\n", spki)).is_ok());
    }

    #[test]
    fn empty_pem_is_rejected() {
        assert!(matches!(PublicKey::from_pem("   "), Err(KeyParseError::Empty)));
        assert!(matches!(PublicKey::from_pem(""), Err(KeyParseError::Empty)));
    }

    #[test]
    fn garbage_pem_is_malformed() {
        let result = PublicKey::from_pem("-----BEGIN PUBLIC KEY-----\nnot-a-key\n-----END PUBLIC KEY-----");
        assert!(matches!(result, Err(KeyParseError::Malformed(_))));
    }

    #[test]
    fn debug_shows_key_shape_only() {
        let (spki, _) = rsa_pems();
        let key = PublicKey::from_pem(&spki).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("PublicKey"));
        assert!(debug.contains("2048"));
        assert!(!debug.contains("BEGIN"));
    }
}
