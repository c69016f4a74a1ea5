//! PaymentProfile entity.

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::PaymentProfileId;

/// A configured binding between the platform and a payment provider.
///
/// The token is the provider API credential used for outbound calls; it is
/// never logged.
#[derive(Debug, Clone)]
pub struct PaymentProfile {
    id: PaymentProfileId,
    provider_id: String,
    token: SecretString,
    active: bool,
}

impl PaymentProfile {
    pub fn new(
        id: PaymentProfileId,
        provider_id: impl Into<String>,
        token: SecretString,
        active: bool,
    ) -> Self {
        Self {
            id,
            provider_id: provider_id.into(),
            token,
            active,
        }
    }

    pub fn id(&self) -> PaymentProfileId {
        self.id
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if this profile belongs to the given provider.
    pub fn is_bound_to(&self, provider_id: &str) -> bool {
        self.provider_id == provider_id
    }

    /// Returns true if the profile carries a usable API token.
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(token: &str) -> PaymentProfile {
        PaymentProfile::new(
            PaymentProfileId::new(3).unwrap(),
            "wata",
            SecretString::new(token.to_string()),
            true,
        )
    }

    #[test]
    fn binding_compares_provider_id_exactly() {
        let p = profile("tok");
        assert!(p.is_bound_to("wata"));
        assert!(!p.is_bound_to("Wata"));
        assert!(!p.is_bound_to("other"));
    }

    #[test]
    fn debug_does_not_leak_token() {
        let p = profile("super-secret-token");
        assert!(!format!("{:?}", p).contains("super-secret-token"));
    }

    #[test]
    fn blank_token_is_unusable() {
        assert!(!profile("  ").has_token());
        assert!(profile("tok").has_token());
    }
}
