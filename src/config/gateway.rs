//! Payment gateway configuration (Wata)

use std::net::IpAddr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// H2H API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API token (bearer) for outbound calls
    #[serde(default = "default_token")]
    pub token: SecretString,

    /// Addresses allowed to deliver callbacks (comma-separated)
    #[serde(default = "default_allowed_ips")]
    pub allowed_ips: String,

    /// Currencies payment links may be created in (comma-separated)
    #[serde(default = "default_supported_currencies")]
    pub supported_currencies: String,

    /// Outbound HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Public key cache lifetime in seconds, 0 = never refresh
    #[serde(default)]
    pub key_cache_ttl_secs: u64,

    /// Header carrying the callback signature
    #[serde(default = "default_signature_header")]
    pub signature_header: String,

    /// Provider id the callback route binds to when none is given
    #[serde(default = "default_provider_id")]
    pub provider_id: String,
}

impl GatewayConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Allow-listed callback source addresses, unparsed.
    pub fn allowed_ips_list(&self) -> Vec<String> {
        split_list(&self.allowed_ips)
    }

    pub fn supported_currencies_list(&self) -> Vec<String> {
        split_list(&self.supported_currencies)
    }

    /// Returns true if payment links may be created in `currency`.
    pub fn supports_currency(&self, currency: &str) -> bool {
        self.supported_currencies_list()
            .iter()
            .any(|c| c == currency)
    }

    /// Validate gateway configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_TOKEN"));
        }

        let is_https = self.api_base_url.starts_with("https://");
        if !is_https && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidGatewayUrl);
        }
        if *environment == Environment::Production && !is_https {
            return Err(ValidationError::GatewayUrlMustBeHttps);
        }

        if self.http_timeout_secs == 0 || self.http_timeout_secs > 60 {
            return Err(ValidationError::InvalidHttpTimeout);
        }

        let ips = self.allowed_ips_list();
        if ips.is_empty() {
            return Err(ValidationError::EmptyAllowList);
        }
        for ip in &ips {
            if ip.parse::<IpAddr>().is_err() {
                return Err(ValidationError::InvalidAllowedIp(ip.clone()));
            }
        }

        for currency in self.supported_currencies_list() {
            let valid = currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase());
            if !valid {
                return Err(ValidationError::InvalidCurrency(currency));
            }
        }

        if self.signature_header.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_SIGNATURE_HEADER"));
        }
        if self.provider_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_PROVIDER_ID"));
        }

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token: default_token(),
            allowed_ips: default_allowed_ips(),
            supported_currencies: default_supported_currencies(),
            http_timeout_secs: default_http_timeout(),
            key_cache_ttl_secs: 0,
            signature_header: default_signature_header(),
            provider_id: default_provider_id(),
        }
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_api_base_url() -> String {
    "https://api.wata.pro/api/h2h/".to_string()
}

fn default_token() -> SecretString {
    SecretString::new(String::new())
}

fn default_allowed_ips() -> String {
    "62.84.126.140,51.250.106.150".to_string()
}

fn default_supported_currencies() -> String {
    "USD,EUR,RUB".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_signature_header() -> String {
    "X-Signature".to_string()
}

fn default_provider_id() -> String {
    "wata".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GatewayConfig {
        GatewayConfig {
            token: SecretString::new("wata-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.api_base_url, "https://api.wata.pro/api/h2h/");
        assert_eq!(
            config.allowed_ips_list(),
            vec!["62.84.126.140".to_string(), "51.250.106.150".to_string()]
        );
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.key_cache_ttl_secs, 0);
        assert_eq!(config.signature_header, "X-Signature");
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            GatewayConfig::default().validate(&Environment::Development),
            Err(ValidationError::MissingRequired("GATEWAY_TOKEN"))
        );
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_http_base_url_rejected_in_production_only() {
        let config = GatewayConfig {
            api_base_url: "http://localhost:9000/api/h2h/".to_string(),
            ..valid()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::GatewayUrlMustBeHttps)
        );
    }

    #[test]
    fn test_invalid_allowed_ip() {
        let config = GatewayConfig {
            allowed_ips: "62.84.126.140, gateway.wata.pro".to_string(),
            ..valid()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidAllowedIp("gateway.wata.pro".to_string()))
        );
    }

    #[test]
    fn test_empty_allow_list() {
        let config = GatewayConfig {
            allowed_ips: " , ".to_string(),
            ..valid()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::EmptyAllowList)
        );
    }

    #[test]
    fn test_http_timeout_bounds() {
        for secs in [0, 61] {
            let config = GatewayConfig {
                http_timeout_secs: secs,
                ..valid()
            };
            assert_eq!(
                config.validate(&Environment::Development),
                Err(ValidationError::InvalidHttpTimeout)
            );
        }
    }

    #[test]
    fn test_supports_currency() {
        let config = valid();
        assert!(config.supports_currency("USD"));
        assert!(config.supports_currency("RUB"));
        assert!(!config.supports_currency("GBP"));
        assert!(!config.supports_currency("usd"));
    }

    #[test]
    fn test_invalid_currency_code() {
        let config = GatewayConfig {
            supported_currencies: "USD,euro".to_string(),
            ..valid()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidCurrency("euro".to_string()))
        );
    }
}
