//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Payment-link API key must be at least 16 characters")]
    LinksApiKeyTooShort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid gateway API base URL")]
    InvalidGatewayUrl,

    #[error("Gateway API base URL must use HTTPS in production")]
    GatewayUrlMustBeHttps,

    #[error("Invalid gateway HTTP timeout (1..=60 seconds)")]
    InvalidHttpTimeout,

    #[error("Invalid allow-listed IP address: {0}")]
    InvalidAllowedIp(String),

    #[error("Gateway IP allow-list is empty")]
    EmptyAllowList,

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
}
