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
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid Redis key prefix '{0}'")]
    InvalidRedisKeyPrefix(String),

    #[error("Redis connect timeout must be between 1 and 60 seconds")]
    InvalidRedisTimeout,

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Invalid exempt route '{0}', expected 'METHOD /path'")]
    InvalidExemptRoute(String),

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Short URL concurrency must be between 1 and 64")]
    InvalidConcurrency,
}
