//! Short URL configuration (Short.io)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Short.io configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShortUrlConfig {
    /// Short.io API key
    pub api_key: Secret<String>,

    /// Domain short links are created under
    pub domain: String,

    /// Short.io API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-link timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Links created concurrently per batch
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl ShortUrlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate short URL configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("SHORT_URL__API_KEY"));
        }
        if self.domain.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SHORT_URL__DOMAIN"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("SHORT_URL__BASE_URL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_concurrency == 0 || self.max_concurrency > 64 {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.short.io".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_concurrency() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ShortUrlConfig {
        ShortUrlConfig {
            api_key: Secret::new("sk_short".to_string()),
            domain: "casa.short.gy".to_string(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
        assert_eq!(config().timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_api_key_is_redacted() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("sk_short"));
    }

    #[test]
    fn test_validation_missing_key() {
        let config = ShortUrlConfig {
            api_key: Secret::new(String::new()),
            ..config()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("SHORT_URL__API_KEY"))
        ));
    }

    #[test]
    fn test_validation_concurrency_bounds() {
        let zero = ShortUrlConfig {
            max_concurrency: 0,
            ..config()
        };
        assert!(zero.validate().is_err());

        let huge = ShortUrlConfig {
            max_concurrency: 500,
            ..config()
        };
        assert!(huge.validate().is_err());
    }
}
