//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CASA_PIPELINE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use casa_pipeline::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod error_tracking;
mod redis;
mod server;
mod session;
mod short_url;
mod sms;

pub use error::{ConfigError, ValidationError};
pub use error_tracking::ErrorTrackingConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;
pub use short_url::ShortUrlConfig;
pub use sms::SmsConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Session store Redis; sessions stay in memory without it
    pub redis: Option<RedisConfig>,

    /// Session cookie and route sets
    #[serde(default)]
    pub session: SessionConfig,

    /// SMS carrier configuration (Twilio)
    #[serde(default)]
    pub sms: SmsConfig,

    /// URL shortener configuration (Short.io)
    pub short_url: ShortUrlConfig,

    /// Error tracking configuration (Bugsnag)
    #[serde(default)]
    pub error_tracking: ErrorTrackingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CASA_PIPELINE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CASA_PIPELINE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CASA_PIPELINE__SHORT_URL__DOMAIN=...` -> `short_url.domain = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CASA_PIPELINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.session.validate()?;
        self.sms.validate()?;
        self.short_url.validate()?;
        self.error_tracking.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Release stage reported with error events.
    pub fn release_stage(&self) -> String {
        self.error_tracking
            .release_stage
            .clone()
            .unwrap_or_else(|| self.server.environment.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 8] = [
        "CASA_PIPELINE__SHORT_URL__API_KEY",
        "CASA_PIPELINE__SHORT_URL__DOMAIN",
        "CASA_PIPELINE__SERVER__PORT",
        "CASA_PIPELINE__SERVER__ENVIRONMENT",
        "CASA_PIPELINE__REDIS__URL",
        "CASA_PIPELINE__SESSION__EXEMPT_ROUTES",
        "CASA_PIPELINE__ERROR_TRACKING__BUGSNAG_API_KEY",
        "CASA_PIPELINE__ERROR_TRACKING__RELEASE_STAGE",
    ];

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("CASA_PIPELINE__SHORT_URL__API_KEY", "sk_short_test");
        env::set_var("CASA_PIPELINE__SHORT_URL__DOMAIN", "casa.short.gy");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let result = load_with(&[]);

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.short_url.domain, "casa.short.gy");
        assert_eq!(config.short_url.api_key.expose_secret(), "sk_short_test");
        assert!(config.redis.is_none());
        assert!(!config.error_tracking.is_enabled());
    }

    #[test]
    fn test_validate_full_config() {
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.session.cookie_name, "_casa_session");
        assert_eq!(config.sms.timeout_secs, 10);
        assert_eq!(config.short_url.max_concurrency, 4);
    }

    #[test]
    fn test_is_production() {
        let config = load_with(&[("CASA_PIPELINE__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
        assert_eq!(config.release_stage(), "production");
    }

    #[test]
    fn test_custom_server_port() {
        let config = load_with(&[("CASA_PIPELINE__SERVER__PORT", "3000")]).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_redis_section_enables_redis() {
        let config = load_with(&[("CASA_PIPELINE__REDIS__URL", "redis://localhost:6379")]).unwrap();
        let redis = config.redis.unwrap();
        assert_eq!(redis.url, "redis://localhost:6379");
        assert_eq!(redis.key_prefix, "casa");
        assert!(redis.validate().is_ok());
    }

    #[test]
    fn test_exempt_routes_from_environment() {
        let config = load_with(&[(
            "CASA_PIPELINE__SESSION__EXEMPT_ROUTES",
            "GET /volunteers,GET /cases",
        )])
        .unwrap();
        assert_eq!(config.session.exempt_route_list().unwrap().len(), 2);
    }

    #[test]
    fn test_bugsnag_key_enables_tracking() {
        let config = load_with(&[
            ("CASA_PIPELINE__ERROR_TRACKING__BUGSNAG_API_KEY", "abc123"),
            ("CASA_PIPELINE__ERROR_TRACKING__RELEASE_STAGE", "staging-eu"),
        ])
        .unwrap();
        assert!(config.error_tracking.is_enabled());
        assert_eq!(config.release_stage(), "staging-eu");
    }

    #[test]
    fn test_missing_short_url_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
