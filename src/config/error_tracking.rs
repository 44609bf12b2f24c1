//! Error tracking configuration (Bugsnag)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Error tracking configuration.
///
/// Without an API key unexpected errors are only logged.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ErrorTrackingConfig {
    /// Bugsnag notifier API key
    pub bugsnag_api_key: Option<Secret<String>>,

    /// Notify endpoint override
    pub endpoint: Option<String>,

    /// Release stage; defaults to the server environment
    pub release_stage: Option<String>,
}

impl ErrorTrackingConfig {
    /// Whether reports go to Bugsnag.
    pub fn is_enabled(&self) -> bool {
        self.bugsnag_api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }

    /// Validate error tracking configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidUrl("ERROR_TRACKING__ENDPOINT"));
            }
        }
        Ok(())
    }
}
