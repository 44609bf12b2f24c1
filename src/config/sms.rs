//! SMS configuration (Twilio)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// SMS carrier configuration.
///
/// Account credentials are per tenant; only the endpoint and timeout are
/// configured here.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    /// Twilio API base URL
    #[serde(default = "default_base_url")]
    pub twilio_base_url: String,

    /// Delivery timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SmsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate SMS configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.twilio_base_url.starts_with("http://") && !self.twilio_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl("SMS__TWILIO_BASE_URL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            twilio_base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sms_config_defaults() {
        let config = SmsConfig::default();
        assert_eq!(config.twilio_base_url, "https://api.twilio.com");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = SmsConfig {
            twilio_base_url: "api.twilio.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = SmsConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
