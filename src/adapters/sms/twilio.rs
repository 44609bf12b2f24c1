//! Twilio SMS carrier adapter.
//!
//! Implements `SmsCarrier` against the Twilio Messages resource. The
//! account credentials are per tenant and arrive with each call; only the
//! API base URL and timeout are adapter configuration.
//!
//! # Configuration
//!
//! ```ignore
//! let config = TwilioConfig::new().with_timeout(Duration::from_secs(5));
//! let carrier = TwilioSmsCarrier::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::domain::foundation::SmsAccount;
use crate::ports::{CarrierError, CarrierReceipt, SmsCarrier, SmsMessage};

/// Twilio error code for messages to unverified numbers on trial accounts.
pub const UNVERIFIED_NUMBER_CODE: u32 = 21608;

/// Configuration for the Twilio adapter.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Base URL for the API (default: https://api.twilio.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twilio.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl TwilioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Twilio SMS carrier.
pub struct TwilioSmsCarrier {
    config: TwilioConfig,
    client: Client,
}

impl TwilioSmsCarrier {
    pub fn new(config: TwilioConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    /// Builds the Messages endpoint URL for an account.
    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url.trim_end_matches('/'),
            account_sid
        )
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CarrierError {
        if e.is_timeout() {
            CarrierError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            CarrierError::other(format!("Connection failed: {}", e))
        } else {
            CarrierError::other(e.to_string())
        }
    }
}

#[async_trait]
impl SmsCarrier for TwilioSmsCarrier {
    async fn send(
        &self,
        account: &SmsAccount,
        message: &SmsMessage,
    ) -> Result<CarrierReceipt, CarrierError> {
        let response = self
            .client
            .post(self.messages_url(&account.account_sid))
            .basic_auth(&account.account_sid, Some(account.auth_token.expose_secret()))
            .form(&[
                ("From", message.from.as_str()),
                ("To", message.to.as_str()),
                ("Body", message.body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let error = classify_error(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %error, "Twilio rejected message");
            return Err(error);
        }

        parse_receipt(&body)
    }
}

/// Success body of the Messages resource.
#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: Option<String>,
    status: Option<String>,
    #[serde(default)]
    error_code: Option<serde_json::Value>,
}

/// Error body of the Twilio REST API.
#[derive(Debug, Deserialize)]
struct TwilioError {
    code: Option<u32>,
    message: Option<String>,
}

fn parse_receipt(body: &str) -> Result<CarrierReceipt, CarrierError> {
    let message: TwilioMessage = serde_json::from_str(body)
        .map_err(|e| CarrierError::other(format!("Failed to parse Twilio response: {}", e)))?;

    let error_code = match message.error_code {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(code)) => Some(code),
        Some(other) => Some(other.to_string()),
    };

    Ok(CarrierReceipt {
        sid: message.sid,
        status: message.status,
        error_code,
    })
}

fn classify_error(status: u16, body: &str) -> CarrierError {
    match serde_json::from_str::<TwilioError>(body) {
        Ok(TwilioError {
            code: Some(UNVERIFIED_NUMBER_CODE),
            ..
        }) => CarrierError::UnverifiedNumber,
        Ok(TwilioError { code, message }) => CarrierError::rejected(
            code.map(|c| c.to_string()),
            message.unwrap_or_else(|| format!("HTTP {}", status)),
        ),
        Err(_) => CarrierError::other(format!("HTTP {}: {}", status, body)),
    }
}
