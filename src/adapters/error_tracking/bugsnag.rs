//! Bugsnag error tracker.
//!
//! Reports are posted to the Bugsnag Notify API (payload version 5) on a
//! background task so `notify` never waits on the network. Delivery
//! failures are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};

use crate::domain::foundation::Timestamp;
use crate::ports::{ErrorReport, ErrorTracker, TrackingError};

const PAYLOAD_VERSION: &str = "5";

/// Configuration for the Bugsnag tracker.
#[derive(Debug, Clone)]
pub struct BugsnagConfig {
    api_key: Secret<String>,
    /// Notify endpoint (default: https://notify.bugsnag.com).
    pub endpoint: String,
    /// Release stage reported with every event (e.g., "production").
    pub release_stage: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl BugsnagConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            endpoint: "https://notify.bugsnag.com".to_string(),
            release_stage: "development".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_release_stage(mut self, stage: impl Into<String>) -> Self {
        self.release_stage = stage.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Bugsnag-backed error tracker.
#[derive(Clone)]
pub struct BugsnagErrorTracker {
    config: Arc<BugsnagConfig>,
    client: Client,
}

impl BugsnagErrorTracker {
    pub fn new(config: BugsnagConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Builds the Notify API payload for one report.
    fn payload(&self, report: &ErrorReport) -> Value {
        let mut event = json!({
            "exceptions": [{
                "errorClass": report.error_class,
                "message": report.message,
                "stacktrace": [],
            }],
            "severity": "error",
            "unhandled": true,
            "severityReason": { "type": "unhandledException" },
            "app": { "releaseStage": self.config.release_stage },
            "metaData": { "report": { "occurredAt": report.occurred_at.to_rfc3339() } },
        });

        if let Some(context) = &report.context {
            event["context"] = json!(context);
        }
        if let Some(user_id) = &report.user_id {
            event["user"] = json!({ "id": user_id });
        }

        json!({
            "apiKey": self.config.api_key(),
            "payloadVersion": PAYLOAD_VERSION,
            "notifier": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "url": "https://notify.bugsnag.com",
            },
            "events": [event],
        })
    }

    async fn deliver(
        client: Client,
        config: Arc<BugsnagConfig>,
        payload: Value,
    ) -> Result<(), TrackingError> {
        let response = client
            .post(&config.endpoint)
            .header("Bugsnag-Api-Key", config.api_key())
            .header("Bugsnag-Payload-Version", PAYLOAD_VERSION)
            .header("Bugsnag-Sent-At", Timestamp::now().to_rfc3339())
            .json(&payload)
            .send()
            .await
            .map_err(|e| TrackingError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TrackingError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}

impl ErrorTracker for BugsnagErrorTracker {
    fn notify(&self, report: ErrorReport) {
        let payload = self.payload(&report);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(
                    error = %TrackingError::NoRuntime,
                    error_class = %report.error_class,
                    "Error report dropped"
                );
                return;
            }
        };

        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        handle.spawn(async move {
            if let Err(e) = Self::deliver(client, config, payload).await {
                tracing::warn!(
                    error = %e,
                    error_class = %report.error_class,
                    "Failed to deliver error report to Bugsnag"
                );
            }
        });
    }
}

impl std::fmt::Debug for BugsnagErrorTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BugsnagErrorTracker")
            .field("endpoint", &self.config.endpoint)
            .field("release_stage", &self.config.release_stage)
            .finish_non_exhaustive()
    }
}
