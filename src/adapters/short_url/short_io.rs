//! Short.io URL shortener adapter.
//!
//! Creates one link per call and reports the HTTP status alongside the
//! short URL; deciding what counts as success is left to the caller.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ShortIoConfig::new(api_key, "casa.short.gy");
//! let shortener = ShortIoUrlShortener::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::ports::{ShortenResponse, ShortenerError, UrlShortener};

/// Configuration for the Short.io adapter.
#[derive(Debug, Clone)]
pub struct ShortIoConfig {
    /// API key sent in the `Authorization` header.
    api_key: Secret<String>,
    /// Short domain links are created under.
    pub domain: String,
    /// Base URL for the API (default: https://api.short.io).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ShortIoConfig {
    pub fn new(api_key: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            domain: domain.into(),
            base_url: "https://api.short.io".to_string(),
            timeout: Duration::from_secs(10),
        }
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

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Short.io API client.
pub struct ShortIoUrlShortener {
    config: ShortIoConfig,
    client: Client,
}

impl ShortIoUrlShortener {
    pub fn new(config: ShortIoConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    fn links_url(&self) -> String {
        format!("{}/links", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CreateLinkRequest<'a> {
    #[serde(rename = "originalURL")]
    original_url: &'a str,
    domain: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateLinkResponse {
    #[serde(rename = "shortURL")]
    short_url: Option<String>,
}

#[async_trait]
impl UrlShortener for ShortIoUrlShortener {
    async fn create_short_url(&self, url: &str) -> Result<ShortenResponse, ShortenerError> {
        let request = CreateLinkRequest {
            original_url: url,
            domain: &self.config.domain,
        };

        let response = self
            .client
            .post(self.links_url())
            .header("Authorization", self.config.api_key())
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ShortenerError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    ShortenerError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            tracing::debug!(status, "Short.io returned non-success status");
            return Ok(ShortenResponse::status_only(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ShortenerError::Network(e.to_string()))?;

        let short_url = parse_short_url(&body)?;

        Ok(ShortenResponse { status, short_url })
    }
}

fn parse_short_url(body: &str) -> Result<Option<String>, ShortenerError> {
    let parsed: CreateLinkResponse =
        serde_json::from_str(body).map_err(|e| ShortenerError::Parse(e.to_string()))?;
    Ok(parsed.short_url)
}
