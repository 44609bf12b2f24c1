//! URL shortening port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port for URL shortening services (e.g., Short.io).
///
/// Implementations make a single attempt; retry policy, if any, lives
/// inside the implementation.
#[async_trait]
pub trait UrlShortener: Send + Sync {
    async fn create_short_url(&self, url: &str) -> Result<ShortenResponse, ShortenerError>;
}

/// Raw answer of the shortening service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenResponse {
    /// HTTP status returned by the service.
    pub status: u16,

    /// Resulting short URL, when the service produced one.
    pub short_url: Option<String>,
}

impl ShortenResponse {
    pub fn created(short_url: impl Into<String>) -> Self {
        Self {
            status: 201,
            short_url: Some(short_url.into()),
        }
    }

    pub fn status_only(status: u16) -> Self {
        Self {
            status,
            short_url: None,
        }
    }
}

/// Errors from shortening operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_shortener_is_object_safe() {
        fn _accepts_dyn(_shortener: &dyn UrlShortener) {}
    }

    #[test]
    fn created_response_is_201_with_url() {
        let response = ShortenResponse::created("https://s/a");
        assert_eq!(response.status, 201);
        assert_eq!(response.short_url.as_deref(), Some("https://s/a"));
    }
}
