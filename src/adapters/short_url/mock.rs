//! Scripted URL shortener for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{ShortenResponse, ShortenerError, UrlShortener};

/// Mock shortener with per-URL answers.
///
/// URLs without a scripted answer get a 404 without a short URL.
#[derive(Debug, Default)]
pub struct MockUrlShortener {
    answers: HashMap<String, Result<ShortenResponse, ShortenerError>>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockUrlShortener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: impl Into<String>, response: ShortenResponse) -> Self {
        self.answers.insert(url.into(), Ok(response));
        self
    }

    pub fn with_error(mut self, url: impl Into<String>, error: ShortenerError) -> Self {
        self.answers.insert(url.into(), Err(error));
        self
    }

    /// Delays the answer for one URL.
    pub fn with_delay_for(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// Delays every answer without a URL-specific delay.
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlShortener for MockUrlShortener {
    async fn create_short_url(&self, url: &str) -> Result<ShortenResponse, ShortenerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(url).copied().or(self.default_delay) {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.answers
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(ShortenResponse::status_only(404)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_scripted_answers() {
        let shortener = MockUrlShortener::new()
            .with_response("https://a", ShortenResponse::created("https://s/a"))
            .with_error("https://b", ShortenerError::Network("reset".to_string()));

        assert_eq!(
            shortener.create_short_url("https://a").await,
            Ok(ShortenResponse::created("https://s/a"))
        );
        assert!(shortener.create_short_url("https://b").await.is_err());
        assert_eq!(
            shortener.create_short_url("https://c").await,
            Ok(ShortenResponse::status_only(404))
        );
        assert_eq!(shortener.call_count(), 3);
        assert_eq!(shortener.peak_in_flight(), 1);
    }
}
