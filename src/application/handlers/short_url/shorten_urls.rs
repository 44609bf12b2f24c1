//! ShortenUrlsHandler - Shortens a batch of URLs with per-item outcomes.
//!
//! Items are independent: one failure never affects another, and the
//! result is always index-aligned with the input.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::domain::short_url::{classify_response, ShortUrlEntry};
use crate::ports::UrlShortener;

/// Default bound on a single shortening call.
pub const DEFAULT_SHORTEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of shortening calls in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Command to shorten every URL in `urls`.
#[derive(Debug, Clone)]
pub struct ShortenUrlsCommand {
    pub urls: Vec<String>,
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenUrlsResult {
    /// One entry per input URL, in input order.
    pub entries: Vec<ShortUrlEntry>,
}

impl ShortenUrlsResult {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.success).count()
    }

    /// Short URLs keyed by input index; `None` marks a failed item.
    pub fn short_urls_by_index(&self) -> BTreeMap<usize, Option<String>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (index, entry.short_url.clone()))
            .collect()
    }
}

/// Handler for batch shortening.
pub struct ShortenUrlsHandler {
    shortener: Arc<dyn UrlShortener>,
    timeout: Duration,
    max_concurrency: usize,
}

impl ShortenUrlsHandler {
    pub fn new(shortener: Arc<dyn UrlShortener>) -> Self {
        Self {
            shortener,
            timeout: DEFAULT_SHORTEN_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Sets the bound on a single shortening call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many calls may be in flight at once (at least one).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub async fn handle(&self, cmd: ShortenUrlsCommand) -> ShortenUrlsResult {
        let requested = cmd.urls.len();
        let entries: Vec<ShortUrlEntry> = stream::iter(cmd.urls.into_iter().enumerate())
            .map(|(index, url)| async move { self.shorten_one(index, &url).await })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let result = ShortenUrlsResult { entries };

        tracing::info!(
            requested,
            succeeded = result.succeeded(),
            "Short URL batch finished"
        );

        result
    }

    async fn shorten_one(&self, index: usize, url: &str) -> ShortUrlEntry {
        match tokio::time::timeout(self.timeout, self.shortener.create_short_url(url)).await {
            Ok(Ok(response)) => {
                let entry = classify_response(response.status, response.short_url);
                if !entry.success {
                    tracing::debug!(index, status = response.status, "URL not shortened");
                }
                entry
            }
            Ok(Err(e)) => {
                tracing::warn!(index, error = %e, "URL shortener call failed");
                ShortUrlEntry::failed()
            }
            Err(_elapsed) => {
                tracing::warn!(
                    index,
                    timeout_secs = self.timeout.as_secs(),
                    "URL shortener call timed out"
                );
                ShortUrlEntry::failed()
            }
        }
    }
}
