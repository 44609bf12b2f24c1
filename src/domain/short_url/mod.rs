//! Short URL domain - per-item outcome of a batch shortening run.

use serde::{Deserialize, Serialize};

/// Outcome for one input URL, index-aligned with the batch input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlEntry {
    pub success: bool,
    pub short_url: Option<String>,
}

impl ShortUrlEntry {
    pub fn shortened(short_url: impl Into<String>) -> Self {
        Self {
            success: true,
            short_url: Some(short_url.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            short_url: None,
        }
    }
}

/// HTTP statuses the shortening service uses to signal a created link.
pub const SUCCESS_STATUSES: [u16; 2] = [200, 201];

/// Classifies a shortening response into an entry.
///
/// Success requires both an accepted status and a short URL.
pub fn classify_response(status: u16, short_url: Option<String>) -> ShortUrlEntry {
    match short_url {
        Some(url) if SUCCESS_STATUSES.contains(&status) && !url.is_empty() => {
            ShortUrlEntry::shortened(url)
        }
        _ => ShortUrlEntry::failed(),
    }
}
