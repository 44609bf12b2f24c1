//! Short URL command handlers.
//!
//! - `ShortenUrlsCommand` - Shorten a batch of URLs, index-aligned results

mod shorten_urls;

pub use shorten_urls::{
    ShortenUrlsCommand, ShortenUrlsHandler, ShortenUrlsResult, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_SHORTEN_TIMEOUT,
};
