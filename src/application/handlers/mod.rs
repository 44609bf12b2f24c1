//! Application handlers.
//!
//! Command handlers for the outbound workflows. Neither workflow fails the
//! caller: delivery and per-item errors are folded into their results.

pub mod short_url;
pub mod sms;

pub use short_url::{ShortenUrlsCommand, ShortenUrlsHandler, ShortenUrlsResult};
pub use sms::{DeliverSmsCommand, DeliverSmsHandler};
