//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates the side-effecting workflows a request handler
//! may run, coordinating between domain types and outbound ports.

pub mod handlers;

pub use handlers::{
    // SMS handlers
    DeliverSmsCommand, DeliverSmsHandler,
    // Short URL handlers
    ShortenUrlsCommand, ShortenUrlsHandler, ShortenUrlsResult,
};
