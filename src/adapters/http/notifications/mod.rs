//! HTTP adapter for outbound notification endpoints.
//!
//! Exposes the SMS and short-URL workflows via REST API:
//! - `POST /api/notifications/account_created` - Text a newly created account
//! - `POST /api/notifications/profile_updated` - Notice for a profile update
//! - `POST /api/short_urls` - Shorten a batch of URLs

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::NotificationsAppState;
pub use routes::notifications_router;
