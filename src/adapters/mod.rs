//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the pipeline to external systems:
//! - `auth` - Session validation (mock identity provider)
//! - `tenant` - Tenant resolution (static directory)
//! - `session` - Session stores (in-memory, Redis)
//! - `sms` - SMS carriers (Twilio, mock)
//! - `short_url` - URL shorteners (Short.io, mock)
//! - `error_tracking` - Error trackers (Bugsnag, log-only, recording)
//! - `http` - The axum request pipeline and endpoints

pub mod auth;
pub mod error_tracking;
pub mod http;
pub mod session;
pub mod short_url;
pub mod sms;
pub mod tenant;

pub use auth::MockSessionValidator;
pub use error_tracking::{BugsnagConfig, BugsnagErrorTracker, LogErrorTracker, RecordingErrorTracker};
pub use session::{InMemorySessionStore, RedisSessionStore};
pub use short_url::{MockUrlShortener, ShortIoConfig, ShortIoUrlShortener};
pub use sms::{MockSmsCarrier, TwilioConfig, TwilioSmsCarrier};
pub use tenant::StaticTenantResolver;
