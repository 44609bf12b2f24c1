//! HTTP adapters - the request pipeline and REST endpoints.
//!
//! - `pipeline` - Middleware stack every request passes through
//! - `middleware` - The individual pipeline layers
//! - `context`, `format`, `navigation` - Extractors handlers build on
//! - `notifications` - SMS and short-URL endpoints
//! - `app` - The assembled application router

pub mod app;
pub mod context;
pub mod format;
pub mod middleware;
pub mod navigation;
pub mod notifications;
pub mod pipeline;
pub mod routes;

use thiserror::Error;

pub use app::app_router;
pub use context::{CurrentContext, OptionalContext, RequestContext};
pub use format::{negotiate, Format};
pub use middleware::{Authorize, ReportedUser, Session, SessionCookie, SessionHandle};
pub use navigation::{Flash, Navigation, SignOutScope};
pub use notifications::{notifications_router, NotificationsAppState};
pub use pipeline::{with_pipeline, PipelineState};
pub use routes::{ExemptRoutes, IdentityProviderRoutes};

/// Wiring errors: an extractor ran on a router without its layer.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Session extractor used outside the session middleware")]
    SessionMissing,

    #[error("Authorize extractor used outside the authorization gate")]
    GateMissing,
}
