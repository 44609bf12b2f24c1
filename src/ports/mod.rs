//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the pipeline and the outside world. Adapters implement these ports.
//!
//! ## Request Context Ports
//!
//! - `SessionValidator` - Identity provider: session token to principal
//! - `TenantResolver` - Organization of the current principal
//! - `SessionStore` - Per-session return-to locations and flash messages
//!
//! ## Outbound Ports
//!
//! - `SmsCarrier` - Text message delivery
//! - `UrlShortener` - Short link creation
//! - `ErrorTracker` - Operator-facing error reporting

mod error_tracker;
mod session_store;
mod session_validator;
mod sms_carrier;
mod tenant_resolver;
mod url_shortener;

pub use error_tracker::{ErrorReport, ErrorTracker, TrackingError};
pub use session_store::{SessionKey, SessionStore, SessionStoreError};
pub use session_validator::SessionValidator;
pub use sms_carrier::{CarrierError, CarrierReceipt, SmsCarrier, SmsMessage};
pub use tenant_resolver::TenantResolver;
pub use url_shortener::{ShortenResponse, ShortenerError, UrlShortener};
