//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, principal, tenant, failure taxonomy, authorization)
//! - `sms` - SMS delivery outcome and user notices
//! - `short_url` - Per-item outcome of batch URL shortening

pub mod foundation;
pub mod short_url;
pub mod sms;
