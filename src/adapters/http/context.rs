//! Per-request context and its extractors.
//!
//! The auth middleware resolves the principal and tenant once and stores a
//! `RequestContext` in request extensions. Handlers receive it explicitly
//! through `CurrentContext` or `OptionalContext`; there is no ambient
//! "current user".

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::foundation::{Failure, Principal, Tenant};

/// The authenticated principal and the tenant it acts in.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub principal: Principal,
    pub tenant: Tenant,
}

impl RequestContext {
    pub fn new(principal: Principal, tenant: Tenant) -> Self {
        Self { principal, tenant }
    }

    /// Inactivity timeout to show the user, if their session has one.
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.principal.session_timeout
    }

    /// Whether accounts created in this context can be texted.
    pub fn sms_enabled(&self) -> bool {
        self.tenant.sms_enabled()
    }
}

/// Extractor that requires an authenticated context.
///
/// Without one the request fails as not authorized.
#[derive(Debug, Clone)]
pub struct CurrentContext(pub RequestContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentContext
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(CurrentContext)
            .ok_or_else(|| Failure::authorization_denied("Authentication required"))
    }
}

/// Extractor for an optional context.
#[derive(Debug, Clone)]
pub struct OptionalContext(pub Option<RequestContext>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalContext(parts.extensions.get::<RequestContext>().cloned()))
    }
}
