//! Authentication middleware.
//!
//! Resolves the principal behind a Bearer token through the
//! `SessionValidator` port, then the principal's tenant through the
//! `TenantResolver` port, and stores both as a `RequestContext`.
//!
//! ```text
//! Request → auth_middleware → injects RequestContext into extensions
//!                                      ↓
//!                      Handler → CurrentContext extractor reads it
//! ```
//!
//! Failures are not answered here. A rejected token or an unknown tenant
//! becomes a `Failure` that the responder turns into a response.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domain::foundation::Failure;
use crate::ports::{SessionValidator, TenantResolver};

use super::super::context::RequestContext;
use super::responder::ReportedUser;

/// Auth middleware state - the identity and tenant ports.
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn SessionValidator>,
    pub tenant_resolver: Arc<dyn TenantResolver>,
}

impl AuthState {
    pub fn new(
        validator: Arc<dyn SessionValidator>,
        tenant_resolver: Arc<dyn TenantResolver>,
    ) -> Self {
        Self {
            validator,
            tenant_resolver,
        }
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Authentication middleware.
///
/// 1. No token: continue without a context (handlers decide)
/// 2. Token rejected: `Failure` from the `AuthError`
/// 3. Tenant unresolvable: `Failure::UnknownTenant` (or unclassified)
/// 4. Otherwise: inject `RequestContext` and continue
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return next.run(request).await;
    };

    let principal = match state.validator.validate(&token).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::info!(error = %e, "Session token rejected");
            return Failure::from(e).into_response();
        }
    };

    let user_id = principal.id.clone();

    let tenant = match state.tenant_resolver.resolve(&principal).await {
        Ok(tenant) => tenant,
        Err(e) => {
            tracing::warn!(
                error = %e,
                user_id = %user_id,
                organization = %principal.organization_id,
                "Tenant resolution failed"
            );
            let mut response = Failure::from(e).into_response();
            response.extensions_mut().insert(ReportedUser(user_id));
            return response;
        }
    };

    request
        .extensions_mut()
        .insert(RequestContext::new(principal, tenant));

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ReportedUser(user_id));
    response
}
