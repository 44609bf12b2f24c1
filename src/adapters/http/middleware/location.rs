//! Location middleware - remembers where the user was going.
//!
//! Interactive page views are stored under `user_return_to` so the user
//! can be sent back there after signing in. Only plain navigation counts:
//! GET requests for pages, outside identity-provider routes, not issued by
//! scripts.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::foundation::RequestFormat;
use crate::ports::SessionKey;

use super::super::format::{is_xhr, negotiate};
use super::super::routes::IdentityProviderRoutes;
use super::session::SessionHandle;

/// Location middleware state - routes whose locations are never stored.
pub type LocationState = Arc<IdentityProviderRoutes>;

/// Stores the current path and query when the request is storable.
pub async fn location_middleware(
    State(identity_routes): State<LocationState>,
    request: Request,
    next: Next,
) -> Response {
    let pending = if is_storable(&request, &identity_routes) {
        request
            .extensions()
            .get::<SessionHandle>()
            .cloned()
            .map(|session| (session, full_path(&request)))
    } else {
        None
    };

    if let Some((session, location)) = pending {
        if let Err(e) = session.remember(SessionKey::UserReturnTo, &location).await {
            tracing::warn!(error = %e, location = %location, "Failed to store return location");
        }
    }

    next.run(request).await
}

fn full_path(request: &Request) -> String {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Whether a request's location is worth returning to.
pub fn is_storable(request: &Request, identity_routes: &IdentityProviderRoutes) -> bool {
    let format = request
        .extensions()
        .get::<RequestFormat>()
        .copied()
        .unwrap_or_else(|| negotiate(request.uri(), request.headers()));

    request.method() == Method::GET
        && format.is_navigational()
        && !identity_routes.matches(request.uri().path())
        && !is_xhr(request.headers())
}
