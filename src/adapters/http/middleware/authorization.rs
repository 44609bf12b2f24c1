//! Authorization gate.
//!
//! Every routed request gets a fresh `DecisionCell`. Handlers record their
//! decision through the `Authorize` extractor: a policy check, or an
//! explicit opt-out. When a handler completes without recording anything
//! the gate treats it as a programming error and panics, unless the route
//! is exempt or belongs to the identity provider. Requests the method router
//! rejects with 405 never reach a handler and are not verified.
//!
//! ```text
//! authorization_gate → inserts DecisionCell → handler records via Authorize
//!         ↓
//! verifies the cell after the handler returns
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{FromRequestParts, MatchedPath, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::foundation::{AuthorizationDecision, AuthorizationResult, Failure};

use super::super::routes::{ExemptRoutes, IdentityProviderRoutes};
use super::super::PipelineError;

/// Shared per-request authorization decision.
#[derive(Debug, Clone, Default)]
pub struct DecisionCell(Arc<Mutex<AuthorizationDecision>>);

impl DecisionCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, decision: AuthorizationDecision) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = decision;
    }

    pub fn current(&self) -> AuthorizationDecision {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Gate state - the routes it never verifies.
#[derive(Debug, Clone, Default)]
pub struct GateState {
    pub exempt_routes: Arc<ExemptRoutes>,
    pub identity_routes: Arc<IdentityProviderRoutes>,
}

impl GateState {
    pub fn new(exempt_routes: ExemptRoutes, identity_routes: IdentityProviderRoutes) -> Self {
        Self {
            exempt_routes: Arc::new(exempt_routes),
            identity_routes: Arc::new(identity_routes),
        }
    }
}

/// Verifies that the handler recorded an authorization decision.
///
/// # Panics
///
/// Panics when a non-exempt handler completes successfully while the
/// decision is still `Undecided`.
pub async fn authorization_gate(
    State(state): State<GateState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cell = DecisionCell::new();
    request.extensions_mut().insert(cell.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let pattern = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string());

    let response = next.run(request).await;

    if response.extensions().get::<Failure>().is_some() {
        return response;
    }

    // Unmatched requests reach the fallback, which has no handler to verify.
    let Some(pattern) = pattern else {
        return response;
    };

    if state.exempt_routes.is_exempt(&method, &pattern)
        || state.identity_routes.matches(&path)
    {
        return response;
    }

    // A matched path with the wrong method is answered by the method
    // router's fallback; no handler ran.
    if response.status() == StatusCode::METHOD_NOT_ALLOWED && !cell.current().is_decided() {
        return response;
    }

    if !cell.current().is_decided() {
        tracing::error!(
            method = %method,
            route = %pattern,
            "Handler completed without an authorization decision"
        );
        panic!("{} {} completed without an authorization decision", method, pattern);
    }

    response
}

/// Extractor handing the handler its decision recorder.
#[derive(Debug, Clone)]
pub struct Authorize(DecisionCell);

impl Authorize {
    /// Records the outcome of a policy check. A denial becomes an
    /// `AuthorizationDenied` failure.
    pub fn authorize(&self, result: AuthorizationResult) -> Result<(), Failure> {
        let decision = AuthorizationDecision::from(&result);
        self.0.record(decision.clone());

        match decision {
            AuthorizationDecision::Denied { reason } => {
                tracing::info!(
                    resource_type = result.resource_type,
                    resource_id = %result.resource_id,
                    user_id = %result.user_id,
                    reason = %reason,
                    "Authorization denied"
                );
                Err(Failure::authorization_denied(reason))
            }
            _ => Ok(()),
        }
    }

    /// Opts the handler out of authorization.
    pub fn skip_authorization(&self) {
        self.0.record(AuthorizationDecision::Skipped);
    }

    pub fn decision(&self) -> AuthorizationDecision {
        self.0.current()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authorize
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<DecisionCell>()
            .cloned()
            .map(Authorize)
            .ok_or_else(|| Failure::unclassified(PipelineError::GateMissing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::FailureKind;
    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{middleware, Router};
    use tower::ServiceExt;

    fn app(state: GateState) -> Router {
        Router::new()
            .route(
                "/granted",
                get(|auth: Authorize| async move {
                    auth.authorize(AuthorizationResult::granted("Case", "c-1", "u-1"))
                        .map(|_| "ok")
                }),
            )
            .route(
                "/denied",
                get(|auth: Authorize| async move {
                    auth.authorize(AuthorizationResult::denied("Case", "c-1", "u-1", "nope"))
                        .map(|_| "ok")
                }),
            )
            .route(
                "/skipped",
                get(|auth: Authorize| async move {
                    auth.skip_authorization();
                    "ok"
                }),
            )
            .route("/forgot", get(|| async { "oops" }))
            .route(
                "/forgot-but-failed",
                get(|| async { Failure::UnsupportedFormat.into_response() }),
            )
            .route("/health", get(|| async { "ok" }))
            .route("/users/sign_in", post(|| async { "signed in" }))
            .layer(middleware::from_fn_with_state(state, authorization_gate))
    }

    fn gate() -> GateState {
        GateState::new(
            ExemptRoutes::new().with_route(Method::GET, "/health"),
            IdentityProviderRoutes::default(),
        )
    }

    fn request(method: Method, uri: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn granted_request_passes() {
        let response = app(gate())
            .oneshot(request(Method::GET, "/granted"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn denied_request_carries_failure() {
        let response = app(gate())
            .oneshot(request(Method::GET, "/denied"))
            .await
            .unwrap();

        let failure = response.extensions().get::<Failure>().unwrap();
        assert_eq!(failure.kind(), FailureKind::AuthorizationDenied);
    }

    #[tokio::test]
    async fn skipped_request_passes() {
        let response = app(gate())
            .oneshot(request(Method::GET, "/skipped"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[should_panic(expected = "without an authorization decision")]
    async fn undecided_handler_panics() {
        let _ = app(gate()).oneshot(request(Method::GET, "/forgot")).await;
    }

    #[tokio::test]
    async fn failed_requests_are_not_verified() {
        let response = app(gate())
            .oneshot(request(Method::GET, "/forgot-but-failed"))
            .await
            .unwrap();
        assert!(response.extensions().get::<Failure>().is_some());
    }

    #[tokio::test]
    async fn exempt_route_is_not_verified() {
        let response = app(gate())
            .oneshot(request(Method::GET, "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn identity_provider_route_is_not_verified() {
        let response = app(gate())
            .oneshot(request(Method::POST, "/users/sign_in"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_method_is_answered_without_verification() {
        for uri in ["/granted", "/forgot"] {
            let response = app(gate())
                .oneshot(request(Method::DELETE, uri))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[tokio::test]
    async fn unmatched_request_is_not_verified() {
        let response = app(gate())
            .oneshot(request(Method::GET, "/nowhere"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn authorize_without_gate_is_unclassified() {
        let mut parts = Request::builder().body(()).unwrap().into_parts().0;

        let failure = Authorize::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Unclassified);
    }

    #[test]
    fn cell_records_latest_decision() {
        let cell = DecisionCell::new();
        assert_eq!(cell.current(), AuthorizationDecision::Undecided);

        cell.record(AuthorizationDecision::Authorized);
        assert_eq!(cell.current(), AuthorizationDecision::Authorized);
    }

    #[test]
    fn authorize_reports_decision() {
        let auth = Authorize(DecisionCell::new());
        auth.skip_authorization();
        assert_eq!(auth.decision(), AuthorizationDecision::Skipped);
    }
}
