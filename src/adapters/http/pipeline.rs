//! Request pipeline assembly.
//!
//! Wraps a router in the middleware stack every request passes through,
//! outermost first:
//!
//! ```text
//! session → responder → location → auth → authorization gate → handler
//! ```

use std::sync::Arc;

use axum::{middleware, Router};

use crate::ports::{ErrorTracker, SessionStore, SessionValidator, TenantResolver};

use super::middleware::{
    auth_middleware, authorization_gate, location_middleware, responder_middleware,
    session_middleware, AuthState, GateState, SessionCookie, SessionState,
};
use super::routes::{ExemptRoutes, IdentityProviderRoutes};

/// Everything the pipeline layers depend on.
#[derive(Clone)]
pub struct PipelineState {
    pub session_store: Arc<dyn SessionStore>,
    pub session_cookie: SessionCookie,
    pub error_tracker: Arc<dyn ErrorTracker>,
    pub validator: Arc<dyn SessionValidator>,
    pub tenant_resolver: Arc<dyn TenantResolver>,
    pub identity_routes: Arc<IdentityProviderRoutes>,
    pub exempt_routes: Arc<ExemptRoutes>,
}

impl PipelineState {
    /// Creates pipeline state with the default cookie and route sets.
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        error_tracker: Arc<dyn ErrorTracker>,
        validator: Arc<dyn SessionValidator>,
        tenant_resolver: Arc<dyn TenantResolver>,
    ) -> Self {
        Self {
            session_store,
            session_cookie: SessionCookie::default(),
            error_tracker,
            validator,
            tenant_resolver,
            identity_routes: Arc::new(IdentityProviderRoutes::default()),
            exempt_routes: Arc::new(ExemptRoutes::default()),
        }
    }

    pub fn with_session_cookie(mut self, cookie: SessionCookie) -> Self {
        self.session_cookie = cookie;
        self
    }

    pub fn with_identity_routes(mut self, routes: IdentityProviderRoutes) -> Self {
        self.identity_routes = Arc::new(routes);
        self
    }

    pub fn with_exempt_routes(mut self, routes: ExemptRoutes) -> Self {
        self.exempt_routes = Arc::new(routes);
        self
    }
}

/// Wraps every route of `router` in the request pipeline.
///
/// Routes merged after this call bypass the pipeline.
pub fn with_pipeline<S>(router: Router<S>, state: &PipelineState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let gate = GateState {
        exempt_routes: state.exempt_routes.clone(),
        identity_routes: state.identity_routes.clone(),
    };
    let auth = AuthState::new(state.validator.clone(), state.tenant_resolver.clone());
    let session = SessionState::new(state.session_store.clone(), state.session_cookie.clone());

    // Last layer added runs first.
    router
        .layer(middleware::from_fn_with_state(gate, authorization_gate))
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
        .layer(middleware::from_fn_with_state(
            state.identity_routes.clone(),
            location_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.error_tracker.clone(),
            responder_middleware,
        ))
        .layer(middleware::from_fn_with_state(session, session_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::error_tracking::RecordingErrorTracker;
    use crate::adapters::session::InMemorySessionStore;
    use crate::adapters::tenant::StaticTenantResolver;
    use axum::http::Method;

    fn state() -> PipelineState {
        PipelineState::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(RecordingErrorTracker::new()),
            Arc::new(MockSessionValidator::new()),
            Arc::new(StaticTenantResolver::new()),
        )
    }

    #[test]
    fn defaults_use_standard_cookie_and_identity_routes() {
        let state = state();
        assert_eq!(state.session_cookie, SessionCookie::default());
        assert!(state.identity_routes.matches("/users/sign_in"));
        assert!(state.exempt_routes.is_empty());
    }

    #[test]
    fn builders_replace_route_sets() {
        let state = state()
            .with_session_cookie(SessionCookie::named("sid"))
            .with_identity_routes(IdentityProviderRoutes::new(["/auth"]))
            .with_exempt_routes(ExemptRoutes::new().with_route(Method::GET, "/volunteers"));

        assert_eq!(state.session_cookie.name, "sid");
        assert!(state.identity_routes.matches("/auth/callback"));
        assert!(!state.identity_routes.matches("/users/sign_in"));
        assert!(state.exempt_routes.is_exempt(&Method::GET, "/volunteers"));
    }

    #[test]
    fn pipeline_wraps_router() {
        let _: Router = with_pipeline(Router::new(), &state());
    }
}
