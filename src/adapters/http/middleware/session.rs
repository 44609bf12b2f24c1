//! Session middleware and extractor.
//!
//! The session id travels in a cookie. Requests without a valid one get a
//! fresh id, and the cookie is set on the way out.
//!
//! ```text
//! Request → session_middleware → injects SessionHandle into extensions
//!                                        ↓
//!                     later layers / Session extractor read the handle
//! ```

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::domain::foundation::{Failure, SessionId};
use crate::ports::{SessionKey, SessionStore, SessionStoreError};

use super::super::PipelineError;

/// Default session cookie name.
pub const DEFAULT_SESSION_COOKIE: &str = "_casa_session";

/// Attributes of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    /// Send the cookie over HTTPS only.
    pub secure: bool,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_COOKIE.to_string(),
            secure: false,
        }
    }
}

impl SessionCookie {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    fn build(&self, id: SessionId) -> Cookie<'static> {
        Cookie::build((self.name.clone(), id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

/// The current request's session: its id plus the store it lives in.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    store: Arc<dyn SessionStore>,
}

impl SessionHandle {
    pub fn new(id: SessionId, store: Arc<dyn SessionStore>) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub async fn remember(&self, key: SessionKey, value: &str) -> Result<(), SessionStoreError> {
        self.store.remember(&self.id, key, value).await
    }

    pub async fn recall(&self, key: SessionKey) -> Result<Option<String>, SessionStoreError> {
        self.store.recall(&self.id, key).await
    }

    pub async fn forget(&self, key: SessionKey) -> Result<(), SessionStoreError> {
        self.store.forget(&self.id, key).await
    }

    pub async fn take(&self, key: SessionKey) -> Result<Option<String>, SessionStoreError> {
        self.store.take(&self.id, key).await
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Session middleware state.
#[derive(Clone)]
pub struct SessionState {
    pub store: Arc<dyn SessionStore>,
    pub cookie: Arc<SessionCookie>,
}

impl SessionState {
    pub fn new(store: Arc<dyn SessionStore>, cookie: SessionCookie) -> Self {
        Self {
            store,
            cookie: Arc::new(cookie),
        }
    }
}

/// Loads or issues the session id and injects a `SessionHandle`.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let existing = jar
        .get(&state.cookie.name)
        .and_then(|cookie| cookie.value().parse::<SessionId>().ok());

    let (id, issued) = match existing {
        Some(id) => (id, false),
        None => (SessionId::new(), true),
    };

    request
        .extensions_mut()
        .insert(SessionHandle::new(id, state.store.clone()));

    let response = next.run(request).await;

    if issued {
        tracing::debug!(session = %id, "Issued new session");
        (CookieJar::new().add(state.cookie.build(id)), response).into_response()
    } else {
        response
    }
}

/// Extractor for the current session.
#[derive(Debug, Clone)]
pub struct Session(pub SessionHandle);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .map(Session)
            .ok_or_else(|| Failure::unclassified(PipelineError::SessionMissing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session::InMemorySessionStore;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    fn app(store: Arc<InMemorySessionStore>) -> Router {
        Router::new()
            .route(
                "/",
                get(|Session(session): Session| async move { session.id().to_string() }),
            )
            .layer(middleware::from_fn_with_state(
                SessionState::new(store, SessionCookie::default()),
                session_middleware,
            ))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn issues_cookie_when_absent() {
        let response = app(Arc::new(InMemorySessionStore::new()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("_casa_session="));
        assert!(set_cookie.contains("HttpOnly"));

        let id = body_string(response).await;
        assert!(set_cookie.contains(&id));
    }

    #[tokio::test]
    async fn reuses_valid_cookie() {
        let id = SessionId::new();
        let response = app(Arc::new(InMemorySessionStore::new()))
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, format!("_casa_session={}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_string(response).await, id.to_string());
    }

    #[tokio::test]
    async fn replaces_malformed_cookie() {
        let response = app(Arc::new(InMemorySessionStore::new()))
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, "_casa_session=not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn handle_scopes_store_to_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let first = SessionHandle::new(SessionId::new(), store.clone());
        let second = SessionHandle::new(SessionId::new(), store);

        first.remember(SessionKey::ReturnTo, "/cases").await.unwrap();

        assert_eq!(
            first.recall(SessionKey::ReturnTo).await.unwrap().as_deref(),
            Some("/cases")
        );
        assert_eq!(second.recall(SessionKey::ReturnTo).await.unwrap(), None);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = SessionCookie::named("sid")
            .with_secure(true)
            .build(SessionId::new());

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
