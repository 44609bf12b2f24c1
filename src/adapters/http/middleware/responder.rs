//! Failure responder middleware.
//!
//! The single place where failures escaping request handling are turned
//! into responses. Handlers and inner layers return `Failure`; its
//! `IntoResponse` impl parks the failure in the response extensions, and
//! this middleware picks it up and answers according to the failure kind,
//! the negotiated format and the session.
//!
//! | Kind                                  | JSON                     | Other                                  |
//! |---------------------------------------|--------------------------|----------------------------------------|
//! | `AuthorizationDenied`, `UnknownTenant`| 401 `{"error": ...}`     | clear return-to, flash notice, go home |
//! | `UnsupportedFormat`                   | 415 `{"error": ...}`     | flash alert, go back to referer        |
//! | `Unclassified`                        | report, bare 500         | report, bare 500                       |

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

use crate::domain::foundation::{
    Failure, RequestFormat, UnclassifiedError, UserId, NOT_AUTHORIZED_MESSAGE,
};
use crate::ports::{ErrorReport, ErrorTracker, SessionKey};

use super::super::format::negotiate;
use super::super::navigation::Navigation;
use super::session::SessionHandle;

/// Body of the JSON answer to an unsupported format.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "json unsupported";

/// Flash alert shown when a page cannot be rendered in the asked format.
pub const PAGE_NOT_FOUND_MESSAGE: &str = "Page not found";

/// Where not-authorized navigational requests are sent.
pub const HOME_PATH: &str = "/";

/// Responder middleware state - the error tracking sink.
pub type ResponderState = Arc<dyn ErrorTracker>;

/// Identity of the principal behind a response, attached by the auth layer
/// so error reports can name the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedUser(pub UserId);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// What the responder knows about the request once the handler is done.
struct FailureScope {
    format: RequestFormat,
    session: Option<SessionHandle>,
    referer: Option<String>,
    origin: String,
}

impl FailureScope {
    fn navigation(&self, session: &SessionHandle) -> Navigation {
        Navigation::new(session.clone(), self.referer.clone(), false)
    }
}

/// Negotiates the request format, runs the inner stack, and answers any
/// failure it returned.
pub async fn responder_middleware(
    State(tracker): State<ResponderState>,
    mut request: Request,
    next: Next,
) -> Response {
    let format = negotiate(request.uri(), request.headers());
    request.extensions_mut().insert(format);

    let scope = FailureScope {
        format,
        session: request.extensions().get::<SessionHandle>().cloned(),
        referer: request
            .headers()
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        origin: format!("{} {}", request.method(), request.uri().path()),
    };

    let mut response = next.run(request).await;

    let Some(failure) = response.extensions_mut().remove::<Failure>() else {
        return response;
    };
    let user = response.extensions_mut().remove::<ReportedUser>();

    match failure {
        Failure::AuthorizationDenied { .. } | Failure::UnknownTenant(_) => {
            tracing::info!(
                kind = ?failure.kind(),
                reason = %failure,
                origin = %scope.origin,
                "Request not authorized"
            );
            not_authorized(&scope).await
        }
        Failure::UnsupportedFormat => {
            tracing::info!(origin = %scope.origin, "Unsupported request format");
            unsupported_format(&scope).await
        }
        Failure::Unclassified(error) => {
            report(tracker.as_ref(), &error, &scope, user);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn not_authorized(scope: &FailureScope) -> Response {
    if scope.format.is_json() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": NOT_AUTHORIZED_MESSAGE })),
        )
            .into_response();
    }

    if let Some(session) = &scope.session {
        if let Err(e) = session.forget(SessionKey::UserReturnTo).await {
            tracing::warn!(error = %e, "Failed to clear return location");
        }
        if let Err(e) = scope.navigation(session).flash_notice(NOT_AUTHORIZED_MESSAGE).await {
            tracing::warn!(error = %e, "Failed to set flash notice");
        }
    }

    Redirect::to(HOME_PATH).into_response()
}

async fn unsupported_format(scope: &FailureScope) -> Response {
    if scope.format.is_json() {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(serde_json::json!({ "error": UNSUPPORTED_FORMAT_MESSAGE })),
        )
            .into_response();
    }

    if let Some(session) = &scope.session {
        if let Err(e) = scope.navigation(session).flash_alert(PAGE_NOT_FOUND_MESSAGE).await {
            tracing::warn!(error = %e, "Failed to set flash alert");
        }
    }

    Redirect::to(scope.referer.as_deref().unwrap_or(HOME_PATH)).into_response()
}

fn report(
    tracker: &dyn ErrorTracker,
    error: &UnclassifiedError,
    scope: &FailureScope,
    user: Option<ReportedUser>,
) {
    tracing::error!(
        error = %error,
        error_class = error.type_name(),
        origin = %scope.origin,
        "Unhandled error during request"
    );

    let mut report = ErrorReport::from_unclassified(error).with_context(scope.origin.clone());
    if let Some(ReportedUser(user_id)) = user {
        report = report.with_user_id(user_id.to_string());
    }
    tracker.notify(report);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::error_tracking::RecordingErrorTracker;
    use crate::adapters::http::middleware::session::{
        session_middleware, SessionCookie, SessionState,
    };
    use crate::adapters::session::InMemorySessionStore;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::ports::SessionStore;
    use axum::body::Body;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    struct Harness {
        router: Router,
        tracker: Arc<RecordingErrorTracker>,
        store: Arc<InMemorySessionStore>,
    }

    fn harness() -> Harness {
        let tracker = Arc::new(RecordingErrorTracker::new());
        let store = Arc::new(InMemorySessionStore::new());

        let router = Router::new()
            .route(
                "/denied",
                get(|| async { Err::<(), _>(Failure::authorization_denied("nope")) }),
            )
            .route(
                "/tenant",
                get(|| async { Err::<(), _>(Failure::UnknownTenant("org-9".to_string())) }),
            )
            .route(
                "/format",
                get(|| async { Err::<(), _>(Failure::UnsupportedFormat) }),
            )
            .route(
                "/boom",
                get(|| async {
                    Err::<(), _>(Failure::from(DomainError::new(
                        ErrorCode::InternalError,
                        "database exploded",
                    )))
                }),
            )
            .route("/ok", get(|| async { "fine" }))
            .layer(middleware::from_fn_with_state(
                tracker.clone() as ResponderState,
                responder_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                SessionState::new(store.clone(), SessionCookie::default()),
                session_middleware,
            ));

        Harness {
            router,
            tracker,
            store,
        }
    }

    fn get_request(uri: &str, accept: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::ACCEPT, accept)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Not Authorized
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn denied_json_request_gets_401_with_message() {
        let h = harness();

        let response = h
            .router
            .oneshot(get_request("/denied", "application/json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": NOT_AUTHORIZED_MESSAGE })
        );
        assert_eq!(h.tracker.count(), 0);
    }

    #[tokio::test]
    async fn unknown_tenant_is_answered_like_denial() {
        let h = harness();

        let response = h
            .router
            .oneshot(get_request("/tenant", "application/json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.tracker.count(), 0);
    }

    #[tokio::test]
    async fn denied_page_request_redirects_home_with_notice() {
        let h = harness();
        let session = crate::domain::foundation::SessionId::new();
        h.store
            .remember(&session, SessionKey::UserReturnTo, "/cases/1")
            .await
            .unwrap();

        let response = h
            .router
            .oneshot(
                Request::builder()
                    .uri("/denied")
                    .header(header::ACCEPT, "text/html")
                    .header(header::COOKIE, format!("_casa_session={}", session))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(
            h.store.recall(&session, SessionKey::UserReturnTo).await.unwrap(),
            None
        );
        assert_eq!(
            h.store.recall(&session, SessionKey::FlashNotice).await.unwrap().as_deref(),
            Some(NOT_AUTHORIZED_MESSAGE)
        );
        assert_eq!(h.tracker.count(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Unsupported Format
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unsupported_json_request_gets_415() {
        let h = harness();

        let response = h
            .router
            .oneshot(get_request("/format", "application/json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "json unsupported" })
        );
        assert_eq!(h.tracker.count(), 0);
    }

    #[tokio::test]
    async fn unsupported_page_request_goes_back_to_referer() {
        let h = harness();

        let response = h
            .router
            .oneshot(
                Request::builder()
                    .uri("/format")
                    .header(header::ACCEPT, "text/csv")
                    .header(header::REFERER, "http://casa.test/volunteers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "http://casa.test/volunteers");
    }

    #[tokio::test]
    async fn unsupported_page_request_without_referer_goes_home() {
        let h = harness();

        let response = h
            .router
            .oneshot(get_request("/format", "text/html"))
            .await
            .unwrap();

        assert_eq!(location(&response), "/");
        assert_eq!(h.store.len().await, 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Unclassified
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unclassified_failure_is_reported_once_then_500() {
        let h = harness();

        let response = h
            .router
            .oneshot(get_request("/boom", "application/json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());

        let reports = h.tracker.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].message.ends_with("database exploded"));
        assert_eq!(reports[0].context.as_deref(), Some("GET /boom"));
        assert!(reports[0].error_class.ends_with("DomainError"));
    }

    #[tokio::test]
    async fn successful_responses_pass_through() {
        let h = harness();

        let response = h
            .router
            .oneshot(get_request("/ok", "text/html"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.tracker.count(), 0);
    }

    #[test]
    fn failure_response_carries_failure() {
        let response = Failure::UnsupportedFormat.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<Failure>().is_some());
    }
}
