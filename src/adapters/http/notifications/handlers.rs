//! HTTP handlers for notification endpoints.
//!
//! These handlers connect Axum routes to the SMS and short-URL command
//! handlers. Every endpoint serves JSON only and records an authorization
//! decision before running its workflow.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};

use crate::application::handlers::short_url::{
    ShortenUrlsCommand, ShortenUrlsHandler, DEFAULT_MAX_CONCURRENCY, DEFAULT_SHORTEN_TIMEOUT,
};
use crate::application::handlers::sms::{DeliverSmsCommand, DeliverSmsHandler, DEFAULT_SMS_TIMEOUT};
use crate::domain::foundation::{check_role, AuthorizationContext, Failure, Role};
use crate::domain::sms::unconfirmed_email_notice;
use crate::ports::{SmsCarrier, UrlShortener};

use super::super::context::CurrentContext;
use super::super::format::Format;
use super::super::middleware::Authorize;
use super::dto::{
    AccountSmsRequest, NoticeResponse, ProfileUpdatedRequest, ShortenUrlsRequest,
    ShortenUrlsResponse, SmsDeliveryResponse,
};

/// Roles allowed to create accounts and text them.
const ACCOUNT_MANAGERS: [Role; 2] = [Role::Supervisor, Role::CasaAdmin];

/// Roles allowed to shorten links.
const LINK_SHORTENERS: [Role; 3] = [Role::Volunteer, Role::Supervisor, Role::CasaAdmin];

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for notification endpoints.
#[derive(Clone)]
pub struct NotificationsAppState {
    pub sms_carrier: Arc<dyn SmsCarrier>,
    pub url_shortener: Arc<dyn UrlShortener>,
    pub sms_timeout: Duration,
    pub shorten_timeout: Duration,
    pub shorten_concurrency: usize,
}

impl NotificationsAppState {
    pub fn new(sms_carrier: Arc<dyn SmsCarrier>, url_shortener: Arc<dyn UrlShortener>) -> Self {
        Self {
            sms_carrier,
            url_shortener,
            sms_timeout: DEFAULT_SMS_TIMEOUT,
            shorten_timeout: DEFAULT_SHORTEN_TIMEOUT,
            shorten_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_sms_timeout(mut self, timeout: Duration) -> Self {
        self.sms_timeout = timeout;
        self
    }

    pub fn with_shorten_timeout(mut self, timeout: Duration) -> Self {
        self.shorten_timeout = timeout;
        self
    }

    pub fn with_shorten_concurrency(mut self, max_concurrency: usize) -> Self {
        self.shorten_concurrency = max_concurrency;
        self
    }

    /// Create handlers on demand from the shared state.
    pub fn deliver_sms_handler(&self) -> DeliverSmsHandler {
        DeliverSmsHandler::new(self.sms_carrier.clone()).with_timeout(self.sms_timeout)
    }

    pub fn shorten_urls_handler(&self) -> ShortenUrlsHandler {
        ShortenUrlsHandler::new(self.url_shortener.clone())
            .with_timeout(self.shorten_timeout)
            .with_max_concurrency(self.shorten_concurrency)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/notifications/account_created
///
/// Texts the new account and returns the creation notice.
pub async fn send_account_sms(
    State(state): State<NotificationsAppState>,
    Format(format): Format,
    CurrentContext(ctx): CurrentContext,
    auth: Authorize,
    payload: Result<Json<AccountSmsRequest>, JsonRejection>,
) -> Result<Json<SmsDeliveryResponse>, Failure> {
    format.require_json()?;

    let policy = AuthorizationContext::new(ctx.principal.id.clone(), "create", "Account", "new");
    auth.authorize(check_role(&policy, &ctx.principal, &ACCOUNT_MANAGERS))?;

    let Json(request) = payload.map_err(Failure::unclassified)?;
    let recipient = request
        .recipient
        .into_principal(ctx.tenant.id.clone())
        .map_err(Failure::from)?;

    let delivery = state
        .deliver_sms_handler()
        .handle(DeliverSmsCommand {
            recipient,
            tenant: ctx.tenant,
            resource_name: request.resource_name,
            body: request.body,
        })
        .await;

    Ok(Json(delivery.into()))
}

/// POST /api/notifications/profile_updated
pub async fn profile_updated_notice(
    Format(format): Format,
    CurrentContext(ctx): CurrentContext,
    auth: Authorize,
    payload: Result<Json<ProfileUpdatedRequest>, JsonRejection>,
) -> Result<Json<NoticeResponse>, Failure> {
    format.require_json()?;

    let policy = AuthorizationContext::new(
        ctx.principal.id.clone(),
        "update",
        "Profile",
        ctx.principal.id.to_string(),
    );
    auth.authorize(policy.grant())?;

    let Json(request) = payload.map_err(Failure::unclassified)?;

    Ok(Json(NoticeResponse {
        notice: unconfirmed_email_notice(
            request.role.display_name(),
            request.email_change_pending,
        ),
    }))
}

/// POST /api/short_urls
///
/// Shortens every URL; failures are reported per item, never as an error.
pub async fn shorten_urls(
    State(state): State<NotificationsAppState>,
    Format(format): Format,
    CurrentContext(ctx): CurrentContext,
    auth: Authorize,
    payload: Result<Json<ShortenUrlsRequest>, JsonRejection>,
) -> Result<Json<ShortenUrlsResponse>, Failure> {
    format.require_json()?;

    let policy = AuthorizationContext::new(ctx.principal.id.clone(), "create", "ShortUrl", "batch");
    auth.authorize(check_role(&policy, &ctx.principal, &LINK_SHORTENERS))?;

    let Json(request) = payload.map_err(Failure::unclassified)?;

    let result = state
        .shorten_urls_handler()
        .handle(ShortenUrlsCommand { urls: request.urls })
        .await;

    tracing::info!(
        total = result.entries.len(),
        succeeded = result.succeeded(),
        "Shortened URL batch"
    );

    Ok(Json(result.into()))
}
