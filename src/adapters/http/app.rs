//! Application router.
//!
//! Mounts the page and API routes inside the request pipeline and the
//! health check outside of it.

use axum::extract::rejection::JsonRejection;
use axum::extract::Query;
use axum::response::Redirect;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthorizationContext, Failure, Role};
use crate::domain::sms::unconfirmed_email_notice;

use super::context::{CurrentContext, OptionalContext, RequestContext};
use super::middleware::Authorize;
use super::navigation::{Flash, Navigation, SignOutScope, ROOT_PATH};
use super::notifications::{notifications_router, NotificationsAppState};
use super::pipeline::{with_pipeline, PipelineState};

/// What the home page shows about the current session.
#[derive(Debug, Clone, Serialize)]
pub struct HomeResponse {
    pub flash: Flash,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<HomeUser>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub organization: String,
    /// Inactivity timeout in seconds, when the session has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_duration: Option<u64>,
    pub sms_enabled: bool,
}

/// GET /
///
/// Landing page; open to everyone and consumes the flash.
pub async fn home(
    auth: Authorize,
    OptionalContext(ctx): OptionalContext,
    nav: Navigation,
) -> Result<Json<HomeResponse>, Failure> {
    auth.skip_authorization();

    let flash = nav.take_flash().await?;
    let user = ctx.map(|ctx| HomeUser {
        id: ctx.principal.id.to_string(),
        name: ctx.principal.display_name_or_email().to_string(),
        role: ctx.principal.role,
        organization: ctx.tenant.name.clone(),
        timeout_duration: ctx.timeout_duration().map(|d| d.as_secs()),
        sms_enabled: ctx.sms_enabled(),
    });

    Ok(Json(HomeResponse { flash, user }))
}

/// POST /users/sign_in
///
/// Runs after the identity provider accepted the credentials; sends the
/// user back where they were going.
pub async fn after_sign_in(nav: Navigation) -> Result<Redirect, Failure> {
    let target = nav.after_sign_in_path(ROOT_PATH).await?;
    Ok(Redirect::to(&target))
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutScopeParam {
    #[default]
    User,
    AllCasaAdmin,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignOutParams {
    #[serde(default)]
    pub scope: SignOutScopeParam,
}

/// DELETE /users/sign_out
pub async fn after_sign_out(
    nav: Navigation,
    Query(params): Query<SignOutParams>,
) -> Result<Redirect, Failure> {
    let scope = match params.scope {
        SignOutScopeParam::User => SignOutScope::User,
        SignOutScopeParam::AllCasaAdmin => SignOutScope::AllCasaAdmin,
    };
    Ok(Redirect::to(nav.after_sign_out_path(scope).await?))
}

/// The signed-in user's own profile form.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileEditResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdateForm {
    /// True when the email changed and awaits confirmation.
    #[serde(default)]
    pub email_change_pending: bool,
}

fn own_profile_policy(ctx: &RequestContext, action: &'static str) -> AuthorizationContext {
    AuthorizationContext::new(
        ctx.principal.id.clone(),
        action,
        "Profile",
        ctx.principal.id.to_string(),
    )
}

/// GET /profile/edit
///
/// Remembers the page the user came from so the update can return there.
pub async fn edit_profile(
    CurrentContext(ctx): CurrentContext,
    auth: Authorize,
    nav: Navigation,
) -> Result<Json<ProfileEditResponse>, Failure> {
    auth.authorize(own_profile_policy(&ctx, "edit").grant())?;

    nav.store_referring_location().await?;

    let principal = ctx.principal;
    Ok(Json(ProfileEditResponse {
        id: principal.id.to_string(),
        email: principal.email,
        display_name: principal.display_name,
        role: principal.role,
        phone_number: principal.phone_number,
    }))
}

/// PATCH /profile
///
/// Flashes the update notice and goes back to where editing started.
pub async fn update_profile(
    CurrentContext(ctx): CurrentContext,
    auth: Authorize,
    nav: Navigation,
    payload: Result<Json<ProfileUpdateForm>, JsonRejection>,
) -> Result<Redirect, Failure> {
    auth.authorize(own_profile_policy(&ctx, "update").grant())?;

    let Json(form) = payload.map_err(Failure::unclassified)?;
    let notice =
        unconfirmed_email_notice(ctx.principal.role.display_name(), form.email_change_pending);

    nav.flash_notice(&notice).await?;
    nav.redirect_back_to_referer(ROOT_PATH).await
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Builds the full application router.
pub fn app_router(pipeline: &PipelineState, notifications: NotificationsAppState) -> Router {
    let routes = Router::new()
        .route("/", get(home))
        .route("/users/sign_in", post(after_sign_in))
        .route("/users/sign_out", delete(after_sign_out))
        .route("/profile/edit", get(edit_profile))
        .route("/profile", patch(update_profile))
        .nest("/api", notifications_router().with_state(notifications));

    with_pipeline(routes, pipeline).route("/health", get(health))
}
