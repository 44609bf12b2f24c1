//! Navigation helpers built on the session store.
//!
//! Where to send the user after signing in or out, "go back" redirects, and
//! flash messages. All of it reads and writes the current session through
//! the `Navigation` extractor. The profile pages store and return to the
//! referer; the responder flashes through the same helpers.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::header;
use axum::http::request::Parts;
use axum::response::Redirect;
use serde::Serialize;

use crate::domain::foundation::Failure;
use crate::ports::SessionKey;

use super::middleware::session::{Session, SessionHandle};

/// Landing page for signed-out admins.
pub const ADMIN_SIGN_IN_PATH: &str = "/all_casa_admins/sign_in";

/// Landing page for everyone else.
pub const ROOT_PATH: &str = "/";

/// Referers ending in this suffix are never remembered.
const SIGN_IN_SUFFIX: &str = "users/sign_in";

/// Query parameter that suppresses remembering the referer.
const IGNORE_REFERER_PARAM: &str = "ignore_referer";

/// Which kind of account is signing out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutScope {
    User,
    AllCasaAdmin,
}

/// Flash messages consumed by the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub notice: Option<String>,
    pub alert: Option<String>,
}

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.notice.is_none() && self.alert.is_none()
    }
}

/// Extractor bundling the session with the request's referer information.
#[derive(Debug, Clone)]
pub struct Navigation {
    session: SessionHandle,
    referer: Option<String>,
    ignore_referer: bool,
}

impl Navigation {
    pub fn new(session: SessionHandle, referer: Option<String>, ignore_referer: bool) -> Self {
        Self {
            session,
            referer,
            ignore_referer,
        }
    }

    /// Where to go after signing in: the remembered location, once.
    pub async fn after_sign_in_path(&self, default: &str) -> Result<String, Failure> {
        let stored = self.session.take(SessionKey::UserReturnTo).await?;
        Ok(stored.unwrap_or_else(|| default.to_string()))
    }

    /// Where to go after signing out. Forgets the remembered location.
    pub async fn after_sign_out_path(&self, scope: SignOutScope) -> Result<&'static str, Failure> {
        self.session.forget(SessionKey::UserReturnTo).await?;

        Ok(match scope {
            SignOutScope::AllCasaAdmin => ADMIN_SIGN_IN_PATH,
            SignOutScope::User => ROOT_PATH,
        })
    }

    /// Remembers the referer for a later `redirect_back_to_referer`.
    ///
    /// Returns whether anything was stored.
    pub async fn store_referring_location(&self) -> Result<bool, Failure> {
        let Some(referer) = self.referer.as_deref() else {
            return Ok(false);
        };

        if referer.ends_with(SIGN_IN_SUFFIX) || self.ignore_referer {
            return Ok(false);
        }

        self.session.remember(SessionKey::ReturnTo, referer).await?;
        Ok(true)
    }

    pub async fn redirect_back_to_referer(&self, fallback: &str) -> Result<Redirect, Failure> {
        let stored = self.session.recall(SessionKey::ReturnTo).await?;
        Ok(Redirect::to(stored.as_deref().unwrap_or(fallback)))
    }

    pub async fn flash_notice(&self, message: &str) -> Result<(), Failure> {
        self.session.remember(SessionKey::FlashNotice, message).await?;
        Ok(())
    }

    pub async fn flash_alert(&self, message: &str) -> Result<(), Failure> {
        self.session.remember(SessionKey::FlashAlert, message).await?;
        Ok(())
    }

    /// Reads and clears both flash messages.
    pub async fn take_flash(&self) -> Result<Flash, Failure> {
        Ok(Flash {
            notice: self.session.take(SessionKey::FlashNotice).await?,
            alert: self.session.take(SessionKey::FlashAlert).await?,
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Navigation
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Session(session) = Session::from_request_parts(parts, state).await?;

        let referer = parts
            .headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let ignore_referer = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(params)| {
                params
                    .get(IGNORE_REFERER_PARAM)
                    .is_some_and(|v| !v.is_empty())
            })
            .unwrap_or(false);

        Ok(Navigation::new(session, referer, ignore_referer))
    }
}
