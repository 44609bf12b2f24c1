//! HTTP middleware for axum.
//!
//! This module contains the layers of the request pipeline:
//!
//! - `session` - Session cookie and per-session store handle
//! - `responder` - Single interception point for failures
//! - `location` - Remembers the page to return to after sign-in
//! - `auth` - Principal and tenant resolution
//! - `authorization` - Verifies every request recorded a decision

pub mod auth;
pub mod authorization;
pub mod location;
pub mod responder;
pub mod session;

pub use auth::{auth_middleware, bearer_token, AuthState};
pub use authorization::{authorization_gate, Authorize, DecisionCell, GateState};
pub use location::{is_storable, location_middleware, LocationState};
pub use responder::{
    responder_middleware, ReportedUser, ResponderState, HOME_PATH, PAGE_NOT_FOUND_MESSAGE,
    UNSUPPORTED_FORMAT_MESSAGE,
};
pub use session::{
    session_middleware, Session, SessionCookie, SessionHandle, SessionState,
    DEFAULT_SESSION_COOKIE,
};
