//! Authentication types for the domain layer.
//!
//! These types represent the authenticated actor of a request. They have
//! **no external dependencies** - any identity provider can populate them via
//! the `SessionValidator` port.
//!
//! # Design Decisions
//!
//! - `Principal` contains only the attributes the pipeline reads
//! - `AuthError` is domain-centric, not provider-specific
//! - Types are `Clone` for easy use in request handlers

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{OrganizationId, UserId};

/// Role of a principal within its organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Volunteer,
    Supervisor,
    CasaAdmin,
    /// Cross-tenant administrator; signs in through its own identity scope.
    AllCasaAdmin,
}

impl Role {
    /// Human-facing role name used in notices.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Volunteer => "Volunteer",
            Role::Supervisor => "Supervisor",
            Role::CasaAdmin => "Casa Admin",
            Role::AllCasaAdmin => "All Casa Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The authenticated actor of a request.
///
/// Resolved once per request by the identity provider and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// User's email address.
    pub email: String,

    /// Display name if available.
    pub display_name: Option<String>,

    pub role: Role,

    /// Organization the principal belongs to.
    pub organization_id: OrganizationId,

    /// Notification phone number, if the user provided one.
    pub phone_number: Option<String>,

    /// Inactivity timeout of the principal's session, if the identity
    /// provider enforces one.
    pub session_timeout: Option<Duration>,
}

impl Principal {
    /// Creates a new principal without a phone number.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        role: Role,
        organization_id: OrganizationId,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
            role,
            organization_id,
            phone_number: None,
            session_timeout: None,
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the notification phone number.
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = Some(timeout);
        self
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Returns the phone number if it is present and not blank.
    pub fn reachable_phone_number(&self) -> Option<&str> {
        self.phone_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Authentication errors that can occur during session validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the user no longer exists in the system.
    #[error("User not found")]
    UserNotFound,

    /// The identity provider is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal::new(
            UserId::new("user-123").unwrap(),
            "volunteer@example.com",
            Role::Volunteer,
            OrganizationId::new("org-1").unwrap(),
        )
    }

    #[test]
    fn principal_new_has_no_phone_number() {
        let p = principal();
        assert_eq!(p.id.as_str(), "user-123");
        assert!(p.phone_number.is_none());
        assert!(p.reachable_phone_number().is_none());
    }

    #[test]
    fn reachable_phone_number_ignores_blank_values() {
        let p = principal().with_phone_number("   ");
        assert!(p.reachable_phone_number().is_none());

        let p = principal().with_phone_number(" +15555550100 ");
        assert_eq!(p.reachable_phone_number(), Some("+15555550100"));
    }

    #[test]
    fn display_name_or_email_falls_back_to_email() {
        assert_eq!(principal().display_name_or_email(), "volunteer@example.com");
        assert_eq!(
            principal().with_display_name("Ada").display_name_or_email(),
            "Ada"
        );
    }

    #[test]
    fn session_timeout_is_optional() {
        assert!(principal().session_timeout.is_none());
        let p = principal().with_session_timeout(Duration::from_secs(7200));
        assert_eq!(p.session_timeout, Some(Duration::from_secs(7200)));
    }

    #[test]
    fn role_display_names() {
        assert_eq!(Role::CasaAdmin.to_string(), "Casa Admin");
        assert_eq!(Role::Supervisor.to_string(), "Supervisor");
    }

    #[test]
    fn auth_error_requires_reauthentication_for_token_errors() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }
}
