//! Classified request failures.
//!
//! Every failure that escapes request handling is one of four kinds. The
//! kind alone decides whether operators hear about it and what the user
//! sees.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::{AuthError, DomainError, ErrorCode, TenantError};

/// Message shown for both authorization failure kinds.
pub const NOT_AUTHORIZED_MESSAGE: &str = "Sorry, you are not authorized to perform this action.";

/// Failure raised during request handling, consumed once by the responder.
#[derive(Debug, Clone, Error)]
pub enum Failure {
    /// A policy check denied the action.
    #[error("Not authorized: {reason}")]
    AuthorizationDenied { reason: String },

    /// The request's organization could not be resolved.
    #[error("Unknown organization: {0}")]
    UnknownTenant(String),

    /// The request asked for a representation the handler cannot produce.
    #[error("Unsupported format")]
    UnsupportedFormat,

    /// Anything else. Reported upstream, then handled as a server error.
    #[error("{0}")]
    Unclassified(UnclassifiedError),
}

impl Failure {
    pub fn authorization_denied(reason: impl Into<String>) -> Self {
        Failure::AuthorizationDenied {
            reason: reason.into(),
        }
    }

    /// Wraps an unexpected error.
    pub fn unclassified<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Failure::Unclassified(UnclassifiedError::new(error))
    }

    /// Returns the failure's kind.
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::AuthorizationDenied { .. } => FailureKind::AuthorizationDenied,
            Failure::UnknownTenant(_) => FailureKind::UnknownTenant,
            Failure::UnsupportedFormat => FailureKind::UnsupportedFormat,
            Failure::Unclassified(_) => FailureKind::Unclassified,
        }
    }
}

/// Discriminant of [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    AuthorizationDenied,
    UnknownTenant,
    UnsupportedFormat,
    Unclassified,
}

impl FailureKind {
    /// Known kinds are expected outcomes and never reach error tracking.
    pub fn is_known(&self) -> bool {
        !matches!(self, FailureKind::Unclassified)
    }

    /// Kinds answered with the "not authorized" response.
    pub fn is_not_authorized(&self) -> bool {
        matches!(
            self,
            FailureKind::AuthorizationDenied | FailureKind::UnknownTenant
        )
    }
}

/// Shareable wrapper around an unexpected error.
///
/// Failures travel through response extensions, which requires `Clone`.
#[derive(Clone)]
pub struct UnclassifiedError {
    inner: Arc<dyn Error + Send + Sync>,
    type_name: &'static str,
}

impl UnclassifiedError {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
            type_name: std::any::type_name::<E>(),
        }
    }

    /// Rust type name of the wrapped error, used as the report's error class.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }
}

impl fmt::Debug for UnclassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnclassifiedError")
            .field("type", &self.type_name)
            .field("error", &self.inner)
            .finish()
    }
}

impl fmt::Display for UnclassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl From<DomainError> for Failure {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Unauthorized | ErrorCode::Forbidden => {
                Failure::authorization_denied(err.message)
            }
            ErrorCode::UnknownTenant => Failure::UnknownTenant(err.message),
            _ => Failure::unclassified(err),
        }
    }
}

impl From<TenantError> for Failure {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::UnknownTenant(org) => Failure::UnknownTenant(org),
            other => Failure::unclassified(other),
        }
    }
}

impl From<AuthError> for Failure {
    fn from(err: AuthError) -> Self {
        if err.requires_reauthentication() {
            Failure::authorization_denied(err.to_string())
        } else {
            Failure::unclassified(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("database exploded")]
    struct Boom;

    #[test]
    fn known_kinds_are_not_reported() {
        assert!(FailureKind::AuthorizationDenied.is_known());
        assert!(FailureKind::UnknownTenant.is_known());
        assert!(FailureKind::UnsupportedFormat.is_known());
        assert!(!FailureKind::Unclassified.is_known());
    }

    #[test]
    fn only_authorization_kinds_map_to_not_authorized() {
        assert!(FailureKind::AuthorizationDenied.is_not_authorized());
        assert!(FailureKind::UnknownTenant.is_not_authorized());
        assert!(!FailureKind::UnsupportedFormat.is_not_authorized());
        assert!(!FailureKind::Unclassified.is_not_authorized());
    }

    #[test]
    fn unclassified_keeps_message_and_type() {
        let failure = Failure::unclassified(Boom);
        assert_eq!(failure.kind(), FailureKind::Unclassified);
        assert_eq!(failure.to_string(), "database exploded");
        match failure {
            Failure::Unclassified(inner) => assert!(inner.type_name().ends_with("Boom")),
            _ => panic!("expected unclassified"),
        }
    }

    #[test]
    fn forbidden_domain_error_becomes_authorization_denied() {
        let failure: Failure = DomainError::new(ErrorCode::Forbidden, "nope").into();
        assert_eq!(failure.kind(), FailureKind::AuthorizationDenied);
    }

    #[test]
    fn other_domain_errors_are_unclassified() {
        let failure: Failure = DomainError::new(ErrorCode::InternalError, "boom").into();
        assert_eq!(failure.kind(), FailureKind::Unclassified);
    }

    #[test]
    fn unknown_tenant_error_maps_to_unknown_tenant() {
        let failure: Failure = TenantError::UnknownTenant("org-9".to_string()).into();
        assert_eq!(failure.kind(), FailureKind::UnknownTenant);

        let failure: Failure = TenantError::Unavailable("timeout".to_string()).into();
        assert_eq!(failure.kind(), FailureKind::Unclassified);
    }

    #[test]
    fn failures_are_cloneable() {
        let failure = Failure::unclassified(Boom);
        let copy = failure.clone();
        assert_eq!(copy.to_string(), failure.to_string());
    }
}
