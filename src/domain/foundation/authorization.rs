//! Authorization support types.
//!
//! This module provides foundation-level authorization support:
//! - `AuthorizationDecision` - The per-request record the authorization gate verifies
//! - `AuthorizationResult` - Standard result type for authorization checks
//! - `AuthorizationContext` - Structured context for authorization decisions
//! - Helper functions for tenant and role checks
//!
//! Checks follow a consistent pattern:
//! 1. Build an `AuthorizationContext` for the action
//! 2. Run a check (`check_tenant`, `check_role`, or custom logic)
//! 3. Hand the `AuthorizationResult` to the request's decision recorder,
//!    which records it and turns a denial into a failure

use super::{OrganizationId, Principal, Role, UserId};

/// Authorization state of a single request.
///
/// Starts `Undecided`; every non-exempt request must leave that state
/// before it completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthorizationDecision {
    #[default]
    Undecided,

    Authorized,

    Denied { reason: String },

    /// The handler explicitly opted out of authorization.
    Skipped,
}

impl AuthorizationDecision {
    /// Returns true once any decision has been recorded.
    pub fn is_decided(&self) -> bool {
        !matches!(self, AuthorizationDecision::Undecided)
    }
}

impl From<&AuthorizationResult> for AuthorizationDecision {
    fn from(result: &AuthorizationResult) -> Self {
        if result.granted {
            AuthorizationDecision::Authorized
        } else {
            AuthorizationDecision::Denied {
                reason: result
                    .denial_reason
                    .clone()
                    .unwrap_or_else(|| "Access denied".to_string()),
            }
        }
    }
}

/// Result of an authorization check.
///
/// Contains both the decision and context for logging.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    /// Whether access was granted.
    pub granted: bool,

    /// The resource type being accessed (e.g., "CaseContact", "Volunteer").
    pub resource_type: &'static str,

    /// The ID of the resource being accessed.
    pub resource_id: String,

    /// The user who requested access.
    pub user_id: String,

    /// Optional reason for denial (if denied).
    pub denial_reason: Option<String>,
}

impl AuthorizationResult {
    /// Creates a successful authorization result.
    pub fn granted(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            granted: true,
            resource_type,
            resource_id: resource_id.into(),
            user_id: user_id.into(),
            denial_reason: None,
        }
    }

    /// Creates a denied authorization result.
    pub fn denied(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        user_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            granted: false,
            resource_type,
            resource_id: resource_id.into(),
            user_id: user_id.into(),
            denial_reason: Some(reason.into()),
        }
    }
}

/// Context for authorization decisions.
///
/// Captures the "who, what, which" of an authorization request for
/// consistent logging across handlers.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
    pub user_id: UserId,

    /// The action being performed (e.g., "show", "update", "destroy").
    pub action: String,

    pub resource_type: &'static str,

    pub resource_id: String,
}

impl AuthorizationContext {
    pub fn new(
        user_id: UserId,
        action: impl Into<String>,
        resource_type: &'static str,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            action: action.into(),
            resource_type,
            resource_id: resource_id.into(),
        }
    }

    /// Creates an `AuthorizationResult` for granted access.
    pub fn grant(&self) -> AuthorizationResult {
        AuthorizationResult::granted(
            self.resource_type,
            &self.resource_id,
            self.user_id.to_string(),
        )
    }

    /// Creates an `AuthorizationResult` for denied access.
    pub fn deny(&self, reason: impl Into<String>) -> AuthorizationResult {
        AuthorizationResult::denied(
            self.resource_type,
            &self.resource_id,
            self.user_id.to_string(),
            reason,
        )
    }
}

/// Resources that belong to exactly one tenant.
pub trait TenantScoped {
    /// The type name for authorization logs (e.g., "CaseContact").
    const RESOURCE_TYPE: &'static str;

    fn organization_id(&self) -> &OrganizationId;

    fn resource_id(&self) -> String;
}

/// Grants access only when the resource lives in the principal's tenant.
pub fn check_tenant<T>(resource: &T, principal: &Principal) -> AuthorizationResult
where
    T: TenantScoped,
{
    if resource.organization_id() == &principal.organization_id {
        AuthorizationResult::granted(
            T::RESOURCE_TYPE,
            resource.resource_id(),
            principal.id.to_string(),
        )
    } else {
        AuthorizationResult::denied(
            T::RESOURCE_TYPE,
            resource.resource_id(),
            principal.id.to_string(),
            format!(
                "User {} is not a member of the organization owning {} {}",
                principal.id,
                T::RESOURCE_TYPE,
                resource.resource_id()
            ),
        )
    }
}

/// Grants access when the principal holds one of `allowed` roles.
pub fn check_role(
    ctx: &AuthorizationContext,
    principal: &Principal,
    allowed: &[Role],
) -> AuthorizationResult {
    if allowed.contains(&principal.role) {
        ctx.grant()
    } else {
        ctx.deny(format!(
            "Role {} may not {} {}",
            principal.role, ctx.action, ctx.resource_type
        ))
    }
}
