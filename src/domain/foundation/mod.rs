//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the failure taxonomy and the
//! authorization vocabulary shared by the pipeline and the workflows.

mod auth;
mod authorization;
mod errors;
mod failure;
mod format;
mod ids;
mod tenant;
mod timestamp;

pub use auth::{AuthError, Principal, Role};
pub use authorization::{
    check_role, check_tenant, AuthorizationContext, AuthorizationDecision, AuthorizationResult,
    TenantScoped,
};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use failure::{Failure, FailureKind, UnclassifiedError, NOT_AUTHORIZED_MESSAGE};
pub use format::RequestFormat;
pub use ids::{OrganizationId, SessionId, UserId};
pub use tenant::{SmsAccount, SmsSettings, Tenant, TenantError};
pub use timestamp::Timestamp;
