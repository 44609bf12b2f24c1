//! Session validation port.
//!
//! Defines the contract for turning a session token into the request's
//! principal. It is provider-agnostic; credential verification itself
//! belongs to the identity provider behind the implementation.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Principal};

/// Validates session tokens and extracts the principal.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for unknown or malformed tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a token and return the principal it belongs to.
    ///
    /// # Arguments
    ///
    /// * `token` - The raw token (without "Bearer " prefix)
    async fn validate(&self, token: &str) -> Result<Principal, AuthError>;
}
