//! Mock session validator for testing.
//!
//! # Example
//!
//! ```ignore
//! use casa_pipeline::adapters::auth::MockSessionValidator;
//! use casa_pipeline::domain::foundation::Role;
//!
//! let validator = MockSessionValidator::new()
//!     .with_test_user("valid-token", "user-123", Role::Supervisor, "org-1");
//!
//! let principal = validator.validate("valid-token").await?;
//! assert_eq!(principal.role, Role::Supervisor);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, OrganizationId, Principal, Role, UserId};
use crate::ports::SessionValidator;

/// Mock session validator for testing.
///
/// Stores a map of tokens to principals. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    /// Map of valid tokens to their principals
    tokens: RwLock<HashMap<String, Principal>>,
    /// Optional error to return for all validations (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    /// Creates a new empty mock validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a principal.
    pub fn with_principal(self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.write().unwrap().insert(token.into(), principal);
        self
    }

    /// Adds a valid token with a generated principal.
    pub fn with_test_user(
        self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        role: Role,
        organization_id: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        let principal = Principal::new(
            UserId::new(&user_id).unwrap(),
            format!("{}@test.example.com", user_id),
            role,
            OrganizationId::new(organization_id).unwrap(),
        )
        .with_display_name(format!("Test User {}", user_id));
        self.with_principal(token, principal)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }

    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap().len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
