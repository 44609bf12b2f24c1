//! Tenant resolution port.

use async_trait::async_trait;

use crate::domain::foundation::{Principal, Tenant, TenantError};

/// Resolves the organization a principal acts within.
///
/// Returns `TenantError::UnknownTenant` when no organization matches; the
/// pipeline answers that with a "not authorized" response.
#[async_trait]
pub trait TenantResolver: Send + Sync {
    async fn resolve(&self, principal: &Principal) -> Result<Tenant, TenantError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_resolver_is_object_safe() {
        fn _accepts_dyn(_resolver: &dyn TenantResolver) {}
    }
}
