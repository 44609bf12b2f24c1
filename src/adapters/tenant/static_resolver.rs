//! Tenant resolver backed by a fixed in-memory directory.
//!
//! Resolves a principal's tenant by organization ID. Used in tests and
//! for single-organization deployments configured at startup.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{Principal, Tenant, TenantError};
use crate::ports::TenantResolver;

/// In-memory tenant directory.
#[derive(Debug, Default)]
pub struct StaticTenantResolver {
    tenants: RwLock<HashMap<String, Tenant>>,
    force_error: RwLock<Option<TenantError>>,
}

impl StaticTenantResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tenant under its organization ID.
    pub fn with_tenant(self, tenant: Tenant) -> Self {
        self.add_tenant(tenant);
        self
    }

    /// Forces all resolutions to return the specified error.
    pub fn with_error(self, error: TenantError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn add_tenant(&self, tenant: Tenant) {
        self.tenants
            .write()
            .unwrap()
            .insert(tenant.id.as_str().to_string(), tenant);
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.read().unwrap().len()
    }
}

#[async_trait]
impl TenantResolver for StaticTenantResolver {
    async fn resolve(&self, principal: &Principal) -> Result<Tenant, TenantError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tenants
            .read()
            .unwrap()
            .get(principal.organization_id.as_str())
            .cloned()
            .ok_or_else(|| TenantError::UnknownTenant(principal.organization_id.to_string()))
    }
}
