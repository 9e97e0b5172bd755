//! Tenant directory use-cases.
//!
//! Tenant deletion is unguarded: assignments and payments of the tenant are
//! removed with it.

use crate::model::tenant::{
    NewTenant, Tenant, TenantDetail, TenantId, TenantOverview, TenantPatch,
};
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::tenant_repo::TenantRepository;
use crate::service::{log_outcome, normalize_name, normalize_notes, ServiceError, ServiceResult};

/// Tenant service facade over repository implementations.
pub struct TenantService<R: TenantRepository> {
    repo: R,
}

impl<R: TenantRepository> TenantService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_tenant(
        &self,
        name: impl AsRef<str>,
        notes: Option<String>,
    ) -> ServiceResult<Tenant> {
        let result = (|| -> ServiceResult<Tenant> {
            let tenant = NewTenant {
                name: normalize_name(name.as_ref(), "name")?,
                notes: normalize_notes(notes),
            };
            Ok(self.repo.create_tenant(&tenant)?)
        })();
        log_outcome("tenant_create", "tenant", result, |tenant| {
            format!("tenant_id={}", tenant.id)
        })
    }

    pub fn list_tenants(&self) -> ServiceResult<Vec<TenantOverview>> {
        Ok(self.repo.list_tenants()?)
    }

    /// Tenant with assignment history and payments.
    pub fn get_tenant(&self, id: TenantId) -> ServiceResult<TenantDetail> {
        self.repo.get_tenant(id)?.ok_or(ServiceError::NotFound {
            kind: EntityKind::Tenant,
            id,
        })
    }

    pub fn get_tenant_by_name(&self, name: &str) -> ServiceResult<TenantDetail> {
        let name = normalize_name(name, "name")?;
        self.repo
            .get_tenant_by_name(&name)?
            .ok_or(ServiceError::UnknownName {
                kind: EntityKind::Tenant,
                name,
            })
    }

    pub fn update_tenant(&self, id: TenantId, patch: TenantPatch) -> ServiceResult<Tenant> {
        let result = (|| -> ServiceResult<Tenant> {
            if patch.is_empty() {
                return Err(ValidationError::NothingToUpdate.into());
            }
            let normalized = TenantPatch {
                name: patch
                    .name
                    .as_deref()
                    .map(|name| normalize_name(name, "name"))
                    .transpose()?,
                notes: patch.notes.map(normalize_notes),
            };
            Ok(self.repo.update_tenant(id, &normalized)?)
        })();
        log_outcome("tenant_update", "tenant", result, |tenant| {
            format!("tenant_id={}", tenant.id)
        })
    }

    pub fn delete_tenant(&self, id: TenantId) -> ServiceResult<()> {
        let result = self.repo.delete_tenant(id).map_err(ServiceError::from);
        log_outcome("tenant_delete", "tenant", result, |_| {
            format!("tenant_id={id}")
        })
    }
}
