//! Manager account use-cases.
//!
//! The credential hash is produced by the auth layer; this service only checks
//! it is present and hands it back through [`ManagerService::credential_for`].

use crate::model::manager::{
    ManagerCredential, ManagerId, ManagerPatch, ManagerProfile, NewManager,
};
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::manager_repo::ManagerRepository;
use crate::service::{log_outcome, normalize_name, ServiceError, ServiceResult};

/// Manager service facade over repository implementations.
pub struct ManagerService<R: ManagerRepository> {
    repo: R,
}

impl<R: ManagerRepository> ManagerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn register_manager(
        &self,
        username: impl AsRef<str>,
        credential_hash: impl AsRef<str>,
    ) -> ServiceResult<ManagerProfile> {
        let result = (|| -> ServiceResult<ManagerProfile> {
            let manager = NewManager {
                username: normalize_name(username.as_ref(), "username")?,
                credential_hash: normalize_credential(credential_hash.as_ref())?,
            };
            Ok(self.repo.create_manager(&manager)?)
        })();
        log_outcome("manager_register", "manager", result, |profile| {
            format!("manager_id={}", profile.id)
        })
    }

    pub fn get_manager(&self, id: ManagerId) -> ServiceResult<ManagerProfile> {
        self.repo.get_manager(id)?.ok_or(ServiceError::NotFound {
            kind: EntityKind::Manager,
            id,
        })
    }

    pub fn find_manager_by_username(&self, username: &str) -> ServiceResult<ManagerProfile> {
        let username = normalize_name(username, "username")?;
        self.repo
            .find_by_username(&username)?
            .ok_or(ServiceError::UnknownName {
                kind: EntityKind::Manager,
                name: username,
            })
    }

    /// Stored credential for the auth layer; `None` for unknown usernames.
    pub fn credential_for(&self, username: &str) -> ServiceResult<Option<ManagerCredential>> {
        let username = normalize_name(username, "username")?;
        Ok(self.repo.credential_for(&username)?)
    }

    pub fn update_manager_profile(
        &self,
        id: ManagerId,
        patch: ManagerPatch,
    ) -> ServiceResult<ManagerProfile> {
        let result = (|| -> ServiceResult<ManagerProfile> {
            if patch.is_empty() {
                return Err(ValidationError::NothingToUpdate.into());
            }
            let normalized = ManagerPatch {
                username: patch
                    .username
                    .as_deref()
                    .map(|username| normalize_name(username, "username"))
                    .transpose()?,
                credential_hash: patch
                    .credential_hash
                    .as_deref()
                    .map(normalize_credential)
                    .transpose()?,
            };
            Ok(self.repo.update_manager(id, &normalized)?)
        })();
        log_outcome("manager_update", "manager", result, |profile| {
            format!("manager_id={}", profile.id)
        })
    }
}

fn normalize_credential(value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField("credential_hash"));
    }
    Ok(value.to_string())
}
