//! Manager identity records.
//!
//! The credential is opaque to the core: it is produced and verified by the
//! auth layer and only handed back through [`ManagerCredential`].

use chrono::{DateTime, Utc};
use serde::Serialize;

pub type ManagerId = i64;

/// Public manager profile. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerProfile {
    pub id: ManagerId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Credential lookup result for the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerCredential {
    pub id: ManagerId,
    pub username: String,
    pub credential_hash: String,
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewManager {
    pub username: String,
    pub credential_hash: String,
}

/// Validated profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerPatch {
    pub username: Option<String>,
    pub credential_hash: Option<String>,
}

impl ManagerPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.credential_hash.is_none()
    }
}
