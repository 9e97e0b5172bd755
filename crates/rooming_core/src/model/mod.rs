//! Domain model for the rooming house ledger.
//!
//! # Responsibility
//! - Define the records shared by repositories and services.
//! - Own input validation rules that do not need storage access.
//!
//! # Invariants
//! - Identifiers are storage-assigned, monotonic and never reused.
//! - Occupancy is never stored on `Room` or `Tenant`; it is derived from
//!   active `RoomAssignment` rows.

pub mod assignment;
pub mod manager;
pub mod room;
pub mod summary;
pub mod tenant;
pub mod transaction;
pub mod validation;

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Entity families persisted by the ledger store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Manager,
    Room,
    Tenant,
    RoomAssignment,
    TenantTransaction,
    ManagerTransaction,
}

impl EntityKind {
    /// Stable lowercase label used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Room => "room",
            Self::Tenant => "tenant",
            Self::RoomAssignment => "room_assignment",
            Self::TenantTransaction => "tenant_transaction",
            Self::ManagerTransaction => "manager_transaction",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
