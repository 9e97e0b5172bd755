//! Per-entity deletion policy and the guarded delete routine.
//!
//! # Invariants
//! - Rooms are guarded: a room with any assignment or payment cannot be deleted.
//! - Tenants are unguarded: their assignments and payments cascade in storage.
//! - Entity kinds absent from the table have no delete operation.

use crate::model::EntityKind;
use crate::repo::codec::parse_count;
use crate::repo::lookup::{table_name, EntityLookup};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;
use serde::Serialize;

/// How a delete treats rows that still reference the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Refuse while dependents exist.
    Guarded,
    /// Delete and let storage referential actions handle dependents.
    Unguarded,
}

const DELETION_POLICIES: &[(EntityKind, DeletionPolicy)] = &[
    (EntityKind::Room, DeletionPolicy::Guarded),
    (EntityKind::Tenant, DeletionPolicy::Unguarded),
];

/// Returns the registered policy, or `None` when `kind` cannot be deleted.
pub fn deletion_policy(kind: EntityKind) -> Option<DeletionPolicy> {
    DELETION_POLICIES
        .iter()
        .find(|(entry, _)| *entry == kind)
        .map(|(_, policy)| *policy)
}

/// Dependent record counts for one room or tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dependents {
    pub assignments: u64,
    pub transactions: u64,
}

impl Dependents {
    pub fn is_empty(&self) -> bool {
        self.assignments == 0 && self.transactions == 0
    }
}

/// Counts assignments and tenant payments referencing the row.
pub(crate) fn count_dependents(
    conn: &Connection,
    kind: EntityKind,
    id: i64,
) -> RepoResult<Dependents> {
    let column = match kind {
        EntityKind::Room => "room_id",
        EntityKind::Tenant => "tenant_id",
        _ => return Ok(Dependents::default()),
    };
    let (assignments, transactions): (i64, i64) = conn.query_row(
        &format!(
            "SELECT
                (SELECT COUNT(*) FROM room_assignments WHERE {column} = ?1),
                (SELECT COUNT(*) FROM tenant_transactions WHERE {column} = ?1);"
        ),
        [id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(Dependents {
        assignments: parse_count(assignments, "dependent assignments")?,
        transactions: parse_count(transactions, "dependent transactions")?,
    })
}

/// Deletes one row according to its kind's policy.
///
/// Must run inside the caller's write transaction so the dependent check and
/// the delete are atomic.
pub(crate) fn delete_with_policy(conn: &Connection, kind: EntityKind, id: i64) -> RepoResult<()> {
    let policy = deletion_policy(kind).ok_or(RepoError::DeleteNotSupported(kind))?;
    conn.require_entity(kind, id)?;

    if policy == DeletionPolicy::Guarded {
        let dependents = count_dependents(conn, kind, id)?;
        if !dependents.is_empty() {
            return Err(RepoError::HasDependents {
                kind,
                id,
                dependents,
            });
        }
    }

    conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", table_name(kind)),
        [id],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{deletion_policy, DeletionPolicy};
    use crate::model::EntityKind;

    #[test]
    fn policy_table_is_asymmetric() {
        assert_eq!(deletion_policy(EntityKind::Room), Some(DeletionPolicy::Guarded));
        assert_eq!(
            deletion_policy(EntityKind::Tenant),
            Some(DeletionPolicy::Unguarded)
        );
        assert_eq!(deletion_policy(EntityKind::Manager), None);
    }
}
