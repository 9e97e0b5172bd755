//! Foreign-reference lookups exposed by the store.
//!
//! Every repository validates references through [`EntityLookup`] inside its
//! write transaction instead of hand-rolling an existence query per operation.

use crate::model::EntityKind;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension};

/// Identity lookup capability over persisted entities.
pub trait EntityLookup {
    /// Returns whether a row of `kind` with `id` exists.
    fn entity_exists(&self, kind: EntityKind, id: i64) -> RepoResult<bool>;

    /// Resolves a unique name (room/tenant name, manager username) to an id.
    ///
    /// Entity kinds without a unique name always resolve to `None`.
    fn id_by_name(&self, kind: EntityKind, name: &str) -> RepoResult<Option<i64>>;

    /// Fails with `RepoError::NotFound` when the row does not exist.
    fn require_entity(&self, kind: EntityKind, id: i64) -> RepoResult<()> {
        if self.entity_exists(kind, id)? {
            Ok(())
        } else {
            Err(RepoError::NotFound { kind, id })
        }
    }
}

impl EntityLookup for Connection {
    fn entity_exists(&self, kind: EntityKind, id: i64) -> RepoResult<bool> {
        let exists: i64 = self.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
                table_name(kind)
            ),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn id_by_name(&self, kind: EntityKind, name: &str) -> RepoResult<Option<i64>> {
        let Some(column) = name_column(kind) else {
            return Ok(None);
        };
        let id = self
            .query_row(
                &format!(
                    "SELECT id FROM {} WHERE {column} = ?1;",
                    table_name(kind)
                ),
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }
}

pub(crate) fn table_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Manager => "managers",
        EntityKind::Room => "rooms",
        EntityKind::Tenant => "tenants",
        EntityKind::RoomAssignment => "room_assignments",
        EntityKind::TenantTransaction => "tenant_transactions",
        EntityKind::ManagerTransaction => "manager_transactions",
    }
}

fn name_column(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::Manager => Some("username"),
        EntityKind::Room | EntityKind::Tenant => Some("name"),
        EntityKind::RoomAssignment
        | EntityKind::TenantTransaction
        | EntityKind::ManagerTransaction => None,
    }
}

#[cfg(test)]
mod tests {
    use super::EntityLookup;
    use crate::db::open_db_in_memory;
    use crate::model::EntityKind;
    use crate::repo::RepoError;

    #[test]
    fn lookup_by_id_and_name() {
        let conn = open_db_in_memory().unwrap();
        conn.execute("INSERT INTO rooms (name) VALUES ('A-101');", [])
            .unwrap();
        let id = conn.last_insert_rowid();

        assert!(conn.entity_exists(EntityKind::Room, id).unwrap());
        assert!(!conn.entity_exists(EntityKind::Tenant, id).unwrap());
        assert_eq!(conn.id_by_name(EntityKind::Room, "A-101").unwrap(), Some(id));
        assert_eq!(conn.id_by_name(EntityKind::Room, "B-201").unwrap(), None);
        assert_eq!(
            conn.id_by_name(EntityKind::RoomAssignment, "A-101").unwrap(),
            None
        );
    }

    #[test]
    fn require_entity_reports_kind_and_id() {
        let conn = open_db_in_memory().unwrap();
        let err = conn.require_entity(EntityKind::Manager, 42).unwrap_err();
        assert!(matches!(
            err,
            RepoError::NotFound {
                kind: EntityKind::Manager,
                id: 42
            }
        ));
    }
}
