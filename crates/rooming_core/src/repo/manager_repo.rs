//! Manager repository contracts and SQLite implementation.
//!
//! Managers are never deleted by the core. The credential column is written
//! and read back verbatim; hashing belongs to the auth layer.

use crate::model::manager::{
    ManagerCredential, ManagerId, ManagerPatch, ManagerProfile, NewManager,
};
use crate::model::EntityKind;
use crate::repo::lookup::EntityLookup;
use crate::repo::rows::{parse_manager_profile, MANAGER_SELECT_SQL};
use crate::repo::{map_write_error, with_write_tx, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for manager accounts.
pub trait ManagerRepository {
    fn create_manager(&self, manager: &NewManager) -> RepoResult<ManagerProfile>;
    fn get_manager(&self, id: ManagerId) -> RepoResult<Option<ManagerProfile>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<ManagerProfile>>;
    fn credential_for(&self, username: &str) -> RepoResult<Option<ManagerCredential>>;
    fn update_manager(&self, id: ManagerId, patch: &ManagerPatch) -> RepoResult<ManagerProfile>;
}

/// SQLite-backed manager repository.
pub struct SqliteManagerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteManagerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ManagerRepository for SqliteManagerRepository<'_> {
    fn create_manager(&self, manager: &NewManager) -> RepoResult<ManagerProfile> {
        with_write_tx(self.conn, |tx| {
            tx.execute(
                "INSERT INTO managers (username, credential_hash) VALUES (?1, ?2);",
                params![manager.username.as_str(), manager.credential_hash.as_str()],
            )
            .map_err(|err| map_write_error(err, EntityKind::Manager))?;
            load_profile(tx, tx.last_insert_rowid())
        })
    }

    fn get_manager(&self, id: ManagerId) -> RepoResult<Option<ManagerProfile>> {
        find_profile(self.conn, id)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<ManagerProfile>> {
        match self.conn.id_by_name(EntityKind::Manager, username)? {
            Some(id) => find_profile(self.conn, id),
            None => Ok(None),
        }
    }

    fn credential_for(&self, username: &str) -> RepoResult<Option<ManagerCredential>> {
        let credential = self
            .conn
            .query_row(
                "SELECT id, username, credential_hash FROM managers WHERE username = ?1;",
                [username],
                |row| {
                    Ok(ManagerCredential {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        credential_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(credential)
    }

    fn update_manager(&self, id: ManagerId, patch: &ManagerPatch) -> RepoResult<ManagerProfile> {
        with_write_tx(self.conn, |tx| {
            tx.require_entity(EntityKind::Manager, id)?;
            if let Some(username) = patch.username.as_deref() {
                tx.execute(
                    "UPDATE managers SET username = ?2 WHERE id = ?1;",
                    params![id, username],
                )
                .map_err(|err| map_write_error(err, EntityKind::Manager))?;
            }
            if let Some(credential_hash) = patch.credential_hash.as_deref() {
                tx.execute(
                    "UPDATE managers SET credential_hash = ?2 WHERE id = ?1;",
                    params![id, credential_hash],
                )?;
            }
            load_profile(tx, id)
        })
    }
}

fn find_profile(conn: &Connection, id: ManagerId) -> RepoResult<Option<ManagerProfile>> {
    let mut stmt = conn.prepare(&format!("{MANAGER_SELECT_SQL} WHERE m.id = ?1;"))?;
    let profile = stmt
        .query_row([id], |row| Ok(parse_manager_profile(row, "m_")))
        .optional()?
        .transpose()?;
    Ok(profile)
}

fn load_profile(conn: &Connection, id: ManagerId) -> RepoResult<ManagerProfile> {
    find_profile(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::Manager,
        id,
    })
}
