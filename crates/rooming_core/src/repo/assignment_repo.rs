//! Room assignment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the lifecycle of occupancy intervals (create, close, delete).
//! - Answer "who holds room R now" and "where has tenant T lived".
//!
//! # Invariants
//! - `(room_id, start_date)` uniqueness is enforced by the storage constraint,
//!   not by a read-then-insert check; concurrent duplicates surface as `Conflict`.
//! - The current assignment of a room is its active row with the latest
//!   `start_date`; ties are broken by the newest id.
//! - A closing `end_date` earlier than `start_date` is rejected inside the same
//!   transaction that writes it.

use crate::model::assignment::{AssignmentDetail, AssignmentId, NewAssignment, Occupancy};
use crate::model::room::RoomId;
use crate::model::tenant::TenantId;
use crate::model::EntityKind;
use crate::repo::codec::date_to_db;
use crate::repo::lookup::EntityLookup;
use crate::repo::rows::{parse_assignment_detail, ASSIGNMENT_DETAIL_SELECT_SQL};
use crate::repo::{map_write_error, with_read_snapshot, with_write_tx, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

/// Repository interface for occupancy intervals.
pub trait AssignmentRepository {
    /// Every assignment, newest `start_date` first.
    fn list_assignments(&self) -> RepoResult<Vec<AssignmentDetail>>;
    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<AssignmentDetail>>;
    /// Creates an active assignment after checking tenant and room exist.
    fn create_assignment(&self, assignment: &NewAssignment) -> RepoResult<AssignmentDetail>;
    /// Sets or clears `end_date`.
    fn close_assignment(
        &self,
        id: AssignmentId,
        end_date: Option<NaiveDate>,
    ) -> RepoResult<AssignmentDetail>;
    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()>;
    fn current_assignment_for(&self, room_id: RoomId) -> RepoResult<Option<AssignmentDetail>>;
    /// Interval history of one tenant, newest `start_date` first.
    fn assignments_for(&self, tenant_id: TenantId) -> RepoResult<Vec<AssignmentDetail>>;
    /// Vacant or occupied; `NotFound` if the room does not exist.
    fn occupancy_of(&self, room_id: RoomId) -> RepoResult<Occupancy>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn list_assignments(&self) -> RepoResult<Vec<AssignmentDetail>> {
        assignments_in(self.conn, None)
    }

    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<AssignmentDetail>> {
        find_detail(self.conn, id)
    }

    fn create_assignment(&self, assignment: &NewAssignment) -> RepoResult<AssignmentDetail> {
        with_write_tx(self.conn, |tx| {
            tx.require_entity(EntityKind::Tenant, assignment.tenant_id)?;
            tx.require_entity(EntityKind::Room, assignment.room_id)?;
            tx.execute(
                "INSERT INTO room_assignments (tenant_id, room_id, start_date, end_date)
                 VALUES (?1, ?2, ?3, NULL);",
                params![
                    assignment.tenant_id,
                    assignment.room_id,
                    date_to_db(assignment.start_date),
                ],
            )
            .map_err(|err| map_write_error(err, EntityKind::RoomAssignment))?;
            load_detail(tx, tx.last_insert_rowid())
        })
    }

    fn close_assignment(
        &self,
        id: AssignmentId,
        end_date: Option<NaiveDate>,
    ) -> RepoResult<AssignmentDetail> {
        with_write_tx(self.conn, |tx| {
            let current = load_detail(tx, id)?;
            current.assignment.validate_end(end_date)?;
            tx.execute(
                "UPDATE room_assignments SET end_date = ?2 WHERE id = ?1;",
                params![id, end_date.map(date_to_db)],
            )?;
            load_detail(tx, id)
        })
    }

    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM room_assignments WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::RoomAssignment,
                id,
            });
        }
        Ok(())
    }

    fn current_assignment_for(&self, room_id: RoomId) -> RepoResult<Option<AssignmentDetail>> {
        current_assignment_in(self.conn, room_id)
    }

    fn assignments_for(&self, tenant_id: TenantId) -> RepoResult<Vec<AssignmentDetail>> {
        with_read_snapshot(self.conn, |conn| {
            conn.require_entity(EntityKind::Tenant, tenant_id)?;
            assignments_in(conn, Some(tenant_id))
        })
    }

    fn occupancy_of(&self, room_id: RoomId) -> RepoResult<Occupancy> {
        with_read_snapshot(self.conn, |conn| {
            conn.require_entity(EntityKind::Room, room_id)?;
            let current = current_assignment_in(conn, room_id)?;
            Ok(Occupancy::from_current(current.as_ref()))
        })
    }
}

/// Most recent active assignment of a room, if any.
pub(crate) fn current_assignment_in(
    conn: &Connection,
    room_id: RoomId,
) -> RepoResult<Option<AssignmentDetail>> {
    let mut stmt = conn.prepare(&format!(
        "{ASSIGNMENT_DETAIL_SELECT_SQL}
         WHERE a.room_id = ?1
           AND a.end_date IS NULL
         ORDER BY a.start_date DESC, a.id DESC
         LIMIT 1;"
    ))?;
    let mut rows = stmt.query([room_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_assignment_detail(row)?)),
        None => Ok(None),
    }
}

/// All assignments, optionally restricted to one tenant.
pub(crate) fn assignments_in(
    conn: &Connection,
    tenant_id: Option<TenantId>,
) -> RepoResult<Vec<AssignmentDetail>> {
    let mut stmt = conn.prepare(&format!(
        "{ASSIGNMENT_DETAIL_SELECT_SQL}
         WHERE (?1 IS NULL OR a.tenant_id = ?1)
         ORDER BY a.start_date DESC, a.id DESC;"
    ))?;
    let mut rows = stmt.query([tenant_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_assignment_detail(row)?);
    }
    Ok(items)
}

fn find_detail(conn: &Connection, id: AssignmentId) -> RepoResult<Option<AssignmentDetail>> {
    let mut stmt = conn.prepare(&format!("{ASSIGNMENT_DETAIL_SELECT_SQL} WHERE a.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_assignment_detail(row)?)),
        None => Ok(None),
    }
}

fn load_detail(conn: &Connection, id: AssignmentId) -> RepoResult<AssignmentDetail> {
    find_detail(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::RoomAssignment,
        id,
    })
}
