//! Room repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Room names are unique; duplicates surface as `Conflict`.
//! - Room reads attach the current assignment derived from `room_assignments`;
//!   rooms never store occupancy.
//! - Deletes go through the guarded deletion policy.

use crate::model::room::{NewRoom, Room, RoomId, RoomOverview, RoomPatch};
use crate::model::EntityKind;
use crate::repo::assignment_repo::current_assignment_in;
use crate::repo::deletion_guard::delete_with_policy;
use crate::repo::lookup::EntityLookup;
use crate::repo::rows::{parse_room, ROOM_SELECT_SQL};
use crate::repo::{map_write_error, with_read_snapshot, with_write_tx, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for room directory operations.
pub trait RoomRepository {
    fn create_room(&self, room: &NewRoom) -> RepoResult<Room>;
    fn get_room(&self, id: RoomId) -> RepoResult<Option<RoomOverview>>;
    /// Newest `created_at` first.
    fn list_rooms(&self) -> RepoResult<Vec<RoomOverview>>;
    fn update_room(&self, id: RoomId, patch: &RoomPatch) -> RepoResult<Room>;
    fn delete_room(&self, id: RoomId) -> RepoResult<()>;
}

/// SQLite-backed room repository.
pub struct SqliteRoomRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoomRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RoomRepository for SqliteRoomRepository<'_> {
    fn create_room(&self, room: &NewRoom) -> RepoResult<Room> {
        with_write_tx(self.conn, |tx| {
            tx.execute(
                "INSERT INTO rooms (name, notes) VALUES (?1, ?2);",
                params![room.name.as_str(), room.notes.as_deref()],
            )
            .map_err(|err| map_write_error(err, EntityKind::Room))?;
            load_room(tx, tx.last_insert_rowid())
        })
    }

    fn get_room(&self, id: RoomId) -> RepoResult<Option<RoomOverview>> {
        with_read_snapshot(self.conn, |conn| {
            let mut stmt = conn.prepare(&format!("{ROOM_SELECT_SQL} WHERE r.id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            let Some(row) = rows.next()? else {
                return Ok(None);
            };
            let room = parse_room(row, "r_")?;
            let current_assignment = current_assignment_in(conn, room.id)?;
            Ok(Some(RoomOverview {
                room,
                current_assignment,
            }))
        })
    }

    fn list_rooms(&self) -> RepoResult<Vec<RoomOverview>> {
        with_read_snapshot(self.conn, |conn| {
            let mut stmt = conn.prepare(&format!(
                "{ROOM_SELECT_SQL} ORDER BY r.created_at DESC, r.id DESC;"
            ))?;
            let mut rows = stmt.query([])?;
            let mut rooms = Vec::new();
            while let Some(row) = rows.next()? {
                rooms.push(parse_room(row, "r_")?);
            }

            rooms
                .into_iter()
                .map(|room| {
                    let current_assignment = current_assignment_in(conn, room.id)?;
                    Ok(RoomOverview {
                        room,
                        current_assignment,
                    })
                })
                .collect()
        })
    }

    fn update_room(&self, id: RoomId, patch: &RoomPatch) -> RepoResult<Room> {
        with_write_tx(self.conn, |tx| {
            tx.require_entity(EntityKind::Room, id)?;
            if let Some(name) = patch.name.as_deref() {
                tx.execute("UPDATE rooms SET name = ?2 WHERE id = ?1;", params![id, name])
                    .map_err(|err| map_write_error(err, EntityKind::Room))?;
            }
            if let Some(notes) = patch.notes.as_ref() {
                tx.execute(
                    "UPDATE rooms SET notes = ?2 WHERE id = ?1;",
                    params![id, notes.as_deref()],
                )?;
            }
            load_room(tx, id)
        })
    }

    fn delete_room(&self, id: RoomId) -> RepoResult<()> {
        with_write_tx(self.conn, |tx| delete_with_policy(tx, EntityKind::Room, id))
    }
}

fn load_room(conn: &Connection, id: RoomId) -> RepoResult<Room> {
    let mut stmt = conn.prepare(&format!("{ROOM_SELECT_SQL} WHERE r.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => parse_room(row, "r_"),
        None => Err(RepoError::NotFound {
            kind: EntityKind::Room,
            id,
        }),
    }
}
