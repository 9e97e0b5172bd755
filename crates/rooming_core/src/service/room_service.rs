//! Room directory use-cases.
//!
//! # Invariants
//! - Room names are trimmed and never blank.
//! - Room deletion is guarded: rooms with occupancy or payment history stay.

use crate::model::room::{NewRoom, Room, RoomId, RoomOverview, RoomPatch};
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::room_repo::RoomRepository;
use crate::service::{log_outcome, normalize_name, normalize_notes, ServiceError, ServiceResult};

/// Room service facade over repository implementations.
pub struct RoomService<R: RoomRepository> {
    repo: R,
}

impl<R: RoomRepository> RoomService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_room(
        &self,
        name: impl AsRef<str>,
        notes: Option<String>,
    ) -> ServiceResult<Room> {
        let result = (|| -> ServiceResult<Room> {
            let room = NewRoom {
                name: normalize_name(name.as_ref(), "name")?,
                notes: normalize_notes(notes),
            };
            Ok(self.repo.create_room(&room)?)
        })();
        log_outcome("room_create", "room", result, |room| {
            format!("room_id={}", room.id)
        })
    }

    /// Rooms with derived occupancy, newest first.
    pub fn list_rooms(&self) -> ServiceResult<Vec<RoomOverview>> {
        Ok(self.repo.list_rooms()?)
    }

    pub fn get_room(&self, id: RoomId) -> ServiceResult<RoomOverview> {
        self.repo.get_room(id)?.ok_or(ServiceError::NotFound {
            kind: EntityKind::Room,
            id,
        })
    }

    /// Applies only the supplied fields; `notes: Some(None)` clears notes.
    pub fn update_room(&self, id: RoomId, patch: RoomPatch) -> ServiceResult<Room> {
        let result = (|| -> ServiceResult<Room> {
            if patch.is_empty() {
                return Err(ValidationError::NothingToUpdate.into());
            }
            let normalized = RoomPatch {
                name: patch
                    .name
                    .as_deref()
                    .map(|name| normalize_name(name, "name"))
                    .transpose()?,
                notes: patch.notes.map(normalize_notes),
            };
            Ok(self.repo.update_room(id, &normalized)?)
        })();
        log_outcome("room_update", "room", result, |room| {
            format!("room_id={}", room.id)
        })
    }

    /// Fails with `HasDependents` while any assignment or payment references
    /// the room.
    pub fn delete_room(&self, id: RoomId) -> ServiceResult<()> {
        let result = self.repo.delete_room(id).map_err(ServiceError::from);
        log_outcome("room_delete", "room", result, |_| format!("room_id={id}"))
    }
}
