//! Room records and the room-facing occupancy view.

use crate::model::assignment::{AssignmentDetail, Occupancy};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub type RoomId = i64;

/// Stored room row. Carries no occupancy state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Room plus its current (most recent active) assignment, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOverview {
    #[serde(flatten)]
    pub room: Room,
    pub current_assignment: Option<AssignmentDetail>,
}

impl RoomOverview {
    /// Vacant iff there is no current assignment.
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::from_current(self.current_assignment.as_ref())
    }
}

/// Validated create input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub notes: Option<String>,
}

/// Validated partial update. `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
}

impl RoomPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.notes.is_none()
    }
}
