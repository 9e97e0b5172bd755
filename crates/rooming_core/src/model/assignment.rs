//! Room assignment intervals.
//!
//! # Invariants
//! - `end_date`, when present, is not before `start_date`.
//! - An assignment is active while `end_date` is `None`.
//! - Storage rejects a second assignment with the same `(room_id, start_date)`;
//!   overlapping intervals with different start dates are accepted.

use crate::model::room::{Room, RoomId};
use crate::model::tenant::{Tenant, TenantId};
use crate::model::validation::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub type AssignmentId = i64;

/// Derived lifecycle state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// Open-ended; the tenant currently holds the room.
    Active,
    /// Finished interval.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAssignment {
    pub id: AssignmentId,
    pub tenant_id: TenantId,
    pub room_id: RoomId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl RoomAssignment {
    pub fn state(&self) -> AssignmentState {
        if self.end_date.is_some() {
            AssignmentState::Closed
        } else {
            AssignmentState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == AssignmentState::Active
    }

    /// Checks a prospective `end_date` against this interval's start.
    ///
    /// `None` reopens the interval and is always accepted.
    pub fn validate_end(&self, end_date: Option<NaiveDate>) -> Result<(), ValidationError> {
        match end_date {
            Some(end) if end < self.start_date => Err(ValidationError::EndBeforeStart {
                start: self.start_date,
                end,
            }),
            _ => Ok(()),
        }
    }
}

/// Assignment joined with its tenant and room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: RoomAssignment,
    pub tenant: Tenant,
    pub room: Room,
}

/// Validated create input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssignment {
    pub tenant_id: TenantId,
    pub room_id: RoomId,
    pub start_date: NaiveDate,
}

/// Live occupancy of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Occupancy {
    Vacant,
    #[serde(rename_all = "camelCase")]
    Occupied {
        tenant_id: TenantId,
        tenant_name: String,
        since: NaiveDate,
    },
}

impl Occupancy {
    /// Derives occupancy from the room's current assignment.
    pub fn from_current(current: Option<&AssignmentDetail>) -> Self {
        match current {
            None => Self::Vacant,
            Some(detail) => Self::Occupied {
                tenant_id: detail.tenant.id,
                tenant_name: detail.tenant.name.clone(),
                since: detail.assignment.start_date,
            },
        }
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, Self::Vacant)
    }
}

#[cfg(test)]
mod tests {
    use super::{AssignmentState, RoomAssignment};
    use crate::model::validation::ValidationError;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment(end_date: Option<NaiveDate>) -> RoomAssignment {
        RoomAssignment {
            id: 1,
            tenant_id: 1,
            room_id: 1,
            start_date: date(2025, 5, 1),
            end_date,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn state_follows_end_date() {
        assert_eq!(assignment(None).state(), AssignmentState::Active);
        assert_eq!(
            assignment(Some(date(2025, 6, 1))).state(),
            AssignmentState::Closed
        );
    }

    #[test]
    fn validate_end_rejects_dates_before_start() {
        let open = assignment(None);
        assert!(open.validate_end(None).is_ok());
        assert!(open.validate_end(Some(date(2025, 5, 1))).is_ok());
        assert_eq!(
            open.validate_end(Some(date(2025, 4, 30))),
            Err(ValidationError::EndBeforeStart {
                start: date(2025, 5, 1),
                end: date(2025, 4, 30),
            })
        );
    }
}
