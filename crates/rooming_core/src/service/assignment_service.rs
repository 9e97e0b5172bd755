//! Assignment Manager use-cases.
//!
//! # Responsibility
//! - Create, close, reopen and remove occupancy intervals.
//! - Answer current occupancy per room and interval history per tenant.
//!
//! # Invariants
//! - A second assignment with the same `(room, start_date)` is a `Conflict`.
//!   Overlapping intervals with different start dates are accepted.
//! - Closing with an `end_date` before `start_date` is `InvalidInput`.
//! - Occupancy is always derived from active rows, never stored.

use crate::model::assignment::{AssignmentDetail, AssignmentId, NewAssignment, Occupancy};
use crate::model::room::RoomId;
use crate::model::tenant::TenantId;
use crate::model::EntityKind;
use crate::repo::assignment_repo::AssignmentRepository;
use crate::service::{checked_date, log_outcome, required, ServiceError, ServiceResult};
use chrono::NaiveDate;

/// Raw create input; every field is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateAssignmentRequest {
    pub tenant_id: Option<TenantId>,
    pub room_id: Option<RoomId>,
    pub start_date: Option<NaiveDate>,
}

impl CreateAssignmentRequest {
    pub fn new(tenant_id: TenantId, room_id: RoomId, start_date: NaiveDate) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            room_id: Some(room_id),
            start_date: Some(start_date),
        }
    }
}

/// Assignment service facade over repository implementations.
pub struct AssignmentService<R: AssignmentRepository> {
    repo: R,
}

impl<R: AssignmentRepository> AssignmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All assignments with tenant and room, newest `start_date` first.
    pub fn list_assignments(&self) -> ServiceResult<Vec<AssignmentDetail>> {
        Ok(self.repo.list_assignments()?)
    }

    pub fn get_assignment(&self, id: AssignmentId) -> ServiceResult<AssignmentDetail> {
        self.repo.get_assignment(id)?.ok_or(ServiceError::NotFound {
            kind: EntityKind::RoomAssignment,
            id,
        })
    }

    /// Opens an active interval for `tenant_id` in `room_id`.
    pub fn create_assignment(
        &self,
        request: CreateAssignmentRequest,
    ) -> ServiceResult<AssignmentDetail> {
        let result = (|| -> ServiceResult<AssignmentDetail> {
            let assignment = NewAssignment {
                tenant_id: required(request.tenant_id, "tenant_id")?,
                room_id: required(request.room_id, "room_id")?,
                start_date: checked_date(required(request.start_date, "start_date")?)?,
            };
            Ok(self.repo.create_assignment(&assignment)?)
        })();
        log_outcome("assignment_create", "assignment", result, |detail| {
            format!(
                "assignment_id={} room_id={} tenant_id={}",
                detail.assignment.id, detail.assignment.room_id, detail.assignment.tenant_id
            )
        })
    }

    /// Sets `end_date`; `None` reopens the interval as active.
    pub fn close_assignment(
        &self,
        id: AssignmentId,
        end_date: Option<NaiveDate>,
    ) -> ServiceResult<AssignmentDetail> {
        let result = (|| -> ServiceResult<AssignmentDetail> {
            let end_date = end_date.map(checked_date).transpose()?;
            Ok(self.repo.close_assignment(id, end_date)?)
        })();
        log_outcome("assignment_close", "assignment", result, |detail| {
            format!(
                "assignment_id={} state={}",
                detail.assignment.id,
                if detail.assignment.is_active() {
                    "active"
                } else {
                    "closed"
                }
            )
        })
    }

    pub fn delete_assignment(&self, id: AssignmentId) -> ServiceResult<()> {
        let result = self.repo.delete_assignment(id).map_err(ServiceError::from);
        log_outcome("assignment_delete", "assignment", result, |_| {
            format!("assignment_id={id}")
        })
    }

    /// Most recent active assignment of the room, if any.
    pub fn current_assignment_for(
        &self,
        room_id: RoomId,
    ) -> ServiceResult<Option<AssignmentDetail>> {
        Ok(self.repo.current_assignment_for(room_id)?)
    }

    /// Interval history of one tenant; `NotFound` for unknown tenants.
    pub fn assignments_for(&self, tenant_id: TenantId) -> ServiceResult<Vec<AssignmentDetail>> {
        Ok(self.repo.assignments_for(tenant_id)?)
    }

    pub fn occupancy_of(&self, room_id: RoomId) -> ServiceResult<Occupancy> {
        Ok(self.repo.occupancy_of(room_id)?)
    }
}
