//! Occupancy and ledger engine for a rooming house.
//! This crate is the single source of truth for occupancy and ledger invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig, LogConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::assignment::{AssignmentDetail, AssignmentId, Occupancy, RoomAssignment};
pub use model::summary::Summary;
pub use model::validation::ValidationError;
pub use model::EntityKind;
pub use repo::assignment_repo::SqliteAssignmentRepository;
pub use repo::deletion_guard::{deletion_policy, DeletionPolicy, Dependents};
pub use repo::ledger_repo::SqliteLedgerRepository;
pub use repo::lookup::EntityLookup;
pub use repo::manager_repo::SqliteManagerRepository;
pub use repo::room_repo::SqliteRoomRepository;
pub use repo::summary_repo::SqliteSummaryRepository;
pub use repo::tenant_repo::SqliteTenantRepository;
pub use repo::{RepoError, RepoResult};
pub use service::assignment_service::{AssignmentService, CreateAssignmentRequest};
pub use service::ledger_service::{LedgerService, RecordPaymentRequest, RecordTransferRequest};
pub use service::manager_service::ManagerService;
pub use service::room_service::RoomService;
pub use service::summary_service::SummaryService;
pub use service::tenant_service::TenantService;
pub use service::{ErrorKind, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
