//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity family.
//! - Keep SQL, row decoding and transaction scoping inside this boundary.
//!
//! # Invariants
//! - Every write runs in one `IMMEDIATE` transaction: reference checks and the
//!   mutation commit together or not at all.
//! - Multi-statement reads run in one transaction so joined rows are consistent.
//! - Unique-constraint failures surface as `RepoError::Conflict`.

pub mod assignment_repo;
mod codec;
pub mod deletion_guard;
pub mod ledger_repo;
pub mod lookup;
pub mod manager_repo;
pub mod room_repo;
mod rows;
pub mod summary_repo;
pub mod tenant_repo;

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use deletion_guard::Dependents;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for ledger persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed a rule that needs stored state to evaluate.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Referenced row does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// Unique constraint rejected the write.
    Conflict { kind: EntityKind, detail: String },
    /// Guarded delete blocked by child rows.
    HasDependents {
        kind: EntityKind,
        id: i64,
        dependents: Dependents,
    },
    /// No deletion policy is registered for this entity family.
    DeleteNotSupported(EntityKind),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict { kind, detail } => write!(f, "{kind} conflict: {detail}"),
            Self::HasDependents {
                kind,
                id,
                dependents,
            } => write!(
                f,
                "{kind} {id} still has {} assignment(s) and {} transaction(s)",
                dependents.assignments, dependents.transactions
            ),
            Self::DeleteNotSupported(kind) => write!(f, "{kind} rows cannot be deleted"),
            Self::InvalidData(message) => write!(f, "invalid persisted ledger data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps unique-constraint failures of a write on `kind` to `Conflict`.
pub(crate) fn map_write_error(err: rusqlite::Error, kind: EntityKind) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        {
            return RepoError::Conflict {
                kind,
                detail: message
                    .clone()
                    .unwrap_or_else(|| "unique constraint failed".to_string()),
            };
        }
    }
    RepoError::from(err)
}

/// Runs `write` inside one `IMMEDIATE` transaction; rolls back on error.
pub(crate) fn with_write_tx<T>(
    conn: &Connection,
    write: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = write(&*tx)?;
    tx.commit()?;
    Ok(value)
}

/// Runs `read` inside one deferred transaction for a consistent snapshot.
pub(crate) fn with_read_snapshot<T>(
    conn: &Connection,
    read: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Deferred)?;
    let value = read(&*tx)?;
    tx.commit()?;
    Ok(value)
}
