//! SQLite storage bootstrap for the occupancy and ledger store.
//!
//! # Responsibility
//! - Open connections with the pragmas the occupancy rules rely on.
//! - Bring the schema up to [`migrations::latest_version`] before first use.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Returned connections enforce foreign keys; tenant-owned rows cascade,
//!   room and manager references restrict.
//! - A failed migration leaves the previous schema version in place.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// One embedded migration script failed; the whole batch was rolled back.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build of the store.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Schema version the failure relates to, when there is one.
    pub fn schema_version(&self) -> Option<u32> {
        match self {
            Self::Sqlite(_) => None,
            Self::Migration { version, .. } => Some(*version),
            Self::UnsupportedSchemaVersion { db_version, .. } => Some(*db_version),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration {version:04}_{name} failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema v{db_version} is newer than this build (v{latest_supported}); upgrade before opening"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn migration_failure_names_the_script() {
        let err = DbError::Migration {
            version: 2,
            name: "room_assignments",
            source: rusqlite::Error::InvalidQuery,
        };
        assert_eq!(err.schema_version(), Some(2));
        assert!(err.to_string().starts_with("migration 0002_room_assignments failed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn newer_schema_reports_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 3,
        };
        assert_eq!(err.schema_version(), Some(9));
        assert!(err.to_string().contains("v9"));
        assert!(err.to_string().contains("v3"));
    }
}
