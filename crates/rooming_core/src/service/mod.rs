//! Core use-case services.
//!
//! # Responsibility
//! - Validate and normalize caller input before it reaches a repository.
//! - Orchestrate repository calls into use-case level APIs.
//! - Map persistence failures onto the caller-facing error kinds.
//!
//! # Invariants
//! - Every mutating call either fully applies or returns an error.
//! - Log lines carry ids and error kinds only, never names, notes or
//!   credentials.

pub mod assignment_service;
pub mod ledger_service;
pub mod manager_service;
pub mod room_service;
pub mod summary_service;
pub mod tenant_service;

use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::deletion_guard::Dependents;
use crate::repo::RepoError;
use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing error classification used for status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Conflict,
    HasDependents,
    /// Storage failure or corrupt persisted data.
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::HasDependents => "has_dependents",
            Self::Storage => "storage",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service error for all core use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Required field missing or malformed.
    InvalidInput(ValidationError),
    /// Referenced id does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// Unique name lookup found nothing.
    UnknownName { kind: EntityKind, name: String },
    /// Uniqueness violation.
    Conflict { kind: EntityKind, detail: String },
    /// Delete blocked by child records.
    HasDependents {
        kind: EntityKind,
        id: i64,
        dependents: Dependents,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } | Self::UnknownName { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::HasDependents { .. } => ErrorKind::HasDependents,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::UnknownName { kind, name } => write!(f, "{kind} not found: `{name}`"),
            Self::Conflict { kind, detail } => write!(f, "{kind} already exists: {detail}"),
            Self::HasDependents {
                kind,
                id,
                dependents,
            } => write!(
                f,
                "{kind} {id} cannot be deleted: {} assignment(s) and {} transaction(s) reference it",
                dependents.assignments, dependents.transactions
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidInput(err),
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::Conflict { kind, detail } => Self::Conflict { kind, detail },
            RepoError::HasDependents {
                kind,
                id,
                dependents,
            } => Self::HasDependents {
                kind,
                id,
                dependents,
            },
            other => Self::Repo(other),
        }
    }
}

/// Unwraps a required request field.
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

/// Rejects dates whose ISO text would not be four-digit `YYYY-MM-DD`.
pub(crate) fn checked_date(date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if (0..=9999).contains(&date.year()) {
        Ok(date)
    } else {
        Err(ValidationError::DateOutOfRange(date))
    }
}

/// Trims a unique name; blank names are rejected.
pub(crate) fn normalize_name(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims free-form notes; blank notes are stored as absent.
pub(crate) fn normalize_notes(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Emits one metadata-only outcome line for a mutating use-case.
pub(crate) fn log_outcome<T>(
    event: &'static str,
    module: &'static str,
    result: ServiceResult<T>,
    describe: impl FnOnce(&T) -> String,
) -> ServiceResult<T> {
    match &result {
        Ok(value) => info!(
            "event={event} module={module} status=ok {}",
            describe(value)
        ),
        Err(err) => warn!(
            "event={event} module={module} status=error error_kind={}",
            err.kind()
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{checked_date, normalize_name, normalize_notes, ErrorKind, ServiceError};
    use chrono::NaiveDate;
    use crate::model::validation::ValidationError;
    use crate::model::EntityKind;
    use crate::repo::RepoError;

    #[test]
    fn repo_errors_map_to_caller_kinds() {
        let not_found = ServiceError::from(RepoError::NotFound {
            kind: EntityKind::Room,
            id: 3,
        });
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let conflict = ServiceError::from(RepoError::Conflict {
            kind: EntityKind::RoomAssignment,
            detail: "dup".to_string(),
        });
        assert_eq!(conflict.kind(), ErrorKind::Conflict);

        let invalid = ServiceError::from(RepoError::Validation(ValidationError::NegativeAmount));
        assert_eq!(invalid.kind(), ErrorKind::InvalidInput);

        let corrupt = ServiceError::from(RepoError::InvalidData("bad".to_string()));
        assert_eq!(corrupt.kind(), ErrorKind::Storage);
        assert!(matches!(corrupt, ServiceError::Repo(RepoError::InvalidData(_))));
    }

    #[test]
    fn dates_are_limited_to_four_digit_years() {
        let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        let first = NaiveDate::from_ymd_opt(0, 1, 1).unwrap();
        assert_eq!(checked_date(last), Ok(last));
        assert_eq!(checked_date(first), Ok(first));

        let too_late = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let too_early = NaiveDate::from_ymd_opt(-1, 12, 31).unwrap();
        assert_eq!(
            checked_date(too_late),
            Err(ValidationError::DateOutOfRange(too_late))
        );
        assert!(checked_date(too_early).is_err());
    }

    #[test]
    fn names_are_trimmed_and_blank_notes_dropped() {
        assert_eq!(normalize_name("  A-101 ", "name").unwrap(), "A-101");
        assert_eq!(
            normalize_name("   ", "name"),
            Err(ValidationError::BlankField("name"))
        );
        assert_eq!(normalize_notes(Some("  ".to_string())), None);
        assert_eq!(
            normalize_notes(Some(" quiet ".to_string())),
            Some("quiet".to_string())
        );
    }
}
