//! Summary Aggregator.
//!
//! Read-only: composes counts and this month's income from one storage
//! snapshot. Income is summed with exact decimal arithmetic.

use crate::clock::{Clock, SystemClock};
use crate::model::summary::{MonthWindow, Summary};
use crate::model::transaction::format_amount;
use crate::model::validation::ValidationError;
use crate::repo::summary_repo::SummaryRepository;
use crate::repo::RepoError;
use crate::service::ServiceResult;
use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;

pub struct SummaryService<R: SummaryRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: SummaryRepository> SummaryService<R, SystemClock> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: SummaryRepository, C: Clock> SummaryService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Figures as of `reference`; income covers its UTC calendar month.
    pub fn compute_summary(&self, reference: DateTime<Utc>) -> ServiceResult<Summary> {
        let window =
            MonthWindow::containing(reference).ok_or(ValidationError::InstantOutOfRange)?;
        let inputs = self.repo.summary_inputs(&window)?;
        let income = total_income(&inputs.amounts)?;

        debug!(
            "event=summary_compute module=summary status=ok rooms={} active_assignments={} tenants={} payments={}",
            inputs.total_rooms,
            inputs.active_assignments,
            inputs.total_tenants,
            inputs.amounts.len()
        );

        Ok(Summary {
            total_rooms: inputs.total_rooms,
            occupied_rooms: inputs.active_assignments,
            total_tenants: inputs.total_tenants,
            total_income_this_month: format_amount(income),
        })
    }

    /// Same as [`Self::compute_summary`] with the injected clock's `now()`.
    pub fn compute_summary_now(&self) -> ServiceResult<Summary> {
        self.compute_summary(self.clock.now())
    }
}

/// Exact sum of stored amounts. Overflow means the stored ledger is corrupt.
fn total_income(amounts: &[Decimal]) -> Result<Decimal, RepoError> {
    amounts.iter().try_fold(Decimal::ZERO, |total, amount| {
        total.checked_add(*amount).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "income total overflows after {total} + {amount}"
            ))
        })
    })
}
