//! Read model for the dashboard summary.
//!
//! All figures come from one read transaction so counts and income agree with
//! each other. Money is returned as raw decimals; summing happens in the
//! service with exact arithmetic.

use crate::model::summary::MonthWindow;
use crate::repo::codec::{instant_to_db, parse_amount, parse_count};
use crate::repo::{with_read_snapshot, RepoResult};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

/// Raw aggregates for one summary computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryInputs {
    pub total_rooms: u64,
    /// Active assignments, not distinct occupied rooms.
    pub active_assignments: u64,
    pub total_tenants: u64,
    /// Amounts of payments whose `payment_date` falls inside the window.
    pub amounts: Vec<Decimal>,
}

pub trait SummaryRepository {
    fn summary_inputs(&self, window: &MonthWindow) -> RepoResult<SummaryInputs>;
}

/// SQLite-backed summary reader.
pub struct SqliteSummaryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSummaryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SummaryRepository for SqliteSummaryRepository<'_> {
    fn summary_inputs(&self, window: &MonthWindow) -> RepoResult<SummaryInputs> {
        with_read_snapshot(self.conn, |conn| {
            let (rooms, active, tenants): (i64, i64, i64) = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM rooms),
                    (SELECT COUNT(*) FROM room_assignments WHERE end_date IS NULL),
                    (SELECT COUNT(*) FROM tenants);",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

            let mut stmt = conn.prepare(
                "SELECT amount
                 FROM tenant_transactions
                 WHERE payment_date >= ?1
                   AND payment_date < ?2;",
            )?;
            let mut rows = stmt.query(params![
                instant_to_db(window.start),
                instant_to_db(window.end_exclusive),
            ])?;
            let mut amounts = Vec::new();
            while let Some(row) = rows.next()? {
                let text: String = row.get(0)?;
                amounts.push(parse_amount(&text, "tenant_transactions.amount")?);
            }

            Ok(SummaryInputs {
                total_rooms: parse_count(rooms, "rooms")?,
                active_assignments: parse_count(active, "active assignments")?,
                total_tenants: parse_count(tenants, "tenants")?,
                amounts,
            })
        })
    }
}
