//! Shared SELECT fragments and row decoders.
//!
//! Joined queries alias every column with a per-table prefix (`r_`, `t_`,
//! `a_`, `x_`, `m_`, `s_`, `v_`) so one decoder serves every query that
//! embeds that table.

use crate::model::assignment::{AssignmentDetail, RoomAssignment};
use crate::model::manager::ManagerProfile;
use crate::model::room::Room;
use crate::model::tenant::Tenant;
use crate::model::transaction::{
    ManagerTransfer, ManagerTransferDetail, TenantTransaction, TenantTransactionDetail,
};
use crate::repo::codec::{parse_amount, parse_date, parse_instant, parse_optional_date};
use crate::model::validation::ValidationError;
use crate::repo::{RepoError, RepoResult};
use rusqlite::Row;

pub(crate) const ROOM_SELECT_SQL: &str = "SELECT
    r.id AS r_id,
    r.name AS r_name,
    r.notes AS r_notes,
    r.created_at AS r_created_at
FROM rooms r";

pub(crate) const TENANT_SELECT_SQL: &str = "SELECT
    t.id AS t_id,
    t.name AS t_name,
    t.notes AS t_notes,
    t.created_at AS t_created_at
FROM tenants t";

pub(crate) const MANAGER_SELECT_SQL: &str = "SELECT
    m.id AS m_id,
    m.username AS m_username,
    m.created_at AS m_created_at
FROM managers m";

pub(crate) const ASSIGNMENT_DETAIL_SELECT_SQL: &str = "SELECT
    a.id AS a_id,
    a.tenant_id AS a_tenant_id,
    a.room_id AS a_room_id,
    a.start_date AS a_start_date,
    a.end_date AS a_end_date,
    a.created_at AS a_created_at,
    t.id AS t_id,
    t.name AS t_name,
    t.notes AS t_notes,
    t.created_at AS t_created_at,
    r.id AS r_id,
    r.name AS r_name,
    r.notes AS r_notes,
    r.created_at AS r_created_at
FROM room_assignments a
INNER JOIN tenants t ON t.id = a.tenant_id
INNER JOIN rooms r ON r.id = a.room_id";

pub(crate) const TENANT_TRANSACTION_DETAIL_SELECT_SQL: &str = "SELECT
    x.id AS x_id,
    x.tenant_id AS x_tenant_id,
    x.room_id AS x_room_id,
    x.manager_id AS x_manager_id,
    x.amount AS x_amount,
    x.start_month AS x_start_month,
    x.end_month AS x_end_month,
    x.payment_date AS x_payment_date,
    x.notes AS x_notes,
    t.id AS t_id,
    t.name AS t_name,
    t.notes AS t_notes,
    t.created_at AS t_created_at,
    r.id AS r_id,
    r.name AS r_name,
    r.notes AS r_notes,
    r.created_at AS r_created_at,
    m.id AS m_id,
    m.username AS m_username,
    m.created_at AS m_created_at
FROM tenant_transactions x
INNER JOIN tenants t ON t.id = x.tenant_id
INNER JOIN rooms r ON r.id = x.room_id
INNER JOIN managers m ON m.id = x.manager_id";

pub(crate) const MANAGER_TRANSFER_DETAIL_SELECT_SQL: &str = "SELECT
    x.id AS x_id,
    x.sender_id AS x_sender_id,
    x.receiver_id AS x_receiver_id,
    x.amount AS x_amount,
    x.currency AS x_currency,
    x.payment_date AS x_payment_date,
    x.notes AS x_notes,
    s.id AS s_id,
    s.username AS s_username,
    s.created_at AS s_created_at,
    v.id AS v_id,
    v.username AS v_username,
    v.created_at AS v_created_at
FROM manager_transactions x
INNER JOIN managers s ON s.id = x.sender_id
INNER JOIN managers v ON v.id = x.receiver_id";

fn col(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}")
}

pub(crate) fn parse_room(row: &Row<'_>, prefix: &str) -> RepoResult<Room> {
    Ok(Room {
        id: row.get(col(prefix, "id").as_str())?,
        name: row.get(col(prefix, "name").as_str())?,
        notes: row.get(col(prefix, "notes").as_str())?,
        created_at: parse_instant(
            row.get(col(prefix, "created_at").as_str())?,
            "rooms.created_at",
        )?,
    })
}

pub(crate) fn parse_tenant(row: &Row<'_>, prefix: &str) -> RepoResult<Tenant> {
    Ok(Tenant {
        id: row.get(col(prefix, "id").as_str())?,
        name: row.get(col(prefix, "name").as_str())?,
        notes: row.get(col(prefix, "notes").as_str())?,
        created_at: parse_instant(
            row.get(col(prefix, "created_at").as_str())?,
            "tenants.created_at",
        )?,
    })
}

pub(crate) fn parse_manager_profile(row: &Row<'_>, prefix: &str) -> RepoResult<ManagerProfile> {
    Ok(ManagerProfile {
        id: row.get(col(prefix, "id").as_str())?,
        username: row.get(col(prefix, "username").as_str())?,
        created_at: parse_instant(
            row.get(col(prefix, "created_at").as_str())?,
            "managers.created_at",
        )?,
    })
}

/// Stored rows that break a model invariant are corrupt data, not bad input.
fn corrupt_row(table: &str, id: i64, err: ValidationError) -> RepoError {
    RepoError::InvalidData(format!("{table} row {id}: {err}"))
}

pub(crate) fn parse_assignment(row: &Row<'_>) -> RepoResult<RoomAssignment> {
    let start_text: String = row.get("a_start_date")?;
    let assignment = RoomAssignment {
        id: row.get("a_id")?,
        tenant_id: row.get("a_tenant_id")?,
        room_id: row.get("a_room_id")?,
        start_date: parse_date(&start_text, "room_assignments.start_date")?,
        end_date: parse_optional_date(row.get("a_end_date")?, "room_assignments.end_date")?,
        created_at: parse_instant(row.get("a_created_at")?, "room_assignments.created_at")?,
    };
    assignment
        .validate_end(assignment.end_date)
        .map_err(|err| corrupt_row("room_assignments", assignment.id, err))?;
    Ok(assignment)
}

pub(crate) fn parse_assignment_detail(row: &Row<'_>) -> RepoResult<AssignmentDetail> {
    Ok(AssignmentDetail {
        assignment: parse_assignment(row)?,
        tenant: parse_tenant(row, "t_")?,
        room: parse_room(row, "r_")?,
    })
}

pub(crate) fn parse_tenant_transaction(row: &Row<'_>) -> RepoResult<TenantTransaction> {
    let amount_text: String = row.get("x_amount")?;
    let start_text: String = row.get("x_start_month")?;
    let end_text: String = row.get("x_end_month")?;
    let transaction = TenantTransaction {
        id: row.get("x_id")?,
        tenant_id: row.get("x_tenant_id")?,
        room_id: row.get("x_room_id")?,
        manager_id: row.get("x_manager_id")?,
        amount: parse_amount(&amount_text, "tenant_transactions.amount")?,
        start_month: parse_date(&start_text, "tenant_transactions.start_month")?,
        end_month: parse_date(&end_text, "tenant_transactions.end_month")?,
        payment_date: parse_instant(
            row.get("x_payment_date")?,
            "tenant_transactions.payment_date",
        )?,
        notes: row.get("x_notes")?,
    };
    transaction
        .period()
        .map_err(|err| corrupt_row("tenant_transactions", transaction.id, err))?;
    Ok(transaction)
}

pub(crate) fn parse_tenant_transaction_detail(
    row: &Row<'_>,
) -> RepoResult<TenantTransactionDetail> {
    Ok(TenantTransactionDetail {
        transaction: parse_tenant_transaction(row)?,
        tenant: parse_tenant(row, "t_")?,
        room: parse_room(row, "r_")?,
        manager: parse_manager_profile(row, "m_")?,
    })
}

pub(crate) fn parse_manager_transfer_detail(row: &Row<'_>) -> RepoResult<ManagerTransferDetail> {
    let amount_text: String = row.get("x_amount")?;
    let transfer = ManagerTransfer {
        id: row.get("x_id")?,
        sender_id: row.get("x_sender_id")?,
        receiver_id: row.get("x_receiver_id")?,
        amount: parse_amount(&amount_text, "manager_transactions.amount")?,
        currency: row.get("x_currency")?,
        payment_date: parse_instant(
            row.get("x_payment_date")?,
            "manager_transactions.payment_date",
        )?,
        notes: row.get("x_notes")?,
    };
    Ok(ManagerTransferDetail {
        transfer,
        sender: parse_manager_profile(row, "s_")?,
        receiver: parse_manager_profile(row, "v_")?,
    })
}
