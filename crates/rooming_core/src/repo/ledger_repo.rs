//! Ledger repository: tenant rent payments and manager transfers.
//!
//! # Invariants
//! - Amounts are written as exact decimal text, never as floating point.
//! - A payment's billing period is re-validated against the merged row before
//!   an update commits.
//! - Payments are listed newest `payment_date` first.

use crate::model::manager::ManagerId;
use crate::model::transaction::{
    BillingPeriod, ManagerTransferDetail, ManagerTransferId, NewManagerTransfer,
    NewTenantTransaction, TenantTransactionDetail, TenantTransactionFilter,
    TenantTransactionId, TenantTransactionPatch,
};
use crate::model::EntityKind;
use crate::repo::codec::{amount_to_db, date_to_db, instant_to_db};
use crate::repo::lookup::EntityLookup;
use crate::repo::rows::{
    parse_manager_transfer_detail, parse_tenant_transaction_detail,
    MANAGER_TRANSFER_DETAIL_SELECT_SQL, TENANT_TRANSACTION_DETAIL_SELECT_SQL,
};
use crate::repo::{with_write_tx, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for money movements.
pub trait LedgerRepository {
    fn list_tenant_transactions(
        &self,
        filter: &TenantTransactionFilter,
    ) -> RepoResult<Vec<TenantTransactionDetail>>;
    fn get_tenant_transaction(
        &self,
        id: TenantTransactionId,
    ) -> RepoResult<Option<TenantTransactionDetail>>;
    fn create_tenant_transaction(
        &self,
        transaction: &NewTenantTransaction,
    ) -> RepoResult<TenantTransactionDetail>;
    fn update_tenant_transaction(
        &self,
        id: TenantTransactionId,
        patch: &TenantTransactionPatch,
    ) -> RepoResult<TenantTransactionDetail>;
    fn delete_tenant_transaction(&self, id: TenantTransactionId) -> RepoResult<()>;

    fn list_manager_transfers(&self) -> RepoResult<Vec<ManagerTransferDetail>>;
    fn get_manager_transfer(
        &self,
        id: ManagerTransferId,
    ) -> RepoResult<Option<ManagerTransferDetail>>;
    fn create_manager_transfer(
        &self,
        transfer: &NewManagerTransfer,
    ) -> RepoResult<ManagerTransferDetail>;
}

/// SQLite-backed ledger repository.
pub struct SqliteLedgerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLedgerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LedgerRepository for SqliteLedgerRepository<'_> {
    fn list_tenant_transactions(
        &self,
        filter: &TenantTransactionFilter,
    ) -> RepoResult<Vec<TenantTransactionDetail>> {
        tenant_transactions_in(self.conn, filter)
    }

    fn get_tenant_transaction(
        &self,
        id: TenantTransactionId,
    ) -> RepoResult<Option<TenantTransactionDetail>> {
        find_tenant_transaction(self.conn, id)
    }

    fn create_tenant_transaction(
        &self,
        transaction: &NewTenantTransaction,
    ) -> RepoResult<TenantTransactionDetail> {
        with_write_tx(self.conn, |tx| {
            tx.require_entity(EntityKind::Tenant, transaction.tenant_id)?;
            tx.require_entity(EntityKind::Room, transaction.room_id)?;
            tx.require_entity(EntityKind::Manager, transaction.manager_id)?;
            tx.execute(
                "INSERT INTO tenant_transactions (
                    tenant_id,
                    room_id,
                    manager_id,
                    amount,
                    start_month,
                    end_month,
                    payment_date,
                    notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    transaction.tenant_id,
                    transaction.room_id,
                    transaction.manager_id,
                    amount_to_db(transaction.amount),
                    date_to_db(transaction.period.start_month()),
                    date_to_db(transaction.period.end_month()),
                    instant_to_db(transaction.payment_date),
                    transaction.notes.as_deref(),
                ],
            )?;
            load_tenant_transaction(tx, tx.last_insert_rowid())
        })
    }

    fn update_tenant_transaction(
        &self,
        id: TenantTransactionId,
        patch: &TenantTransactionPatch,
    ) -> RepoResult<TenantTransactionDetail> {
        with_write_tx(self.conn, |tx| {
            let current = load_tenant_transaction(tx, id)?.transaction;
            let period = BillingPeriod::new(
                patch.start_month.unwrap_or(current.start_month),
                patch.end_month.unwrap_or(current.end_month),
            )?;
            let amount = patch.amount.unwrap_or(current.amount);
            let notes = match patch.notes.as_ref() {
                Some(notes) => notes.as_deref(),
                None => current.notes.as_deref(),
            };

            tx.execute(
                "UPDATE tenant_transactions
                 SET amount = ?2,
                     start_month = ?3,
                     end_month = ?4,
                     notes = ?5
                 WHERE id = ?1;",
                params![
                    id,
                    amount_to_db(amount),
                    date_to_db(period.start_month()),
                    date_to_db(period.end_month()),
                    notes,
                ],
            )?;
            load_tenant_transaction(tx, id)
        })
    }

    fn delete_tenant_transaction(&self, id: TenantTransactionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tenant_transactions WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::TenantTransaction,
                id,
            });
        }
        Ok(())
    }

    fn list_manager_transfers(&self) -> RepoResult<Vec<ManagerTransferDetail>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MANAGER_TRANSFER_DETAIL_SELECT_SQL}
             ORDER BY x.payment_date DESC, x.id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_manager_transfer_detail(row)?);
        }
        Ok(items)
    }

    fn get_manager_transfer(
        &self,
        id: ManagerTransferId,
    ) -> RepoResult<Option<ManagerTransferDetail>> {
        find_manager_transfer(self.conn, id)
    }

    fn create_manager_transfer(
        &self,
        transfer: &NewManagerTransfer,
    ) -> RepoResult<ManagerTransferDetail> {
        with_write_tx(self.conn, |tx| {
            require_manager(tx, transfer.sender_id)?;
            require_manager(tx, transfer.receiver_id)?;
            tx.execute(
                "INSERT INTO manager_transactions (
                    sender_id,
                    receiver_id,
                    amount,
                    currency,
                    payment_date,
                    notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    transfer.sender_id,
                    transfer.receiver_id,
                    amount_to_db(transfer.amount),
                    transfer.currency.as_str(),
                    instant_to_db(transfer.payment_date),
                    transfer.notes.as_deref(),
                ],
            )?;
            let id = tx.last_insert_rowid();
            find_manager_transfer(tx, id)?.ok_or(RepoError::NotFound {
                kind: EntityKind::ManagerTransaction,
                id,
            })
        })
    }
}

/// Payments matching every set field of `filter`, newest first.
pub(crate) fn tenant_transactions_in(
    conn: &Connection,
    filter: &TenantTransactionFilter,
) -> RepoResult<Vec<TenantTransactionDetail>> {
    let mut stmt = conn.prepare(&format!(
        "{TENANT_TRANSACTION_DETAIL_SELECT_SQL}
         WHERE (?1 IS NULL OR x.tenant_id = ?1)
           AND (?2 IS NULL OR x.room_id = ?2)
           AND (?3 IS NULL OR x.manager_id = ?3)
         ORDER BY x.payment_date DESC, x.id DESC;"
    ))?;
    let mut rows = stmt.query(params![filter.tenant_id, filter.room_id, filter.manager_id])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_tenant_transaction_detail(row)?);
    }
    Ok(items)
}

fn require_manager(conn: &Connection, id: ManagerId) -> RepoResult<()> {
    conn.require_entity(EntityKind::Manager, id)
}

fn find_tenant_transaction(
    conn: &Connection,
    id: TenantTransactionId,
) -> RepoResult<Option<TenantTransactionDetail>> {
    let mut stmt = conn.prepare(&format!(
        "{TENANT_TRANSACTION_DETAIL_SELECT_SQL} WHERE x.id = ?1;"
    ))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_tenant_transaction_detail(row)?)),
        None => Ok(None),
    }
}

fn load_tenant_transaction(
    conn: &Connection,
    id: TenantTransactionId,
) -> RepoResult<TenantTransactionDetail> {
    find_tenant_transaction(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::TenantTransaction,
        id,
    })
}

fn find_manager_transfer(
    conn: &Connection,
    id: ManagerTransferId,
) -> RepoResult<Option<ManagerTransferDetail>> {
    let mut stmt = conn.prepare(&format!(
        "{MANAGER_TRANSFER_DETAIL_SELECT_SQL} WHERE x.id = ?1;"
    ))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_manager_transfer_detail(row)?)),
        None => Ok(None),
    }
}
