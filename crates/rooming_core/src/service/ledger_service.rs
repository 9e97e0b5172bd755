//! Transaction Ledger use-cases.
//!
//! # Responsibility
//! - Record, edit and remove tenant rent payments.
//! - Record manager-to-manager transfers.
//!
//! # Invariants
//! - Amounts are exact, non-negative and carry at most two fractional digits.
//! - `payment_date` defaults to the injected clock's `now()`.
//! - Transfers are bookkeeping only: no balances, no overdraft checks, and a
//!   manager may transfer to itself.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::model::manager::ManagerId;
use crate::model::room::RoomId;
use crate::model::tenant::TenantId;
use crate::model::transaction::{
    normalize_amount, normalize_currency, BillingPeriod, ManagerTransferDetail,
    ManagerTransferId, NewManagerTransfer, NewTenantTransaction, TenantTransactionDetail,
    TenantTransactionFilter, TenantTransactionId, TenantTransactionPatch, DEFAULT_CURRENCY,
};
use crate::model::EntityKind;
use crate::repo::ledger_repo::LedgerRepository;
use crate::service::{
    checked_date, log_outcome, normalize_notes, required, ServiceError, ServiceResult,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Raw rent payment input. `payment_date` and `notes` are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPaymentRequest {
    pub tenant_id: Option<TenantId>,
    pub room_id: Option<RoomId>,
    pub amount: Option<Decimal>,
    pub start_month: Option<NaiveDate>,
    pub end_month: Option<NaiveDate>,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Raw transfer input. The sender is the acting manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTransferRequest {
    pub receiver_id: Option<ManagerId>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Ledger service facade over repository implementations.
pub struct LedgerService<R: LedgerRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    default_currency: String,
}

impl<R: LedgerRepository> LedgerService<R, SystemClock> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }

    /// System clock plus the configured default transfer currency.
    pub fn from_config(repo: R, config: &CoreConfig) -> ServiceResult<Self> {
        Self::new(repo).with_default_currency(&config.default_currency)
    }
}

impl<R: LedgerRepository, C: Clock> LedgerService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Replaces the currency used when a transfer names none.
    pub fn with_default_currency(mut self, currency: &str) -> ServiceResult<Self> {
        self.default_currency = normalize_currency(currency)?;
        Ok(self)
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// Payments matching `filter`, newest `payment_date` first.
    pub fn list_tenant_transactions(
        &self,
        filter: TenantTransactionFilter,
    ) -> ServiceResult<Vec<TenantTransactionDetail>> {
        Ok(self.repo.list_tenant_transactions(&filter)?)
    }

    pub fn get_tenant_transaction(
        &self,
        id: TenantTransactionId,
    ) -> ServiceResult<TenantTransactionDetail> {
        self.repo
            .get_tenant_transaction(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::TenantTransaction,
                id,
            })
    }

    /// Records a rent payment taken by `manager_id`.
    ///
    /// Several payments for the same tenant and period are allowed.
    pub fn record_tenant_transaction(
        &self,
        manager_id: ManagerId,
        request: RecordPaymentRequest,
    ) -> ServiceResult<TenantTransactionDetail> {
        let result = (|| -> ServiceResult<TenantTransactionDetail> {
            let tenant_id = required(request.tenant_id, "tenant_id")?;
            let room_id = required(request.room_id, "room_id")?;
            let amount = normalize_amount(required(request.amount, "amount")?)?;
            let period = BillingPeriod::new(
                checked_date(required(request.start_month, "start_month")?)?,
                checked_date(required(request.end_month, "end_month")?)?,
            )?;
            let transaction = NewTenantTransaction {
                tenant_id,
                room_id,
                manager_id,
                amount,
                period,
                payment_date: request.payment_date.unwrap_or_else(|| self.clock.now()),
                notes: normalize_notes(request.notes),
            };
            Ok(self.repo.create_tenant_transaction(&transaction)?)
        })();
        log_outcome("payment_record", "ledger", result, |detail| {
            format!(
                "transaction_id={} tenant_id={} room_id={} manager_id={}",
                detail.transaction.id,
                detail.transaction.tenant_id,
                detail.transaction.room_id,
                detail.transaction.manager_id
            )
        })
    }

    /// Applies the supplied fields only. An empty patch returns the stored row.
    pub fn update_tenant_transaction(
        &self,
        id: TenantTransactionId,
        patch: TenantTransactionPatch,
    ) -> ServiceResult<TenantTransactionDetail> {
        if patch.is_empty() {
            return self.get_tenant_transaction(id);
        }
        let result = (|| -> ServiceResult<TenantTransactionDetail> {
            let normalized = TenantTransactionPatch {
                amount: patch.amount.map(normalize_amount).transpose()?,
                start_month: patch.start_month.map(checked_date).transpose()?,
                end_month: patch.end_month.map(checked_date).transpose()?,
                notes: patch.notes.map(normalize_notes),
            };
            Ok(self.repo.update_tenant_transaction(id, &normalized)?)
        })();
        log_outcome("payment_update", "ledger", result, |detail| {
            format!("transaction_id={}", detail.transaction.id)
        })
    }

    pub fn delete_tenant_transaction(&self, id: TenantTransactionId) -> ServiceResult<()> {
        let result = self
            .repo
            .delete_tenant_transaction(id)
            .map_err(ServiceError::from);
        log_outcome("payment_delete", "ledger", result, |_| {
            format!("transaction_id={id}")
        })
    }

    pub fn list_manager_transfers(&self) -> ServiceResult<Vec<ManagerTransferDetail>> {
        Ok(self.repo.list_manager_transfers()?)
    }

    pub fn get_manager_transfer(
        &self,
        id: ManagerTransferId,
    ) -> ServiceResult<ManagerTransferDetail> {
        self.repo
            .get_manager_transfer(id)?
            .ok_or(ServiceError::NotFound {
                kind: EntityKind::ManagerTransaction,
                id,
            })
    }

    /// Records a transfer from `sender_id`; `sender_id == receiver_id` is allowed.
    pub fn record_manager_transfer(
        &self,
        sender_id: ManagerId,
        request: RecordTransferRequest,
    ) -> ServiceResult<ManagerTransferDetail> {
        let result = (|| -> ServiceResult<ManagerTransferDetail> {
            let currency = match request.currency.as_deref() {
                Some(code) => normalize_currency(code)?,
                None => self.default_currency.clone(),
            };
            let transfer = NewManagerTransfer {
                sender_id,
                receiver_id: required(request.receiver_id, "receiver_id")?,
                amount: normalize_amount(required(request.amount, "amount")?)?,
                currency,
                payment_date: request.payment_date.unwrap_or_else(|| self.clock.now()),
                notes: normalize_notes(request.notes),
            };
            Ok(self.repo.create_manager_transfer(&transfer)?)
        })();
        log_outcome("transfer_record", "ledger", result, |detail| {
            format!(
                "transfer_id={} sender_id={} receiver_id={} internal={}",
                detail.transfer.id,
                detail.transfer.sender_id,
                detail.transfer.receiver_id,
                detail.transfer.is_internal()
            )
        })
    }
}
