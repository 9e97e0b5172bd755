//! Ledger records: tenant rent payments and manager-to-manager transfers.
//!
//! # Invariants
//! - Amounts are exact decimals, non-negative, stored with two fractional digits.
//! - A billing period never starts after it ends.
//! - Transfers do not track balances; `sender_id == receiver_id` is allowed.

use crate::model::manager::{ManagerId, ManagerProfile};
use crate::model::room::{Room, RoomId};
use crate::model::tenant::{Tenant, TenantId};
use crate::model::validation::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

pub type TenantTransactionId = i64;
pub type ManagerTransferId = i64;

/// Currency used when a transfer does not name one.
pub const DEFAULT_CURRENCY: &str = "EUR";

const CURRENCY_SCALE: u32 = 2;

static CURRENCY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency regex"));

/// Validates a money amount and rescales it to two fractional digits.
pub fn normalize_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount);
    }
    let normalized = amount.normalize();
    if normalized.scale() > CURRENCY_SCALE {
        return Err(ValidationError::AmountPrecision {
            scale: normalized.scale(),
        });
    }
    let mut rescaled = normalized;
    rescaled.rescale(CURRENCY_SCALE);
    // `rescale` keeps a smaller scale when the mantissa has no room left.
    if rescaled.scale() != CURRENCY_SCALE {
        return Err(ValidationError::AmountOutOfRange);
    }
    Ok(rescaled)
}

/// Formats an amount with exactly two fractional digits, e.g. `"550.00"`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(CURRENCY_SCALE);
    rounded.rescale(CURRENCY_SCALE);
    rounded.to_string()
}

/// Trims and upper-cases a currency code, then checks its shape.
pub fn normalize_currency(value: &str) -> Result<String, ValidationError> {
    let normalized = value.trim().to_ascii_uppercase();
    if CURRENCY_CODE_RE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(ValidationError::InvalidCurrency(value.to_string()))
    }
}

/// Billing months covered by one payment, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    start_month: NaiveDate,
    end_month: NaiveDate,
}

impl BillingPeriod {
    pub fn new(start_month: NaiveDate, end_month: NaiveDate) -> Result<Self, ValidationError> {
        if start_month > end_month {
            return Err(ValidationError::PeriodInverted {
                start: start_month,
                end: end_month,
            });
        }
        Ok(Self {
            start_month,
            end_month,
        })
    }

    pub fn start_month(&self) -> NaiveDate {
        self.start_month
    }

    pub fn end_month(&self) -> NaiveDate {
        self.end_month
    }
}

/// Rent payment recorded by a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantTransaction {
    pub id: TenantTransactionId,
    pub tenant_id: TenantId,
    pub room_id: RoomId,
    pub manager_id: ManagerId,
    pub amount: Decimal,
    pub start_month: NaiveDate,
    pub end_month: NaiveDate,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl TenantTransaction {
    pub fn period(&self) -> Result<BillingPeriod, ValidationError> {
        BillingPeriod::new(self.start_month, self.end_month)
    }
}

/// Payment joined with tenant, room and recording manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantTransactionDetail {
    #[serde(flatten)]
    pub transaction: TenantTransaction,
    pub tenant: Tenant,
    pub room: Room,
    pub manager: ManagerProfile,
}

/// Validated payment input; `payment_date` is already defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenantTransaction {
    pub tenant_id: TenantId,
    pub room_id: RoomId,
    pub manager_id: ManagerId,
    pub amount: Decimal,
    pub period: BillingPeriod,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Partial payment update. `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantTransactionPatch {
    pub amount: Option<Decimal>,
    pub start_month: Option<NaiveDate>,
    pub end_month: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

impl TenantTransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.start_month.is_none()
            && self.end_month.is_none()
            && self.notes.is_none()
    }
}

/// Optional filters for listing payments. Empty filter lists everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TenantTransactionFilter {
    pub tenant_id: Option<TenantId>,
    pub room_id: Option<RoomId>,
    pub manager_id: Option<ManagerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerTransfer {
    pub id: ManagerTransferId,
    pub sender_id: ManagerId,
    pub receiver_id: ManagerId,
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl ManagerTransfer {
    /// Sender and receiver are the same manager.
    pub fn is_internal(&self) -> bool {
        self.sender_id == self.receiver_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerTransferDetail {
    #[serde(flatten)]
    pub transfer: ManagerTransfer,
    pub sender: ManagerProfile,
    pub receiver: ManagerProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewManagerTransfer {
    pub sender_id: ManagerId,
    pub receiver_id: ManagerId,
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{format_amount, normalize_amount, normalize_currency, BillingPeriod};
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn decimal(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn normalize_amount_rescales_to_cents() {
        assert_eq!(normalize_amount(decimal("300")).unwrap().to_string(), "300.00");
        assert_eq!(normalize_amount(decimal("12.5")).unwrap().to_string(), "12.50");
        assert_eq!(normalize_amount(decimal("7.100")).unwrap().to_string(), "7.10");
    }

    #[test]
    fn normalize_amount_rejects_negative_and_sub_cent_values() {
        assert_eq!(
            normalize_amount(decimal("-1")),
            Err(ValidationError::NegativeAmount)
        );
        assert_eq!(
            normalize_amount(decimal("0.005")),
            Err(ValidationError::AmountPrecision { scale: 3 })
        );
        assert!(normalize_amount(Decimal::ZERO).is_ok());
    }

    #[test]
    fn normalize_amount_rejects_values_without_room_for_cents() {
        assert_eq!(
            normalize_amount(Decimal::MAX),
            Err(ValidationError::AmountOutOfRange)
        );
        let largest = Decimal::MAX / Decimal::ONE_HUNDRED;
        let accepted = normalize_amount(largest.trunc()).unwrap();
        assert_eq!(accepted.scale(), 2);
    }

    #[test]
    fn format_amount_always_has_two_digits() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(decimal("550")), "550.00");
        assert_eq!(format_amount(decimal("0.1") + decimal("0.2")), "0.30");
    }

    #[test]
    fn currency_codes_are_normalized() {
        assert_eq!(normalize_currency(" eur ").unwrap(), "EUR");
        assert!(matches!(
            normalize_currency("EURO"),
            Err(ValidationError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn billing_period_rejects_inverted_months() {
        let july = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let june = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(BillingPeriod::new(june, july).is_ok());
        assert!(BillingPeriod::new(july, july).is_ok());
        assert!(matches!(
            BillingPeriod::new(july, june),
            Err(ValidationError::PeriodInverted { .. })
        ));
    }
}
