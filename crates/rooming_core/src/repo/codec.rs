//! Scalar conversions between domain values and SQLite columns.
//!
//! Dates are ISO `YYYY-MM-DD` text so they sort lexicographically; instants
//! are UTC epoch milliseconds; money is exact decimal text.

use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn date_to_db(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    column: &str,
) -> RepoResult<Option<NaiveDate>> {
    value.map(|text| parse_date(&text, column)).transpose()
}

pub(crate) fn instant_to_db(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn parse_instant(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid epoch millis `{value}` in {column}"))
    })
}

pub(crate) fn amount_to_db(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn parse_amount(value: &str, column: &str) -> RepoResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid amount `{value}` in {column}")))
}

pub(crate) fn parse_count(value: i64, what: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` for {what}")))
}

#[cfg(test)]
mod tests {
    use super::{date_to_db, parse_amount, parse_date, parse_instant};
    use chrono::NaiveDate;

    #[test]
    fn dates_use_sortable_iso_text() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert_eq!(date_to_db(date), "2025-05-01");
        assert_eq!(parse_date("2025-05-01", "t.c").unwrap(), date);
        assert!(parse_date("05/01/2025", "t.c").is_err());
    }

    #[test]
    fn corrupt_values_are_reported_not_masked() {
        assert!(parse_amount("twelve", "t.amount").is_err());
        assert!(parse_instant(i64::MAX, "t.at").is_err());
    }
}
