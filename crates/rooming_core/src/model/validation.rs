//! Input validation errors shared across model, repository and service layers.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for malformed or incomplete input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required input was not supplied.
    MissingField(&'static str),
    /// Text input is blank after trim.
    BlankField(&'static str),
    /// A partial update supplied no field at all.
    NothingToUpdate,
    /// Money amounts are non-negative.
    NegativeAmount,
    /// Money amounts carry at most two fractional digits.
    AmountPrecision { scale: u32 },
    /// Amount is too large to carry two fractional digits.
    AmountOutOfRange,
    /// Billing period starts after it ends.
    PeriodInverted { start: NaiveDate, end: NaiveDate },
    /// Occupancy interval ends before it starts.
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    /// Currency is not a three-letter upper-case code.
    InvalidCurrency(String),
    /// Reference instant cannot be mapped to a calendar month.
    InstantOutOfRange,
    /// Calendar dates are limited to four-digit years.
    DateOutOfRange(NaiveDate),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::NothingToUpdate => write!(f, "nothing to update"),
            Self::NegativeAmount => write!(f, "amount must not be negative"),
            Self::AmountPrecision { scale } => write!(
                f,
                "amount has {scale} fractional digits; at most 2 are allowed"
            ),
            Self::AmountOutOfRange => write!(f, "amount is too large"),
            Self::PeriodInverted { start, end } => {
                write!(f, "billing period start {start} is after end {end}")
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is before start date {start}")
            }
            Self::InvalidCurrency(value) => {
                write!(f, "invalid currency code `{value}`; expected e.g. EUR")
            }
            Self::InstantOutOfRange => write!(f, "reference instant is out of supported range"),
            Self::DateOutOfRange(date) => {
                write!(f, "date {date} is outside years 0000 through 9999")
            }
        }
    }
}

impl Error for ValidationError {}
