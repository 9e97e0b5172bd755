//! Point-in-time occupancy and income summary.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// Aggregated dashboard figures.
///
/// `occupied_rooms` counts active assignments, not distinct rooms, so two
/// active assignments on one room count twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_rooms: u64,
    pub occupied_rooms: u64,
    pub total_tenants: u64,
    /// Exact sum formatted with two fractional digits.
    pub total_income_this_month: String,
}

/// Calendar month (UTC) containing a reference instant, as a half-open range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end_exclusive: DateTime<Utc>,
}

impl MonthWindow {
    /// Returns `None` only when the following month is not representable.
    pub fn containing(reference: DateTime<Utc>) -> Option<Self> {
        let year = reference.year();
        let month = reference.month();
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };

        let start = NaiveDate::from_ymd_opt(year, month, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        let end_exclusive = NaiveDate::from_ymd_opt(next_year, next_month, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();

        Some(Self {
            start,
            end_exclusive,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end_exclusive
    }
}

#[cfg(test)]
mod tests {
    use super::MonthWindow;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn window_covers_whole_last_day() {
        let reference = Utc.with_ymd_and_hms(2025, 5, 14, 9, 30, 0).unwrap();
        let window = MonthWindow::containing(reference).unwrap();

        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(
            window.end_exclusive,
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 5, 31, 23, 59, 59).unwrap()));
        assert!(!window.contains(window.end_exclusive));
        assert!(!window.contains(window.start - Duration::milliseconds(1)));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let reference = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        let window = MonthWindow::containing(reference).unwrap();
        assert_eq!(
            window.end_exclusive,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
