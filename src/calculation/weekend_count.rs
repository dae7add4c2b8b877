//! Weekend day counting.
//!
//! Counts the Saturdays and Sundays that are billed as paid weekend days
//! within an effective billing span.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Paid weekend days within a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekendCount {
    /// Saturdays counted (zero unless the workweek is five days).
    pub saturdays: u32,
    /// Sundays counted.
    pub sundays: u32,
}

impl WeekendCount {
    /// Saturdays plus Sundays.
    pub fn total(&self) -> u32 {
        self.saturdays + self.sundays
    }
}

/// Returns true if the workweek descriptor names a five-day week.
///
/// Detection is a substring match on "5" or "five", so "5.5 days" also
/// counts as a five-day week.
///
/// ```
/// use billing_engine::calculation::is_five_day_week;
///
/// assert!(is_five_day_week("5 Days"));
/// assert!(is_five_day_week("Five day week"));
/// assert!(!is_five_day_week("6"));
/// ```
pub fn is_five_day_week(workweek: &str) -> bool {
    let text = workweek.to_lowercase();
    text.contains('5') || text.contains("five")
}

/// Counts weekend days from `start` to `end` inclusive.
///
/// Sundays are always counted. Saturdays are counted only for a five-day
/// workweek. An empty span (end before start) counts nothing.
///
/// # Example
///
/// ```
/// use billing_engine::calculation::count_weekends;
/// use chrono::NaiveDate;
///
/// // February 2026 has four Saturdays and four Sundays.
/// let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
///
/// let five_day = count_weekends(start, end, "5 days");
/// assert_eq!((five_day.saturdays, five_day.sundays), (4, 4));
///
/// let six_day = count_weekends(start, end, "6 days");
/// assert_eq!((six_day.saturdays, six_day.sundays), (0, 4));
/// ```
pub fn count_weekends(start: NaiveDate, end: NaiveDate, workweek: &str) -> WeekendCount {
    let count_saturdays = is_five_day_week(workweek);

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .fold(WeekendCount::default(), |mut count, day| {
            match day.weekday() {
                Weekday::Sat if count_saturdays => count.saturdays += 1,
                Weekday::Sun => count.sundays += 1,
                _ => {}
            }
            count
        })
}
