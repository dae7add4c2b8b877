//! Billing month and billing cycle models.
//!
//! A [`BillingMonth`] is the target (month, year) of a billing run. A
//! [`BillingCycle`] is the inclusive date range a record is billed over,
//! resolved from the record's cycle label against the billing month.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// The target month of a billing run.
///
/// Construction validates the month so that every date derived from it
/// (first day, last day, cycle boundaries) exists.
///
/// # Example
///
/// ```
/// use billing_engine::models::BillingMonth;
///
/// let month = BillingMonth::new(2024, 2).unwrap();
/// assert_eq!(month.days_in_month(), 29);
/// assert!(BillingMonth::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Creates a billing month, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidConfig {
                field: "billing.month".to_string(),
                message: format!("must be between 1 and 12, got {}", month),
            });
        }
        // Leave room for the wraparound into the neighbouring years.
        let in_range = |y: Option<i32>, m: u32| {
            y.and_then(|y| NaiveDate::from_ymd_opt(y, m, 1)).is_some()
        };
        if !in_range(year.checked_sub(1), 12) || !in_range(year.checked_add(1), 1) {
            return Err(EngineError::InvalidConfig {
                field: "billing.year".to_string(),
                message: format!("year {} is out of range", year),
            });
        }
        Ok(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month (1..=12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated billing month")
    }

    /// The last day of the month, accounting for leap years.
    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .with_day(self.days_in_month())
            .expect("days_in_month is a valid day")
    }

    /// The number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        let next_first = NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .expect("validated billing month");
        next_first.pred_opt().map_or(31, |d| d.day())
    }

    /// The month before this one, wrapping January to December of the prior year.
    pub fn previous(&self) -> BillingMonth {
        if self.month == 1 {
            BillingMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            BillingMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    fn next(&self) -> BillingMonth {
        if self.month == 12 {
            BillingMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            BillingMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns true if `date` falls in this calendar month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Returns the given day of this month.
    ///
    /// Only used for cycle boundary days (20..=26), which exist in every month.
    pub(crate) fn day(&self, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, day).expect("cycle boundary day exists")
    }
}

impl std::fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// The inclusive date range a record is billed over.
///
/// # Example
///
/// ```
/// use billing_engine::models::BillingCycle;
/// use chrono::NaiveDate;
///
/// let cycle = BillingCycle {
///     start: NaiveDate::from_ymd_opt(2026, 1, 21).unwrap(),
///     end: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
/// };
/// assert_eq!(cycle.total_days(), 31);
/// assert_eq!(cycle.period_text(), "21 Jan 2026 to 20 Feb 2026");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingCycle {
    /// First billed day (inclusive).
    pub start: NaiveDate,
    /// Last billed day (inclusive).
    pub end: NaiveDate,
}

impl BillingCycle {
    /// The inclusive number of days in the cycle.
    pub fn total_days(&self) -> i64 {
        inclusive_days(self.start, self.end)
    }

    /// Checks if a date falls within the cycle (inclusive of both ends).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Human-readable period, as printed on bills.
    pub fn period_text(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%d %b %Y"),
            self.end.format("%d %b %Y")
        )
    }
}

/// Inclusive day span between two dates; zero or negative when `end` precedes `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}
