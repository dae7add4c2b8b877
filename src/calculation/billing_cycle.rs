//! Billing cycle resolution.
//!
//! Resolves the start and end date of a record's billing cycle from the free
//! text cycle label on the attendance sheet and the target billing month.

use serde::{Deserialize, Serialize};

use crate::models::{BillingCycle, BillingMonth};

/// A recognised cycle convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleConvention {
    /// 21st of the previous month to 20th of the billing month.
    TwentyFirst,
    /// 25th of the previous month to 24th of the billing month.
    TwentyFifth,
    /// 26th of the previous month to 25th of the billing month.
    TwentySixth,
    /// 1st to last day of the billing month.
    CalendarMonth,
}

/// Conventions in match order, with the (start day, end day) tokens that identify them.
const CONVENTIONS: [(CycleConvention, u32, u32); 3] = [
    (CycleConvention::TwentyFirst, 21, 20),
    (CycleConvention::TwentyFifth, 25, 24),
    (CycleConvention::TwentySixth, 26, 25),
];

impl CycleConvention {
    /// Detects the convention named by a cycle label.
    ///
    /// A label names a convention when it contains both of its boundary day
    /// numbers, in any order and with any separators. Conventions are tried in
    /// the order 21/20, 25/24, 26/25. Anything else is a calendar month.
    ///
    /// # Example
    ///
    /// ```
    /// use billing_engine::calculation::CycleConvention;
    ///
    /// assert_eq!(CycleConvention::detect("21st to 20th"), CycleConvention::TwentyFirst);
    /// assert_eq!(CycleConvention::detect("26-25"), CycleConvention::TwentySixth);
    /// assert_eq!(CycleConvention::detect("Monthly"), CycleConvention::CalendarMonth);
    /// ```
    pub fn detect(label: &str) -> Self {
        let text = label.to_lowercase();
        CONVENTIONS
            .iter()
            .find(|(_, start, end)| {
                text.contains(&start.to_string()) && text.contains(&end.to_string())
            })
            .map_or(CycleConvention::CalendarMonth, |(convention, _, _)| *convention)
    }

    /// The (start day, end day) of the convention, or `None` for calendar months.
    pub fn boundary_days(&self) -> Option<(u32, u32)> {
        CONVENTIONS
            .iter()
            .find(|(convention, _, _)| convention == self)
            .map(|(_, start, end)| (*start, *end))
    }
}

/// Resolves the billing cycle named by `label` for the given billing month.
///
/// Never fails: an unrecognised label falls back to the full calendar month.
///
/// # Example
///
/// ```
/// use billing_engine::calculation::resolve_billing_cycle;
/// use billing_engine::models::BillingMonth;
/// use chrono::NaiveDate;
///
/// let january = BillingMonth::new(2026, 1).unwrap();
/// let cycle = resolve_billing_cycle("25-24", january);
/// assert_eq!(cycle.start, NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
/// assert_eq!(cycle.end, NaiveDate::from_ymd_opt(2026, 1, 24).unwrap());
/// ```
pub fn resolve_billing_cycle(label: &str, month: BillingMonth) -> BillingCycle {
    match CycleConvention::detect(label).boundary_days() {
        Some((start_day, end_day)) => BillingCycle {
            start: month.previous().day(start_day),
            end: month.day(end_day),
        },
        None => BillingCycle {
            start: month.first_day(),
            end: month.last_day(),
        },
    }
}
