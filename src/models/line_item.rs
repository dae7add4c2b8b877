//! Billing output models.
//!
//! This module contains the [`ComputedLineItem`] produced for every billed
//! attendance record, the [`OneTimeLineItem`] produced by new-joiner billing,
//! and the [`ErrorRecord`] produced for every excluded record. All of them are
//! created once per calculation pass and never mutated afterwards.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AttendanceRecord, TaxBreakdown, TaxJurisdiction};

/// A fully computed, billable line for one attendance record.
///
/// Currency and day-count fields are rounded to 2 decimal places.
///
/// # Example
///
/// ```
/// use billing_engine::models::{AttendanceRecord, ComputedLineItem, TaxBreakdown};
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord::new("Acme", "Globex", "E001", "Asha", Decimal::new(1000, 0));
/// let item = ComputedLineItem {
///     record,
///     total_days: Decimal::ZERO,
///     eligible_days: Decimal::ZERO,
///     saturdays: Decimal::ZERO,
///     sundays: Decimal::ZERO,
///     total_billable_days: Decimal::ZERO,
///     final_billable_days: Decimal::ZERO,
///     payable_billing: Decimal::new(1000, 0),
///     charges: Decimal::ZERO,
///     total: Decimal::new(1000, 0),
///     tax: TaxBreakdown { cgst: Decimal::new(90, 0), sgst: Decimal::new(90, 0), igst: Decimal::ZERO },
///     grand_total: Decimal::new(1180, 0),
/// };
/// assert!(item.tax_is_exclusive());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedLineItem {
    /// The source record.
    pub record: AttendanceRecord,
    /// Inclusive length of the full billing cycle.
    pub total_days: Decimal,
    /// Days the employee was eligible, given joining and leaving dates.
    pub eligible_days: Decimal,
    /// Saturdays counted as billable in the effective span.
    pub saturdays: Decimal,
    /// Sundays in the effective span.
    pub sundays: Decimal,
    /// Present days plus weekends plus holidays.
    pub total_billable_days: Decimal,
    /// Total billable days plus the signed adjustment.
    pub final_billable_days: Decimal,
    /// Base billing prorated by final billable days over total days.
    pub payable_billing: Decimal,
    /// Resolved service charge.
    pub charges: Decimal,
    /// Payable billing + charges + out-of-pocket + arrears.
    pub total: Decimal,
    /// Tax on the total.
    pub tax: TaxBreakdown,
    /// Total plus tax.
    pub grand_total: Decimal,
}

impl ComputedLineItem {
    /// Returns true if at most one tax regime carries a non-zero amount.
    pub fn tax_is_exclusive(&self) -> bool {
        let intra = !self.tax.cgst.is_zero() || !self.tax.sgst.is_zero();
        let inter = !self.tax.igst.is_zero();
        !(intra && inter)
    }

    /// The tax regime of the source record.
    pub fn jurisdiction(&self) -> TaxJurisdiction {
        self.record.jurisdiction()
    }
}

/// A one-time placement charge for an employee who joined in the billing month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeLineItem {
    /// The source record.
    pub record: AttendanceRecord,
    /// The resolved one-time charge.
    pub charges: Decimal,
    /// The taxable total (equal to the charge).
    pub total: Decimal,
    /// Tax on the total.
    pub tax: TaxBreakdown,
    /// Total plus tax.
    pub grand_total: Decimal,
}

impl OneTimeLineItem {
    /// The joining date as printed on annexures (dd-mm-yyyy), or empty.
    pub fn joining_date_text(&self) -> String {
        self.record
            .date_of_joining
            .map(|d: NaiveDate| d.format("%d-%m-%Y").to_string())
            .unwrap_or_default()
    }
}

/// Why an attendance record was excluded from billing.
///
/// The display text of each variant is the reason printed in the error report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// Joining date is after the end of the billing cycle.
    #[error("DOJ after Billing Cycle")]
    JoinedAfterCycle,

    /// Last working date is before the start of the billing cycle.
    #[error("DOL before Billing Cycle")]
    LeftBeforeCycle,

    /// Prorated billing came out above the base billing amount.
    #[error("Total Payable Billing greater than Billing")]
    PayableExceedsBilling,

    /// Final billable days exceed the cycle length.
    #[error("Total Payable Days greater than Total Days")]
    PayableDaysExceedTotalDays,

    /// Final billable days differ from the days the employee was eligible.
    #[error("Eligible Days ({eligible}) not matching Payable Days ({payable})")]
    EligibleDaysMismatch {
        /// Days the employee was eligible.
        eligible: Decimal,
        /// Final billable days.
        payable: Decimal,
    },

    /// An amount or day count is too large to bill.
    #[error("Amount out of range")]
    AmountOutOfRange,
}

/// An attendance record that produced no line item, with every reason found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// The source record, unchanged.
    pub record: AttendanceRecord,
    /// The reasons, in the order they were detected. Never empty.
    pub reasons: Vec<ErrorReason>,
}

impl ErrorRecord {
    /// Creates an error record with a single reason.
    pub fn single(record: &AttendanceRecord, reason: ErrorReason) -> Self {
        Self {
            record: record.clone(),
            reasons: vec![reason],
        }
    }

    /// The reasons joined by `" | "`, as shown in the error report.
    ///
    /// ```
    /// use billing_engine::models::{AttendanceRecord, ErrorReason, ErrorRecord};
    /// use rust_decimal::Decimal;
    ///
    /// let record = AttendanceRecord::new("Acme", "Globex", "E001", "Asha", Decimal::ZERO);
    /// let error = ErrorRecord {
    ///     record,
    ///     reasons: vec![
    ///         ErrorReason::PayableDaysExceedTotalDays,
    ///         ErrorReason::EligibleDaysMismatch { eligible: Decimal::new(28, 0), payable: Decimal::new(30, 0) },
    ///     ],
    /// };
    /// assert_eq!(
    ///     error.reason_text(),
    ///     "Total Payable Days greater than Total Days | Eligible Days (28) not matching Payable Days (30)"
    /// );
    /// ```
    pub fn reason_text(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// The result of billing one attendance record: a line item or an exclusion, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BillingOutcome {
    /// The record was billed.
    Billed(ComputedLineItem),
    /// The record was excluded.
    Rejected(ErrorRecord),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_record() -> AttendanceRecord {
        AttendanceRecord::new("Acme", "Globex", "E001", "Asha", dec("50000"))
    }

    fn create_sample_item(tax: TaxBreakdown) -> ComputedLineItem {
        ComputedLineItem {
            record: create_sample_record(),
            total_days: dec("28"),
            eligible_days: dec("28"),
            saturdays: dec("4"),
            sundays: dec("4"),
            total_billable_days: dec("28"),
            final_billable_days: dec("28"),
            payable_billing: dec("50000"),
            charges: dec("4000"),
            total: dec("54000"),
            tax,
            grand_total: dec("54000") + tax.total(),
        }
    }

    #[test]
    fn test_tax_is_exclusive_for_intra_state() {
        let item = create_sample_item(TaxBreakdown {
            cgst: dec("4860"),
            sgst: dec("4860"),
            igst: Decimal::ZERO,
        });
        assert!(item.tax_is_exclusive());
    }

    #[test]
    fn test_tax_is_not_exclusive_when_both_regimes_set() {
        let item = create_sample_item(TaxBreakdown {
            cgst: dec("1"),
            sgst: dec("1"),
            igst: dec("2"),
        });
        assert!(!item.tax_is_exclusive());
    }

    #[test]
    fn test_reason_display_texts() {
        assert_eq!(ErrorReason::JoinedAfterCycle.to_string(), "DOJ after Billing Cycle");
        assert_eq!(ErrorReason::LeftBeforeCycle.to_string(), "DOL before Billing Cycle");
        assert_eq!(
            ErrorReason::PayableExceedsBilling.to_string(),
            "Total Payable Billing greater than Billing"
        );
        assert_eq!(
            ErrorReason::EligibleDaysMismatch {
                eligible: dec("19"),
                payable: dec("18.5"),
            }
            .to_string(),
            "Eligible Days (19) not matching Payable Days (18.5)"
        );
    }

    #[test]
    fn test_single_reason_text_has_no_separator() {
        let error = ErrorRecord::single(&create_sample_record(), ErrorReason::LeftBeforeCycle);
        assert_eq!(error.reason_text(), "DOL before Billing Cycle");
    }

    #[test]
    fn test_joining_date_text() {
        let mut record = create_sample_record();
        record.date_of_joining = NaiveDate::from_ymd_opt(2026, 2, 5);
        let item = OneTimeLineItem {
            record,
            charges: dec("15000"),
            total: dec("15000"),
            tax: TaxBreakdown::default(),
            grand_total: dec("15000"),
        };
        assert_eq!(item.joining_date_text(), "05-02-2026");
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let outcome = BillingOutcome::Rejected(ErrorRecord::single(
            &create_sample_record(),
            ErrorReason::JoinedAfterCycle,
        ));
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"outcome\":\"rejected\""));
        assert!(json.contains("\"joined_after_cycle\""));
    }
}
