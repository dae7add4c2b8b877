//! One-time (new joiner) billing.
//!
//! Bills a one-time placement charge for every employee who joined during
//! the billing month. No attendance logic applies: the charge is used as
//! resolved, with one-time defaults, and taxed like a recurring total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::billing::BillingContext;
use super::rounding::{round_currency, within_line_limit, CURRENCY_DP};
use super::tax::apply_tax;
use crate::models::{AttendanceRecord, ErrorReason, ErrorRecord, OneTimeLineItem};

/// The result of one-time billing for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OneTimeOutcome {
    /// The record was billed a placement charge.
    Billed(OneTimeLineItem),
    /// The employee did not join during the billing month.
    NotNewJoiner,
    /// No positive charge is defined for the employee.
    NoCharge,
    /// The charge or its tax is beyond the billable range.
    Rejected(ErrorRecord),
}

impl OneTimeOutcome {
    /// The line item, if the record was billed.
    pub fn into_line_item(self) -> Option<OneTimeLineItem> {
        match self {
            OneTimeOutcome::Billed(item) => Some(item),
            _ => None,
        }
    }
}

/// Computes the one-time charge for a record.
///
/// The context's charge resolver should be built with
/// [`ChargeDefaults::one_time`](super::ChargeDefaults::one_time).
///
/// # Example
///
/// ```
/// use billing_engine::calculation::{compute_one_time, BillingContext, ChargeDefaults, ChargeResolver, OneTimeOutcome};
/// use billing_engine::models::{AttendanceRecord, BillingMonth, ChargeRule};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let charges = ChargeResolver::new(
///     vec![ChargeRule {
///         responsible_party: "Acme".to_string(),
///         position: String::new(),
///         charge_type: None,
///         charge_value: Decimal::new(15000, 0),
///         application_mode: None,
///     }],
///     ChargeDefaults::one_time(),
/// );
/// let ctx = BillingContext::new(BillingMonth::new(2026, 2).unwrap(), &charges);
///
/// let mut record = AttendanceRecord::new("Acme", "Globex", "E001", "Asha", Decimal::ZERO);
/// record.date_of_joining = NaiveDate::from_ymd_opt(2026, 2, 9);
///
/// let item = compute_one_time(&record, &ctx).into_line_item().unwrap();
/// assert_eq!(item.grand_total, Decimal::new(17700, 0));
/// ```
pub fn compute_one_time(record: &AttendanceRecord, ctx: &BillingContext<'_>) -> OneTimeOutcome {
    let joined_in_month = record
        .date_of_joining
        .is_some_and(|joined| ctx.billing_month.contains(joined));
    if !joined_in_month {
        return OneTimeOutcome::NotNewJoiner;
    }

    let Some(charge) = ctx.charges.resolve(
        &record.responsible_party,
        record.position.as_deref(),
        record.billing,
    ) else {
        return out_of_range(record);
    };
    if charge.amount <= Decimal::ZERO {
        debug!(
            employee_code = %record.employee_code,
            employee_name = %record.employee_name,
            "Skipping new joiner with no charge defined"
        );
        return OneTimeOutcome::NoCharge;
    }

    let total = charge.amount;
    let Some(tax) = apply_tax(total, record.jurisdiction(), &ctx.tax_rates) else {
        return out_of_range(record);
    };
    let Some(grand_total) = tax
        .checked_total()
        .and_then(|tax_total| total.checked_add(tax_total))
        .filter(|grand_total| {
            within_line_limit(&[total, tax.cgst, tax.sgst, tax.igst, *grand_total])
        })
    else {
        return out_of_range(record);
    };

    OneTimeOutcome::Billed(OneTimeLineItem {
        record: record.clone(),
        charges: round_currency(charge.amount),
        total: round_currency(total),
        tax: tax.round_dp(CURRENCY_DP),
        grand_total: round_currency(grand_total),
    })
}

fn out_of_range(record: &AttendanceRecord) -> OneTimeOutcome {
    debug!(
        employee_code = %record.employee_code,
        "One-time charge exceeds the billable range"
    );
    OneTimeOutcome::Rejected(ErrorRecord::single(record, ErrorReason::AmountOutOfRange))
}
