//! Recurring billing calculation.
//!
//! This module provides [`compute_billing`], which turns one attendance
//! record and its resolved billing cycle into either a [`ComputedLineItem`]
//! or an [`ErrorRecord`]. The calculation is a pure function of its inputs;
//! records share nothing but the read-only [`BillingContext`].
//!
//! # Flow
//!
//! Differential records bill their full base amount with no charge and skip
//! all day logic. Every other record goes through:
//!
//! 1. Joining/leaving date exclusion and partial-period bounds
//! 2. Day counts: cycle length, eligible days, weekends, billable days
//! 3. Proration of the base billing and the service charge
//! 4. Tax split and grand total
//! 5. Validation of the result against the base billing and the day counts

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::billing_cycle::resolve_billing_cycle;
use super::charge_resolver::ChargeResolver;
use super::rounding::{round_currency, within_line_limit, CURRENCY_DP};
use super::tax::apply_tax;
use super::weekend_count::count_weekends;
use crate::models::{
    inclusive_days, AttendanceRecord, BillingCycle, BillingMonth, BillingOutcome, ChargeMode,
    ComputedLineItem, ErrorReason, ErrorRecord, TaxBreakdown, TaxRates,
};

/// Read-only inputs shared by every record in a billing run.
#[derive(Debug, Clone, Copy)]
pub struct BillingContext<'a> {
    /// The month being billed.
    pub billing_month: BillingMonth,
    /// The charge-rate table.
    pub charges: &'a ChargeResolver,
    /// The tax rates.
    pub tax_rates: TaxRates,
}

impl<'a> BillingContext<'a> {
    /// Creates a context with the default tax rates.
    pub fn new(billing_month: BillingMonth, charges: &'a ChargeResolver) -> Self {
        Self {
            billing_month,
            charges,
            tax_rates: TaxRates::default(),
        }
    }

    /// Replaces the tax rates.
    pub fn with_tax_rates(mut self, tax_rates: TaxRates) -> Self {
        self.tax_rates = tax_rates;
        self
    }
}

/// Unrounded intermediate values of the standard flow.
#[derive(Debug)]
struct DayBreakdown {
    total_days: Decimal,
    eligible_days: Decimal,
    saturdays: Decimal,
    sundays: Decimal,
    total_billable_days: Decimal,
    final_billable_days: Decimal,
}

/// Unrounded currency values of one record.
#[derive(Debug)]
struct Amounts {
    payable_billing: Decimal,
    charges: Decimal,
    total: Decimal,
    tax: TaxBreakdown,
    grand_total: Decimal,
}

impl Amounts {
    /// Adds expenses, arrears and tax to the billing and charge. `None` on overflow.
    fn price(
        record: &AttendanceRecord,
        payable_billing: Decimal,
        charges: Decimal,
        rates: &TaxRates,
    ) -> Option<Self> {
        let total = payable_billing
            .checked_add(charges)?
            .checked_add(record.out_of_pocket)?
            .checked_add(record.arrears)?;
        let tax = apply_tax(total, record.jurisdiction(), rates)?;
        let grand_total = total.checked_add(tax.checked_total()?)?;

        Some(Self {
            payable_billing,
            charges,
            total,
            tax,
            grand_total,
        })
    }

    fn within_limit(&self) -> bool {
        within_line_limit(&[
            self.payable_billing,
            self.charges,
            self.total,
            self.tax.cgst,
            self.tax.sgst,
            self.tax.igst,
            self.grand_total,
        ])
    }
}

/// True when every numeric input of the record is within the line limit.
fn inputs_within_limit(record: &AttendanceRecord) -> bool {
    within_line_limit(&[
        record.billing,
        record.present_days,
        record.holidays,
        record.absent_days,
        record.day_adjustment,
        record.out_of_pocket,
        record.arrears,
    ])
}

fn out_of_range(record: &AttendanceRecord) -> BillingOutcome {
    debug!(
        employee_code = %record.employee_code,
        "Record amounts exceed the billable range"
    );
    BillingOutcome::Rejected(ErrorRecord::single(record, ErrorReason::AmountOutOfRange))
}

/// Resolves the record's billing cycle and computes its billing outcome.
///
/// # Example
///
/// ```
/// use billing_engine::calculation::{bill_record, BillingContext, ChargeDefaults, ChargeResolver};
/// use billing_engine::models::{AttendanceRecord, BillingMonth, BillingOutcome};
/// use rust_decimal::Decimal;
///
/// let charges = ChargeResolver::empty(ChargeDefaults::recurring());
/// let ctx = BillingContext::new(BillingMonth::new(2026, 2).unwrap(), &charges);
///
/// let mut record = AttendanceRecord::new("Acme", "Globex", "E001", "Asha", Decimal::new(28000, 0));
/// record.billing_cycle = "Monthly".to_string();
/// record.workweek = "6 days".to_string();
/// record.present_days = Decimal::new(24, 0);
///
/// match bill_record(&record, &ctx) {
///     BillingOutcome::Billed(item) => assert_eq!(item.payable_billing, Decimal::new(28000, 0)),
///     BillingOutcome::Rejected(error) => panic!("{}", error.reason_text()),
/// }
/// ```
pub fn bill_record(record: &AttendanceRecord, ctx: &BillingContext<'_>) -> BillingOutcome {
    let cycle = resolve_billing_cycle(&record.billing_cycle, ctx.billing_month);
    compute_billing(record, cycle, ctx)
}

/// Computes the billing outcome of one record over a resolved cycle.
///
/// Returns [`BillingOutcome::Rejected`] when the record falls outside the
/// cycle or fails validation, and [`BillingOutcome::Billed`] otherwise. Never
/// both, and never an error: every problem with the record is reported in
/// the outcome.
pub fn compute_billing(
    record: &AttendanceRecord,
    cycle: BillingCycle,
    ctx: &BillingContext<'_>,
) -> BillingOutcome {
    if !inputs_within_limit(record) {
        return out_of_range(record);
    }

    if record.is_differential() {
        return match compute_differential(record, ctx) {
            Some(item) => BillingOutcome::Billed(item),
            None => out_of_range(record),
        };
    }

    let (effective_start, effective_end) = match effective_span(record, cycle) {
        Ok(span) => span,
        Err(reason) => {
            debug!(
                employee_code = %record.employee_code,
                reason = %reason,
                "Record excluded from billing cycle"
            );
            return BillingOutcome::Rejected(ErrorRecord::single(record, reason));
        }
    };

    let Some(days) = day_breakdown(record, cycle, effective_start, effective_end) else {
        return out_of_range(record);
    };
    let Some(amounts) = standard_amounts(record, &days, ctx).filter(Amounts::within_limit) else {
        return out_of_range(record);
    };

    let reasons = validate(record, amounts.payable_billing, &days);
    if !reasons.is_empty() {
        debug!(
            employee_code = %record.employee_code,
            reason_count = reasons.len(),
            "Record failed billing validation"
        );
        return BillingOutcome::Rejected(ErrorRecord {
            record: record.clone(),
            reasons,
        });
    }

    BillingOutcome::Billed(package(record, &days, &amounts))
}

/// Prorated billing and charge with everything added on. `None` on overflow.
fn standard_amounts(
    record: &AttendanceRecord,
    days: &DayBreakdown,
    ctx: &BillingContext<'_>,
) -> Option<Amounts> {
    let payable_billing = if days.total_days.is_zero() {
        Decimal::ZERO
    } else {
        record
            .billing
            .checked_mul(days.final_billable_days)?
            .checked_div(days.total_days)?
    };

    let charges = prorated_charge(record, payable_billing, ctx.charges)?;
    Amounts::price(record, payable_billing, charges, &ctx.tax_rates)
}

/// Full base billing, no charge, no day logic. `None` when out of range.
fn compute_differential(
    record: &AttendanceRecord,
    ctx: &BillingContext<'_>,
) -> Option<ComputedLineItem> {
    let amounts = Amounts::price(record, record.billing, Decimal::ZERO, &ctx.tax_rates)
        .filter(Amounts::within_limit)?;

    let zero_days = DayBreakdown {
        total_days: Decimal::ZERO,
        eligible_days: Decimal::ZERO,
        saturdays: Decimal::ZERO,
        sundays: Decimal::ZERO,
        total_billable_days: Decimal::ZERO,
        final_billable_days: Decimal::ZERO,
    };

    Some(package(record, &zero_days, &amounts))
}

/// The effective (start, end) the record is billed over, or the exclusion reason.
fn effective_span(
    record: &AttendanceRecord,
    cycle: BillingCycle,
) -> Result<(NaiveDate, NaiveDate), ErrorReason> {
    let start = match record.date_of_joining {
        Some(joined) if joined > cycle.end => return Err(ErrorReason::JoinedAfterCycle),
        Some(joined) if joined > cycle.start => joined,
        _ => cycle.start,
    };

    let end = match record.last_working_date {
        Some(left) if left < cycle.start => return Err(ErrorReason::LeftBeforeCycle),
        Some(left) if left < cycle.end => left,
        _ => cycle.end,
    };

    Ok((start, end))
}

fn day_breakdown(
    record: &AttendanceRecord,
    cycle: BillingCycle,
    effective_start: NaiveDate,
    effective_end: NaiveDate,
) -> Option<DayBreakdown> {
    let total_days = Decimal::from(cycle.total_days());

    let eligible_start = record
        .date_of_joining
        .map_or(cycle.start, |joined| joined.max(cycle.start));
    let eligible_end = record
        .last_working_date
        .map_or(cycle.end, |left| left.min(cycle.end));
    let eligible_days = Decimal::from(inclusive_days(eligible_start, eligible_end));

    let weekends = count_weekends(effective_start, effective_end, &record.workweek);
    let saturdays = Decimal::from(weekends.saturdays);
    let sundays = Decimal::from(weekends.sundays);

    let total_billable_days = record
        .present_days
        .checked_add(saturdays)?
        .checked_add(sundays)?
        .checked_add(record.holidays)?;
    let final_billable_days = total_billable_days.checked_add(record.day_adjustment)?;

    Some(DayBreakdown {
        total_days,
        eligible_days,
        saturdays,
        sundays,
        total_billable_days,
        final_billable_days,
    })
}

/// The service charge after applying the rule's mode. `None` on overflow.
fn prorated_charge(
    record: &AttendanceRecord,
    payable_billing: Decimal,
    resolver: &ChargeResolver,
) -> Option<Decimal> {
    let charge = resolver.resolve(
        &record.responsible_party,
        record.position.as_deref(),
        record.billing,
    )?;

    match charge.mode {
        ChargeMode::Fixed => Some(charge.amount),
        ChargeMode::Proportionate if record.billing > Decimal::ZERO => payable_billing
            .checked_div(record.billing)?
            .checked_mul(charge.amount),
        ChargeMode::Proportionate => Some(Decimal::ZERO),
    }
}

/// Checks the unrounded results; an empty list means the record is billable.
fn validate(
    record: &AttendanceRecord,
    payable_billing: Decimal,
    days: &DayBreakdown,
) -> Vec<ErrorReason> {
    let mut reasons = Vec::new();

    if payable_billing > record.billing {
        reasons.push(ErrorReason::PayableExceedsBilling);
    }
    if days.final_billable_days > days.total_days {
        reasons.push(ErrorReason::PayableDaysExceedTotalDays);
    }
    if days.final_billable_days != days.eligible_days {
        reasons.push(ErrorReason::EligibleDaysMismatch {
            eligible: days.eligible_days.normalize(),
            payable: days.final_billable_days.normalize(),
        });
    }

    reasons
}

fn package(record: &AttendanceRecord, days: &DayBreakdown, amounts: &Amounts) -> ComputedLineItem {
    ComputedLineItem {
        record: record.clone(),
        total_days: round_currency(days.total_days),
        eligible_days: round_currency(days.eligible_days),
        saturdays: round_currency(days.saturdays),
        sundays: round_currency(days.sundays),
        total_billable_days: round_currency(days.total_billable_days),
        final_billable_days: round_currency(days.final_billable_days),
        payable_billing: round_currency(amounts.payable_billing),
        charges: round_currency(amounts.charges),
        total: round_currency(amounts.total),
        tax: amounts.tax.round_dp(CURRENCY_DP),
        grand_total: round_currency(amounts.grand_total),
    }
}
