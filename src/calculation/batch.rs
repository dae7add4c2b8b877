//! Batch billing runs.
//!
//! Bills every record of an attendance table in parallel with [`rayon`].
//! Records share only the read-only [`BillingContext`]; outputs keep the
//! relative order of their source records.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::billing::{bill_record, BillingContext};
use super::one_time::{compute_one_time, OneTimeOutcome};
use crate::models::{
    AttendanceRecord, BillingMonth, BillingOutcome, ComputedLineItem, ErrorRecord, OneTimeLineItem,
};

/// The result of a recurring billing run.
///
/// Every input record appears exactly once, either in `line_items` or in
/// `errors`.
#[derive(Debug, Clone, Serialize)]
pub struct BillingRun {
    /// Unique id of this run, carried on every log event.
    pub run_id: Uuid,
    /// The month billed.
    pub billing_month: BillingMonth,
    /// Billed records.
    pub line_items: Vec<ComputedLineItem>,
    /// Excluded records with their reasons.
    pub errors: Vec<ErrorRecord>,
}

impl BillingRun {
    /// Number of input records processed.
    pub fn processed(&self) -> usize {
        self.line_items.len() + self.errors.len()
    }
}

/// The result of a one-time (new joiner) billing run.
#[derive(Debug, Clone, Serialize)]
pub struct OneTimeRun {
    /// Unique id of this run, carried on every log event.
    pub run_id: Uuid,
    /// The month billed.
    pub billing_month: BillingMonth,
    /// Employees who joined during the month.
    pub new_joiners: usize,
    /// New joiners skipped because no positive charge is defined.
    pub skipped: usize,
    /// Billed new joiners.
    pub line_items: Vec<OneTimeLineItem>,
    /// New joiners whose charge could not be billed.
    pub errors: Vec<ErrorRecord>,
}

/// Bills every record for recurring attendance-based billing.
///
/// No record aborts the run; problems are collected as [`ErrorRecord`]s.
///
/// # Example
///
/// ```
/// use billing_engine::calculation::{run_billing, BillingContext, ChargeDefaults, ChargeResolver};
/// use billing_engine::models::{AttendanceRecord, BillingMonth};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let charges = ChargeResolver::empty(ChargeDefaults::recurring());
/// let ctx = BillingContext::new(BillingMonth::new(2026, 2).unwrap(), &charges);
///
/// let mut left_early = AttendanceRecord::new("Acme", "Globex", "E002", "Ben", Decimal::new(1000, 0));
/// left_early.last_working_date = NaiveDate::from_ymd_opt(2025, 12, 31);
///
/// let run = run_billing(&[left_early], &ctx);
/// assert_eq!(run.processed(), 1);
/// assert_eq!(run.errors.len(), 1);
/// ```
pub fn run_billing(records: &[AttendanceRecord], ctx: &BillingContext<'_>) -> BillingRun {
    let run_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(
        run_id = %run_id,
        billing_month = %ctx.billing_month,
        record_count = records.len(),
        "Starting billing run"
    );

    let outcomes: Vec<BillingOutcome> = records
        .par_iter()
        .map(|record| bill_record(record, ctx))
        .collect();

    let (mut line_items, mut errors) = (Vec::new(), Vec::new());
    for outcome in outcomes {
        match outcome {
            BillingOutcome::Billed(item) => line_items.push(item),
            BillingOutcome::Rejected(error) => {
                warn!(
                    run_id = %run_id,
                    employee_code = %error.record.employee_code,
                    employee_name = %error.record.employee_name,
                    reason = %error.reason_text(),
                    "Record excluded from billing"
                );
                errors.push(error);
            }
        }
    }

    info!(
        run_id = %run_id,
        billed = line_items.len(),
        errors = errors.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Billing run completed"
    );

    BillingRun {
        run_id,
        billing_month: ctx.billing_month,
        line_items,
        errors,
    }
}

/// Bills a one-time placement charge for every employee who joined during the month.
pub fn run_one_time(records: &[AttendanceRecord], ctx: &BillingContext<'_>) -> OneTimeRun {
    let run_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(
        run_id = %run_id,
        billing_month = %ctx.billing_month,
        record_count = records.len(),
        "Starting one-time billing run"
    );

    let outcomes: Vec<OneTimeOutcome> = records
        .par_iter()
        .map(|record| compute_one_time(record, ctx))
        .collect();

    let mut new_joiners = 0;
    let mut skipped = 0;
    let mut line_items = Vec::new();
    let mut errors = Vec::new();
    for (record, outcome) in records.iter().zip(outcomes) {
        match outcome {
            OneTimeOutcome::Billed(item) => {
                new_joiners += 1;
                line_items.push(item);
            }
            OneTimeOutcome::NoCharge => {
                new_joiners += 1;
                skipped += 1;
                warn!(
                    run_id = %run_id,
                    employee_code = %record.employee_code,
                    employee_name = %record.employee_name,
                    "Skipping new joiner: no charge defined"
                );
            }
            OneTimeOutcome::Rejected(error) => {
                new_joiners += 1;
                warn!(
                    run_id = %run_id,
                    employee_code = %record.employee_code,
                    employee_name = %record.employee_name,
                    reason = %error.reason_text(),
                    "New joiner excluded from billing"
                );
                errors.push(error);
            }
            OneTimeOutcome::NotNewJoiner => {}
        }
    }

    info!(
        run_id = %run_id,
        new_joiners,
        billed = line_items.len(),
        skipped,
        errors = errors.len(),
        duration_us = start_time.elapsed().as_micros(),
        "One-time billing run completed"
    );

    OneTimeRun {
        run_id,
        billing_month: ctx.billing_month,
        new_joiners,
        skipped,
        line_items,
        errors,
    }
}
