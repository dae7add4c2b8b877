//! Calculation logic for the billing engine.
//!
//! This module contains the billing cycle resolver, the weekend counter,
//! the service charge resolver, the tax split, the recurring and one-time
//! billing calculators, the parallel batch runners, and the rounding
//! conventions shared with the annexure layer.

mod batch;
mod billing;
mod billing_cycle;
mod charge_resolver;
mod one_time;
mod rounding;
mod tax;
mod weekend_count;

pub use batch::{BillingRun, OneTimeRun, run_billing, run_one_time};
pub use billing::{BillingContext, bill_record, compute_billing};
pub use billing_cycle::{CycleConvention, resolve_billing_cycle};
pub use charge_resolver::{ChargeDefaults, ChargeResolver, ResolvedCharge, parse_charge_value};
pub use one_time::{OneTimeOutcome, compute_one_time};
pub use rounding::{
    CURRENCY_DP, MAX_LINE_AMOUNT, ceil_whole, round_currency, round_currency_dp, round_whole,
    within_line_limit,
};
pub use tax::apply_tax;
pub use weekend_count::{WeekendCount, count_weekends, is_five_day_week};
