//! Core data models for the billing engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod billing_cycle;
mod charge_rule;
mod line_item;
mod tax;

pub use attendance::{AttendanceRecord, GroupKey};
pub use billing_cycle::{BillingCycle, BillingMonth, inclusive_days};
pub use charge_rule::{ChargeBasis, ChargeMode, ChargeRule};
pub use line_item::{BillingOutcome, ComputedLineItem, ErrorReason, ErrorRecord, OneTimeLineItem};
pub use tax::{TaxBreakdown, TaxJurisdiction, TaxRates};
