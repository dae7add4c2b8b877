//! Configuration types for a billing run.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::TaxRates;

/// Which kind of billing a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// Attendance-based billing of every employee.
    #[default]
    Recurring,
    /// One-time placement charges for employees who joined during the month.
    OneTime,
}

impl std::fmt::Display for BillingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingMode::Recurring => write!(f, "recurring"),
            BillingMode::OneTime => write!(f, "one_time"),
        }
    }
}

/// The `billing` section: what is being billed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSection {
    /// Billing month, 1..=12.
    pub month: u32,
    /// Billing year.
    pub year: i32,
    /// Billing mode; defaults to recurring.
    #[serde(default)]
    pub mode: BillingMode,
}

/// The `inputs` section: where the input tables are.
///
/// Relative paths are resolved against the directory of the configuration
/// file when it is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    /// Attendance table (CSV).
    pub attendance: PathBuf,
    /// Charge-rate table (CSV).
    pub charges: PathBuf,
    /// PO number table (CSV), if any.
    #[serde(default)]
    pub po_numbers: Option<PathBuf>,
    /// Directory of bill templates, if any.
    #[serde(default)]
    pub templates: Option<PathBuf>,
}

/// The `output` section: where generated files go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Output directory, created if missing.
    pub directory: PathBuf,
}

/// A complete billing run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// What is being billed.
    pub billing: BillingSection,
    /// Tax rates; the standard 9% / 9% / 18% when omitted.
    #[serde(default)]
    pub tax: TaxRates,
    /// Input tables.
    pub inputs: InputSection,
    /// Output location.
    pub output: OutputSection,
}
