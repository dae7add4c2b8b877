//! Goods and services tax models.
//!
//! Intra-state supplies carry CGST and SGST; inter-state supplies carry IGST.
//! The two regimes are mutually exclusive for any one line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The tax regime a record is billed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxJurisdiction {
    /// CGST + SGST.
    IntraState,
    /// IGST only.
    InterState,
}

impl TaxJurisdiction {
    /// Reads the jurisdiction flag: any text containing "IGST" (any case) is
    /// inter-state; anything else, including a missing flag, is intra-state.
    ///
    /// ```
    /// use billing_engine::models::TaxJurisdiction;
    ///
    /// assert_eq!(TaxJurisdiction::from_flag(Some("IGST")), TaxJurisdiction::InterState);
    /// assert_eq!(TaxJurisdiction::from_flag(Some("CGST/SGST")), TaxJurisdiction::IntraState);
    /// assert_eq!(TaxJurisdiction::from_flag(None), TaxJurisdiction::IntraState);
    /// ```
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(text) if text.to_uppercase().contains("IGST") => TaxJurisdiction::InterState,
            _ => TaxJurisdiction::IntraState,
        }
    }
}

/// Tax rates applied to line item totals.
///
/// Rates left out of a configured section keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRates {
    /// Central GST rate (fraction, e.g. 0.09).
    pub cgst: Decimal,
    /// State GST rate (fraction, e.g. 0.09).
    pub sgst: Decimal,
    /// Integrated GST rate (fraction, e.g. 0.18).
    pub igst: Decimal,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            cgst: Decimal::new(9, 2),
            sgst: Decimal::new(9, 2),
            igst: Decimal::new(18, 2),
        }
    }
}

/// The tax amounts of one line item. Only the applicable regime is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Central GST.
    pub cgst: Decimal,
    /// State GST.
    pub sgst: Decimal,
    /// Integrated GST.
    pub igst: Decimal,
}

impl TaxBreakdown {
    /// Sum of all three components.
    pub fn total(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }

    /// The total tax, or `None` if the sum overflows.
    pub fn checked_total(&self) -> Option<Decimal> {
        self.cgst.checked_add(self.sgst)?.checked_add(self.igst)
    }

    /// Rounds every component to `dp` decimal places.
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            cgst: crate::calculation::round_currency_dp(self.cgst, dp),
            sgst: crate::calculation::round_currency_dp(self.sgst, dp),
            igst: crate::calculation::round_currency_dp(self.igst, dp),
        }
    }
}
