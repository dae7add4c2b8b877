//! Tax split calculation.
//!
//! Splits the tax on a line item total into CGST + SGST for intra-state
//! supplies, or IGST for inter-state supplies.

use rust_decimal::Decimal;

use crate::models::{TaxBreakdown, TaxJurisdiction, TaxRates};

/// Computes the tax on `total` under the given jurisdiction.
///
/// Only the applicable regime's components are non-zero. Returns `None` if a
/// component overflows.
///
/// # Example
///
/// ```
/// use billing_engine::calculation::apply_tax;
/// use billing_engine::models::{TaxJurisdiction, TaxRates};
/// use rust_decimal::Decimal;
///
/// let tax = apply_tax(Decimal::new(1000, 0), TaxJurisdiction::InterState, &TaxRates::default()).unwrap();
/// assert_eq!(tax.igst, Decimal::new(180, 0));
/// assert!(tax.cgst.is_zero() && tax.sgst.is_zero());
/// ```
pub fn apply_tax(
    total: Decimal,
    jurisdiction: TaxJurisdiction,
    rates: &TaxRates,
) -> Option<TaxBreakdown> {
    let tax = match jurisdiction {
        TaxJurisdiction::InterState => TaxBreakdown {
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: total.checked_mul(rates.igst)?,
        },
        TaxJurisdiction::IntraState => TaxBreakdown {
            cgst: total.checked_mul(rates.cgst)?,
            sgst: total.checked_mul(rates.sgst)?,
            igst: Decimal::ZERO,
        },
    };
    Some(tax)
}
