//! Rounding conventions for billed amounts.
//!
//! Line items are packaged at 2 decimal places. Presentation totals are
//! whole units: nearest for most columns, ceiling for CGST and SGST.
//! Midpoints round away from zero, matching spreadsheet `ROUND`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of a packaged line item field.
pub const CURRENCY_DP: u32 = 2;

/// Largest absolute value (10^18) a billed line may carry in any amount or
/// day column. Group and summary sums of lines within this limit cannot
/// overflow a `Decimal`.
pub const MAX_LINE_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// True when every value is within [`MAX_LINE_AMOUNT`].
///
/// ```
/// use billing_engine::calculation::within_line_limit;
/// use rust_decimal::Decimal;
///
/// assert!(within_line_limit(&[Decimal::new(-250, 0), Decimal::new(1_000_000_000_000_000_000, 0)]));
/// assert!(!within_line_limit(&[Decimal::new(1_000_000_000_000_000_001, 0)]));
/// ```
pub fn within_line_limit(values: &[Decimal]) -> bool {
    values.iter().all(|value| value.abs() <= MAX_LINE_AMOUNT)
}

/// Rounds to 2 decimal places, midpoint away from zero.
///
/// ```
/// use billing_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(12345, 3)), Decimal::new(1235, 2));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    round_currency_dp(value, CURRENCY_DP)
}

/// Rounds to `dp` decimal places, midpoint away from zero.
pub fn round_currency_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole unit, midpoint away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    round_currency_dp(value, 0)
}

/// Rounds up to the next whole unit.
pub fn ceil_whole(value: Decimal) -> Decimal {
    value.ceil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_currency_midpoint_goes_up() {
        assert_eq!(round_currency(dec("2.675")), dec("2.68"));
        assert_eq!(round_currency(dec("2.665")), dec("2.67"));
        assert_eq!(round_currency(dec("-2.665")), dec("-2.67"));
    }

    #[test]
    fn test_round_whole() {
        assert_eq!(round_whole(dec("10.5")), dec("11"));
        assert_eq!(round_whole(dec("10.49")), dec("10"));
    }

    #[test]
    fn test_ceil_whole() {
        assert_eq!(ceil_whole(dec("10.01")), dec("11"));
        assert_eq!(ceil_whole(dec("10.00")), dec("10"));
    }

    #[test]
    fn test_max_line_amount_is_ten_to_the_eighteenth() {
        assert_eq!(MAX_LINE_AMOUNT, dec("1000000000000000000"));
        assert!(within_line_limit(&[]));
        assert!(!within_line_limit(&[dec("1"), dec("-10000000000000000000")]));
    }
}
