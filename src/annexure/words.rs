//! Amount in words, Indian numbering.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::calculation::round_whole;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// (divisor, scale word), largest first. Crore counts recurse, so amounts
/// above 99 crore read as e.g. "One Hundred Crore".
const SCALES: [(u128, &str); 4] = [
    (10_000_000, "Crore"),
    (100_000, "Lakh"),
    (1_000, "Thousand"),
    (100, "Hundred"),
];

fn push_below_hundred(n: u128, words: &mut Vec<String>) {
    match n {
        0 => {}
        1..=19 => words.push(ONES[n as usize].to_string()),
        _ => {
            words.push(TENS[(n / 10) as usize].to_string());
            if n % 10 != 0 {
                words.push(ONES[(n % 10) as usize].to_string());
            }
        }
    }
}

fn push_words(mut n: u128, words: &mut Vec<String>) {
    for (divisor, scale) in SCALES {
        let count = n / divisor;
        if count > 0 {
            push_words(count, words);
            words.push(scale.to_string());
            n %= divisor;
        }
    }
    push_below_hundred(n, words);
}

/// Spells out an amount in title case using Indian numbering, suffixed "Only".
///
/// The amount is rounded to whole units first.
///
/// # Example
///
/// ```
/// use billing_engine::annexure::amount_in_words;
/// use rust_decimal::Decimal;
///
/// assert_eq!(amount_in_words(Decimal::new(118000, 0)), "One Lakh Eighteen Thousand Only");
/// assert_eq!(
///     amount_in_words(Decimal::new(12345678, 0)),
///     "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight Only"
/// );
/// ```
pub fn amount_in_words(amount: Decimal) -> String {
    let whole = round_whole(amount);
    let Some(value) = whole.abs().to_u128() else {
        return format!("{} Only", whole);
    };

    let mut words = Vec::new();
    if whole.is_sign_negative() && value > 0 {
        words.push("Minus".to_string());
    }
    if value == 0 {
        words.push(ONES[0].to_string());
    } else {
        push_words(value, &mut words);
    }
    words.push("Only".to_string());
    words.join(" ")
}
