//! Monetary amount helpers.
//!
//! Gateway amounts are compared at two decimal places, rounding half away
//! from zero, so `10.005` becomes `10.01`. Amounts are carried as
//! `rust_decimal::Decimal` end to end; a binary float never enters the
//! comparison.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places the gateway settles in.
pub const SETTLEMENT_SCALE: u32 = 2;

/// Rounds an amount to settlement precision.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SETTLEMENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if both amounts are equal once rounded to settlement precision.
pub fn amounts_match(reported: Decimal, expected: Decimal) -> bool {
    round_to_cents(reported) == round_to_cents(expected)
}

/// Formats an amount with exactly two decimals and a `.` separator.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_to_cents(amount))
}

/// Parses a decimal from its textual form, accepting exponent notation.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
