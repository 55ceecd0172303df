//! Currency parsing for the vendor's dollar amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a dollar amount such as `$1,234.56`, `15.26` or ` $ 3.00 `.
///
/// Whitespace is allowed only around the amount and after a leading `$`.
/// A run like `74.96 1976` holds two numbers and yields `None`.
pub fn parse_money(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let s = s.strip_prefix('$').map(str::trim_start).unwrap_or(s);

    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return None;
    }

    Decimal::from_str(&s.replace(',', "")).ok()
}

/// Parse the first two whitespace-separated amounts of `s`.
///
/// Dollar signs count as separators, so `$15.26$15.26` yields two values.
/// Both tokens must parse; anything else is `None`.
pub fn parse_money_pair(s: &str) -> Option<(Decimal, Decimal)> {
    let cleaned = s.replace('$', " ");
    let mut parts = cleaned.split_whitespace();

    let first = parse_money(parts.next()?)?;
    let second = parse_money(parts.next()?)?;
    Some((first, second))
}

/// Round to cents, halves away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
