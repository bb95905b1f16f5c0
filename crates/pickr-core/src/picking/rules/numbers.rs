//! Numbers written with a comma decimal separator and dot thousands.
//!
//! Input contract: an optional leading `-`, digits, any number of `.`
//! thousands separators and at most one `,` followed by the fractional
//! digits. Dots are always thousands separators, so `3.228` is 3228.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::LOCALE_NUMBER;

/// Parse a locale-formatted number (`"3.228,50"` -> `3228.50`).
///
/// Returns `None` for anything outside the input contract.
pub fn parse_locale_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if !LOCALE_NUMBER.is_match(s) {
        return None;
    }

    let normalized = s.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Format a quantity: whole numbers without decimals, otherwise two.
pub fn format_quantity(value: Decimal) -> String {
    if value.fract().is_zero() {
        value.trunc().normalize().to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// Format a stock level rounded to a whole number.
pub fn format_stock(value: Decimal) -> String {
    value.round_dp(0).normalize().to_string()
}
