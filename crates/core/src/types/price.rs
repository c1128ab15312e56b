//! Unit price coercion using decimal arithmetic.
//!
//! Backend responses carry prices as JSON numbers, numeric strings, or not at
//! all. Everything that is not a non-negative finite decimal collapses to
//! zero so cart arithmetic never sees a negative or missing price.
//!
//! Accepted prices are snapped to the nearest value a JSON number (`f64`)
//! can carry, so a cart written out and read back holds the same prices.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// Largest accepted unit price (10^15). Larger values coerce to zero.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Coerce a JSON value into a non-negative unit price.
///
/// - Numbers are converted through their decimal rendering, so `19.99` stays
///   exactly `19.99`.
/// - Strings are trimmed and may carry a leading `$`.
/// - Anything else (null, booleans, objects, unparseable text, negatives,
///   values above [`MAX_PRICE`]) becomes zero.
#[must_use]
pub fn coerce_price(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim().trim_start_matches('$').trim()),
        _ => None,
    };

    parsed
        .filter(|price| price.is_sign_positive() && *price <= MAX_PRICE)
        .and_then(snap_to_f64)
        .unwrap_or(Decimal::ZERO)
}

/// The decimal spelled by the shortest `f64` rendering of `price`.
fn snap_to_f64(price: Decimal) -> Option<Decimal> {
    let float = price.to_f64()?;
    parse_decimal(&float.to_string()).map(|snapped| snapped.normalize())
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Format an amount for display (e.g., `$19.99`).
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_numbers_keep_their_decimal_value() {
        assert_eq!(coerce_price(&json!(19.99)), Decimal::new(1999, 2));
        assert_eq!(coerce_price(&json!(5)), Decimal::new(5, 0));
    }

    #[test]
    fn test_numeric_strings_parse() {
        assert_eq!(coerce_price(&json!("19.99")), Decimal::new(1999, 2));
        assert_eq!(coerce_price(&json!("  $7.50 ")), Decimal::new(75, 1));
        assert_eq!(coerce_price(&json!("1e2")), Decimal::new(100, 0));
    }

    #[test]
    fn test_garbage_becomes_zero() {
        assert_eq!(coerce_price(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_price(&json!("")), Decimal::ZERO);
        assert_eq!(coerce_price(&json!("free")), Decimal::ZERO);
        assert_eq!(coerce_price(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_price(&json!({"amount": 3})), Decimal::ZERO);
    }

    #[test]
    fn test_negative_prices_clamp_to_zero() {
        assert_eq!(coerce_price(&json!(-4.25)), Decimal::ZERO);
        assert_eq!(coerce_price(&json!("-1")), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_prices_become_zero() {
        assert_eq!(coerce_price(&json!("79228162514264337593543950335")), Decimal::ZERO);
        assert_eq!(coerce_price(&json!("1000000000000001")), Decimal::ZERO);
        assert_eq!(coerce_price(&json!("1000000000000000")), MAX_PRICE);
        assert_eq!(MAX_PRICE, Decimal::from(1_000_000_000_000_000_u64));
    }

    #[test]
    fn test_excess_precision_snaps_to_json_number() {
        let price = coerce_price(&json!("0.12345678901234567891"));
        assert_eq!(price.to_string(), "0.12345678901234568");
        assert_eq!(coerce_price(&json!(price.to_f64().unwrap())), price);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(3998, 2)), "$39.98");
        assert_eq!(format_price(Decimal::new(5, 0)), "$5.00");
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }
}
