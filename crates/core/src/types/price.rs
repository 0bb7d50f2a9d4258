//! Decimal price parsing and display.
//!
//! The shop API is loose about prices: some products carry a JSON number,
//! others a numeric string, some nothing at all. Everything is normalised to
//! `rust_decimal::Decimal` so cart totals never accumulate float error.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Parse a price from a JSON value.
///
/// Accepts numbers and numeric strings. Numbers are converted through their
/// decimal text form, so `19.99` becomes exactly `19.99`. Returns `None` for
/// anything non-numeric.
#[must_use]
pub fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_text(&n.to_string()),
        Value::String(s) => parse_decimal_text(s.trim()),
        _ => None,
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Format a price for display (e.g., "19.90").
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_from_number() {
        assert_eq!(parse_price(&json!(19.99)), Decimal::from_str("19.99").ok());
        assert_eq!(parse_price(&json!(5)), Some(Decimal::from(5)));
    }

    #[test]
    fn test_parse_price_from_string() {
        assert_eq!(parse_price(&json!(" 49.90 ")), Decimal::from_str("49.90").ok());
    }

    #[test]
    fn test_parse_price_rejects_non_numeric() {
        assert_eq!(parse_price(&json!("free")), None);
        assert_eq!(parse_price(&json!(null)), None);
        assert_eq!(parse_price(&json!({"amount": 1})), None);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::from(3)), "3.00");
        assert_eq!(format_price(Decimal::from_str("2.5").unwrap_or_default()), "2.50");
    }
}
