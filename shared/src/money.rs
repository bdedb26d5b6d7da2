//! Monetary amount helpers
//!
//! The store backend serializes decimal columns either as JSON numbers or as
//! numeric strings (`"19.99"`). Every inbound amount goes through
//! [`deserialize_amount`] so that callers only ever see `f64`.
//!
//! Arithmetic on amounts stays in unrounded `f64`. Rounding to cents happens
//! at display time ([`format_amount`]) or when a caller explicitly asks for
//! it ([`round_cents`]), using `rust_decimal` half-up rounding.

use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, de};

/// Rounding precision for monetary values (cents)
const DECIMAL_PLACES: u32 = 2;

/// Raw wire shape of an amount before coercion
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Parse a numeric-looking string into an amount.
///
/// Surrounding whitespace is ignored. Returns `None` for empty, non-numeric
/// or non-finite input.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

fn coerce<E: de::Error>(raw: RawAmount) -> Result<f64, E> {
    match raw {
        RawAmount::Number(n) if n.is_finite() => Ok(n),
        RawAmount::Number(n) => Err(E::custom(format!("amount must be finite, got {n}"))),
        RawAmount::Text(s) => parse_amount(&s)
            .ok_or_else(|| E::custom(format!("invalid amount string: {s:?}"))),
    }
}

/// Deserialize an amount that may arrive as a number or a numeric string.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    coerce(RawAmount::deserialize(deserializer)?)
}

/// Optional variant of [`deserialize_amount`]; `null` maps to `None`.
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawAmount>::deserialize(deserializer)?
        .map(coerce)
        .transpose()
}

/// Deserialize an integer counter that may arrive as a number or a string.
///
/// Aggregates computed with SQL `COUNT`/`SUM` frequently come back as
/// strings. Fractional values are rejected.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = coerce::<D::Error>(RawAmount::deserialize(deserializer)?)?;
    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(de::Error::custom(format!(
            "expected an integer count, got {value}"
        )));
    }
    Ok(value as i64)
}

/// Convert f64 to Decimal for exact rounding.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round an amount to cents, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    to_decimal(value)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Format an amount for display with two decimals, rounding half-up.
pub fn format_amount(value: f64) -> String {
    let rounded =
        to_decimal(value).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "deserialize_amount")]
        price: f64,
        #[serde(default, deserialize_with = "deserialize_optional_amount")]
        discount: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_count")]
        stock: i64,
    }

    #[test]
    fn test_amount_from_number_and_string() {
        let p: Priced = serde_json::from_str(r#"{"price": 19.99}"#).unwrap();
        assert_eq!(p.price, 19.99);

        let p: Priced = serde_json::from_str(r#"{"price": "19.99"}"#).unwrap();
        assert_eq!(p.price, 19.99);

        let p: Priced = serde_json::from_str(r#"{"price": 5}"#).unwrap();
        assert_eq!(p.price, 5.0);

        let p: Priced = serde_json::from_str(r#"{"price": " 7.50 "}"#).unwrap();
        assert_eq!(p.price, 7.5);
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert!(serde_json::from_str::<Priced>(r#"{"price": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": ""}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": "NaN"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": true}"#).is_err());
    }

    #[test]
    fn test_optional_amount() {
        let p: Priced = serde_json::from_str(r#"{"price": 1, "discount": null}"#).unwrap();
        assert_eq!(p.discount, None);

        let p: Priced = serde_json::from_str(r#"{"price": 1, "discount": "0.25"}"#).unwrap();
        assert_eq!(p.discount, Some(0.25));

        let p: Priced = serde_json::from_str(r#"{"price": 1}"#).unwrap();
        assert_eq!(p.discount, None);
    }

    #[test]
    fn test_count_coercion() {
        let p: Priced = serde_json::from_str(r#"{"price": 1, "stock": "12"}"#).unwrap();
        assert_eq!(p.stock, 12);

        let p: Priced = serde_json::from_str(r#"{"price": 1, "stock": 3}"#).unwrap();
        assert_eq!(p.stock, 3);

        assert!(serde_json::from_str::<Priced>(r#"{"price": 1, "stock": "1.5"}"#).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("10"), Some(10.0));
        assert_eq!(parse_amount("  3.25"), Some(3.25));
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("12,50"), None);
    }

    #[test]
    fn test_format_amount_half_up() {
        assert_eq!(format_amount(4.08), "4.08");
        assert_eq!(format_amount(25.5), "25.50");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(25.5 * 0.16 + 25.5), "29.58");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(3.333), 3.33);
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(-0.125), -0.13);
    }
}
