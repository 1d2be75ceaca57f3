//! Quantity arithmetic.
//!
//! Decimal values reach us either as JSON numbers or as decimal-formatted
//! text (`"10.50"`). Everything funnels through [`to_number`], which never
//! fails: absent or unparsable input is zero.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::types::TransactionType;

const MAX_SCALE: u32 = 28;

/// Converts a wire value (number or decimal text) into a [`Decimal`].
///
/// `null`, booleans, arrays, objects and text without a numeric prefix all
/// yield zero.
pub fn to_number(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => Decimal::ZERO,
    }
}

/// Parses decimal text leniently.
///
/// Surrounding whitespace is ignored and only the leading numeric part is
/// read, so `"12.5kg"` is `12.5`. Exponent notation is accepted. Digits past
/// the 28th decimal place are truncated, so `"1.5e-30"` is zero and
/// `"1.23e-27"` keeps its leading `1`. Anything without a leading number, or
/// too large to represent, is zero.
pub fn parse_decimal(text: &str) -> Decimal {
    let Some(literal) = numeric_prefix(text.trim()) else {
        return Decimal::ZERO;
    };

    let (mantissa, exponent) = match literal.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()),
        None => (literal.as_str(), Some(0)),
    };

    exponent
        .and_then(|exponent| shift(fit_mantissa(mantissa)?, exponent))
        .unwrap_or(Decimal::ZERO)
}

/// Parses `[-]int[.frac]`, dropping trailing fraction digits until the
/// value fits a [`Decimal`].
fn fit_mantissa(mantissa: &str) -> Option<Decimal> {
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mut keep = frac.len().min(MAX_SCALE as usize);
    loop {
        let candidate = if keep == 0 {
            Decimal::from_str(int)
        } else {
            Decimal::from_str(&format!("{int}.{}", &frac[..keep]))
        };
        match candidate {
            Ok(value) => return Some(value),
            Err(_) if keep > 0 => keep -= 1,
            Err(_) => return None,
        }
    }
}

/// Multiplies `value` by `10^exponent`, truncating below the smallest
/// representable scale.
fn shift(value: Decimal, exponent: i64) -> Option<Decimal> {
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    if exponent >= 0 {
        return (0..exponent).try_fold(value, |acc, _| acc.checked_mul(Decimal::TEN));
    }

    let places = exponent.unsigned_abs();
    if places > u64::from(MAX_SCALE) {
        return Some(Decimal::ZERO);
    }
    let places = places as u32;
    let mut shifted =
        value.round_dp_with_strategy(MAX_SCALE - places, RoundingStrategy::ToZero);
    shifted.set_scale(shifted.scale() + places).ok()?;
    Some(shifted)
}

/// Returns the stock delta a transaction of `transaction_type` applies.
pub fn signed_delta(transaction_type: TransactionType, quantity: Decimal) -> Decimal {
    match transaction_type {
        TransactionType::Expense => quantity,
        TransactionType::Earning => -quantity,
        TransactionType::Capital => Decimal::ZERO,
    }
}

/// Extracts the leading `[sign] digits [. digits] [e [sign] digits]` run,
/// rewritten into a form the decimal parser accepts.
fn numeric_prefix(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut end = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_part = &s[int_start..end];

    let mut frac_part = "";
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_part = &s[frac_start..frac_end];
        end = frac_end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut exponent = String::new();
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        let mut exp_sign = "";
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            if bytes[exp_end] == b'-' {
                exp_sign = "-";
            }
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            exponent = format!("e{exp_sign}{}", &s[digits_start..exp_end]);
        }
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let mut literal = String::with_capacity(s.len() + 1);
    if negative {
        literal.push('-');
    }
    literal.push_str(int_part);
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }
    literal.push_str(&exponent);
    Some(literal)
}

/// Serde field adapters that decode decimals through [`to_number`].
///
/// ```ignore
/// #[serde(default, deserialize_with = "common::lenient::deserialize")]
/// quantity: Decimal,
/// ```
pub mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Decodes a required decimal; `null` is zero.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(super::to_number).unwrap_or(Decimal::ZERO))
    }

    /// Decodes an optional decimal; `null` stays `None`.
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Option::<Value>::deserialize(deserializer)?;
            Ok(match value {
                None | Some(Value::Null) => None,
                Some(v) => Some(super::super::to_number(&v)),
            })
        }
    }
}
