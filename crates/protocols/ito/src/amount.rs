//! Amount parsing and formatting
//!
//! Token amounts travel in two shapes:
//! - smallest units: the integer-valued amount a contract sees (`1 DAI = 10^18`)
//! - display units: what a user types or reads (`"1.5"`)
//!
//! Everything here is exact decimal arithmetic; nothing passes through `f64`.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use ito_core::ProtocolError;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer};

use crate::constants::{MAX_AMOUNT_BITS, MAX_AMOUNT_EXPONENT, MAX_AMOUNT_SCALE};

/// `10^exp` as a big integer
fn pow10_int(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

/// `10^decimals` as an exact decimal
pub fn pow10(decimals: u32) -> BigDecimal {
    BigDecimal::new(pow10_int(decimals), 0)
}

/// Refuse amounts whose exponent, scale or digit count is out of range.
///
/// Scientific notation parses cheaply but `1e2000000` would expand into a
/// multi-megabit integer on the first multiplication.
pub fn check_magnitude(value: &BigDecimal) -> Result<(), ProtocolError> {
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale < -MAX_AMOUNT_EXPONENT || scale > MAX_AMOUNT_SCALE || digits.bits() > MAX_AMOUNT_BITS {
        return Err(ProtocolError::InvalidAmount {
            message: format!(
                "amount out of range (scale {}, {} bits)",
                scale,
                digits.bits()
            ),
        });
    }
    Ok(())
}

/// Serde `deserialize_with` for externally supplied amounts
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = BigDecimal::deserialize(deserializer)?;
    check_magnitude(&value).map_err(serde::de::Error::custom)?;
    Ok(value)
}

/// Drop trailing fractional zeros, keeping the value an integer-scaled decimal
pub fn trim_zeros(value: BigDecimal) -> BigDecimal {
    let normalized = value.normalized();
    if normalized.as_bigint_and_exponent().1 < 0 {
        normalized.with_scale(0)
    } else {
        normalized
    }
}

/// Divide two decimals, rounding half away from zero at `scale` fractional digits.
///
/// Works on the underlying integers so the result does not depend on the
/// decimal library's default division precision.
pub fn div_round(
    numer: &BigDecimal,
    denom: &BigDecimal,
    scale: i64,
) -> Result<BigDecimal, ProtocolError> {
    if denom.is_zero() {
        return Err(ProtocolError::InvalidAmount {
            message: "division by zero".to_string(),
        });
    }

    let (mut n, n_exp) = numer.as_bigint_and_exponent();
    let (mut d, d_exp) = denom.as_bigint_and_exponent();

    // numer / denom = (n / d) * 10^(d_exp - n_exp); scale the quotient up by 10^scale
    let shift = d_exp - n_exp + scale;
    let shift_digits = u32::try_from(shift.unsigned_abs()).map_err(|_| {
        ProtocolError::InvalidAmount {
            message: format!("exponent out of range: {}", shift),
        }
    })?;
    if shift >= 0 {
        n *= pow10_int(shift_digits);
    } else {
        d *= pow10_int(shift_digits);
    }

    let negative = (n.sign() == Sign::Minus) != (d.sign() == Sign::Minus);
    let (n, d) = (n.abs(), d.abs());

    let mut q = &n / &d;
    let r = &n % &d;
    if r * 2u32 >= d {
        q += 1u32;
    }
    if negative {
        q = -q;
    }

    Ok(BigDecimal::new(q, scale))
}

/// Integer part of a decimal, truncated toward zero
pub fn truncate_to_integer(value: &BigDecimal) -> Result<BigInt, ProtocolError> {
    let (n, exp) = value.as_bigint_and_exponent();
    let digits = u32::try_from(exp.unsigned_abs()).map_err(|_| ProtocolError::InvalidAmount {
        message: format!("exponent out of range: {}", exp),
    })?;
    if exp <= 0 {
        Ok(n * pow10_int(digits))
    } else {
        Ok(n / pow10_int(digits))
    }
}

/// Parse a non-negative decimal typed by a user (display units).
pub fn parse_display_amount(text: &str) -> Result<BigDecimal, ProtocolError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::InvalidAmount {
            message: "amount is empty".to_string(),
        });
    }

    let value = BigDecimal::from_str(trimmed).map_err(|e| ProtocolError::InvalidAmount {
        message: format!("'{}' is not a decimal number: {}", trimmed, e),
    })?;
    check_magnitude(&value)?;

    if value < BigDecimal::zero() {
        return Err(ProtocolError::InvalidAmount {
            message: format!("'{}' is negative", trimmed),
        });
    }

    Ok(value)
}

/// Parse a smallest-unit balance as reported by the balance source.
///
/// A balance that has not loaded yet arrives as an empty string and counts as zero.
pub fn parse_balance(text: &str) -> Result<BigDecimal, ProtocolError> {
    if text.trim().is_empty() {
        return Ok(BigDecimal::zero());
    }
    parse_display_amount(text)
}

/// Convert display text to smallest units: `text * 10^decimals`.
pub fn to_smallest_unit(text: &str, decimals: u32) -> Result<BigDecimal, ProtocolError> {
    Ok(parse_display_amount(text)? * pow10(decimals))
}

/// Render a smallest-unit amount as display text.
///
/// The fraction keeps its leading zeros plus at most `significant`
/// significant digits (at least one); the rest is truncated and trailing
/// zeros are trimmed. Any sub-unit remainder of `raw` is dropped.
///
/// ```ignore
/// format_balance(&"1234500".parse()?, 6, 6) == "1.2345"
/// format_balance(&"1234500".parse()?, 6, 2) == "1.23"
/// format_balance(&"5000".parse()?, 6, 2)    == "0.005"
/// ```
pub fn format_balance(raw: &BigDecimal, decimals: u32, significant: u32) -> String {
    let units = match truncate_to_integer(raw) {
        Ok(units) => units,
        Err(e) => {
            tracing::warn!(error = %e, "Amount cannot be formatted");
            return raw.to_string();
        }
    };
    let negative = units.sign() == Sign::Minus;
    let units = units.abs();

    let base = pow10_int(decimals);
    let whole = &units / &base;
    let remainder = &units % &base;

    let mut fraction = String::new();
    if !remainder.is_zero() {
        let digits = remainder.to_string();
        let padded = "0".repeat((decimals as usize).saturating_sub(digits.len())) + &digits;
        if let Some(first_significant) = padded.find(|c: char| c != '0') {
            let keep = first_significant + significant.max(1) as usize;
            fraction = padded.chars().take(keep).collect();
            let trimmed_len = fraction.trim_end_matches('0').len();
            fraction.truncate(trimmed_len);
        }
    }

    let mut text = whole.to_string();
    if !fraction.is_empty() {
        text.push('.');
        text.push_str(&fraction);
    }
    if negative && text != "0" {
        text.insert(0, '-');
    }
    text
}

/// `format_balance` showing every digit the token supports
pub fn format_full(raw: &BigDecimal, decimals: u32) -> String {
    format_balance(raw, decimals, decimals)
}
