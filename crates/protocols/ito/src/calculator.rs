//! ITO Claim Calculator
//!
//! Pure math for exchange ratios and claim/pay amount conversion. No I/O.
//!
//! # Units
//!
//! - claim amount: smallest units of the selected exchange token
//! - pay amount: `claim / ratio`, bounded by the per-wallet swap limit
//! - ratio: `exchange_amounts[2i] / exchange_amounts[2i + 1]`, kept as an
//!   exact numerator/denominator pair
//!
//! Divisions keep `DIVISION_SCALE` fractional digits; amounts multiplied by a
//! ratio are rounded to `AMOUNT_SCALE`, which makes a divide-then-multiply
//! round trip exact for any amount with at most `AMOUNT_SCALE` fractional
//! digits.

use bigdecimal::BigDecimal;
use ito_core::{ProtocolError, SliderOverflow};
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::amount::{check_magnitude, div_round, format_full, to_smallest_unit, trim_zeros};
use crate::constants::{AMOUNT_SCALE, DIVISION_SCALE, SLIDER_MAX};
use crate::state::ExchangePayload;

/// Exchange ratio between the selected exchange token and the offered token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RatioParts", into = "RatioParts")]
pub struct Ratio {
    numerator: BigDecimal,
    denominator: BigDecimal,
}

#[derive(Serialize, Deserialize)]
struct RatioParts {
    numerator: BigDecimal,
    denominator: BigDecimal,
}

impl TryFrom<RatioParts> for Ratio {
    type Error = ProtocolError;

    fn try_from(parts: RatioParts) -> Result<Self, Self::Error> {
        Ratio::new(parts.numerator, parts.denominator)
    }
}

impl From<Ratio> for RatioParts {
    fn from(ratio: Ratio) -> Self {
        RatioParts {
            numerator: ratio.numerator,
            denominator: ratio.denominator,
        }
    }
}

impl Ratio {
    /// Both sides must be positive.
    pub fn new(numerator: BigDecimal, denominator: BigDecimal) -> Result<Self, ProtocolError> {
        check_magnitude(&numerator)?;
        check_magnitude(&denominator)?;
        if numerator <= BigDecimal::zero() || denominator <= BigDecimal::zero() {
            return Err(ProtocolError::InvalidAmount {
                message: format!(
                    "ratio {}/{} must be positive on both sides",
                    numerator, denominator
                ),
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> &BigDecimal {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigDecimal {
        &self.denominator
    }

    /// Decimal value, rounded to `DIVISION_SCALE` digits
    pub fn value(&self) -> BigDecimal {
        // denominator is positive by construction
        trim_zeros(
            div_round(&self.numerator, &self.denominator, DIVISION_SCALE)
                .unwrap_or_else(|_| BigDecimal::zero()),
        )
    }
}

/// Ratios compare as rationals: `a/b == c/d` iff `a*d == c*b`.
impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        &self.numerator * &other.denominator == &other.numerator * &self.denominator
    }
}

/// A recomputed `(claim, pay, display text)` triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountUpdate {
    pub claim_amount: BigDecimal,
    pub pay_amount: BigDecimal,
    pub display_text: String,
}

/// Exchange ratio for the exchange token at `token_index`.
pub fn resolve(payload: &ExchangePayload, token_index: usize) -> Result<Ratio, ProtocolError> {
    let (numerator, denominator) = payload.amount_pair(token_index)?;
    Ratio::new(numerator, denominator)
}

/// `pay * numerator / denominator`
pub fn claim_from_pay(pay_amount: &BigDecimal, ratio: &Ratio) -> BigDecimal {
    trim_zeros(
        div_round(
            &(pay_amount * &ratio.numerator),
            &ratio.denominator,
            AMOUNT_SCALE,
        )
        .unwrap_or_else(|_| BigDecimal::zero()),
    )
}

/// `claim * denominator / numerator`
pub fn pay_from_claim(claim_amount: &BigDecimal, ratio: &Ratio) -> BigDecimal {
    trim_zeros(
        div_round(
            &(claim_amount * &ratio.denominator),
            &ratio.numerator,
            DIVISION_SCALE,
        )
        .unwrap_or_else(|_| BigDecimal::zero()),
    )
}

/// Amounts for text typed into the amount panel.
///
/// The text is in display units of the exchange token. Empty or unparsable
/// text counts as zero; the text itself is kept as typed.
pub fn pay_from_claim_text(text: &str, ratio: &Ratio, exchange_decimals: u32) -> AmountUpdate {
    let claim_amount = if text.trim().is_empty() {
        BigDecimal::zero()
    } else {
        match to_smallest_unit(text, exchange_decimals) {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(text, error = %e, "Unparsable claim amount, treating as zero");
                BigDecimal::zero()
            }
        }
    };

    AmountUpdate {
        pay_amount: pay_from_claim(&claim_amount, ratio),
        claim_amount,
        display_text: text.to_string(),
    }
}

/// Amounts for a slider position (`fraction` in percent of `max_pay`).
///
/// The claim amount is first rendered at the exchange token's display
/// precision and the pay amount is re-derived from that text, so the
/// submitted amounts always match what the panel shows. Returns `Ok(None)`
/// when the re-derived pay amount exceeds `max_pay` and the update is
/// rejected.
pub fn pay_from_slider_fraction(
    fraction: &BigDecimal,
    max_pay: &BigDecimal,
    ratio: &Ratio,
    exchange_decimals: u32,
) -> Result<Option<AmountUpdate>, ProtocolError> {
    pay_from_slider_fraction_with(
        fraction,
        max_pay,
        ratio,
        exchange_decimals,
        SliderOverflow::Reject,
    )
}

/// `pay_from_slider_fraction` with an explicit overflow policy
pub fn pay_from_slider_fraction_with(
    fraction: &BigDecimal,
    max_pay: &BigDecimal,
    ratio: &Ratio,
    exchange_decimals: u32,
    overflow: SliderOverflow,
) -> Result<Option<AmountUpdate>, ProtocolError> {
    check_magnitude(fraction)?;
    check_magnitude(max_pay)?;

    let slider_max = BigDecimal::from(SLIDER_MAX);
    if *fraction < BigDecimal::zero() || *fraction > slider_max {
        return Err(ProtocolError::InvalidAmount {
            message: format!("slider fraction {} outside 0..={}", fraction, SLIDER_MAX),
        });
    }

    // max_pay * fraction / 100, exact
    let raw_pay = max_pay * fraction * &BigDecimal::new(BigInt::from(1), 2);
    let raw_claim = claim_from_pay(&raw_pay, ratio);

    let display_text = format_full(&raw_claim, exchange_decimals);
    let claim_amount = to_smallest_unit(&display_text, exchange_decimals)?;
    let candidate = AmountUpdate {
        pay_amount: pay_from_claim(&claim_amount, ratio),
        claim_amount,
        display_text,
    };

    Ok(bound_slider_update(
        candidate,
        max_pay,
        ratio,
        exchange_decimals,
        overflow,
    ))
}

/// Apply the overflow policy to a slider-derived update.
pub fn bound_slider_update(
    candidate: AmountUpdate,
    max_pay: &BigDecimal,
    ratio: &Ratio,
    exchange_decimals: u32,
    overflow: SliderOverflow,
) -> Option<AmountUpdate> {
    if candidate.pay_amount <= *max_pay {
        return Some(candidate);
    }

    match overflow {
        SliderOverflow::Reject => {
            tracing::warn!(
                pay = %candidate.pay_amount,
                max_pay = %max_pay,
                "Slider update exceeds swap limit after rounding, rejected"
            );
            None
        }
        SliderOverflow::Clamp => {
            let claim_amount = claim_from_pay(max_pay, ratio);
            tracing::debug!(max_pay = %max_pay, "Slider update clamped to swap limit");
            Some(AmountUpdate {
                display_text: format_full(&claim_amount, exchange_decimals),
                claim_amount,
                pay_amount: max_pay.clone(),
            })
        }
    }
}

/// Slider position for a pay amount, in percent of `max_pay`, capped at 100.
pub fn slider_position(pay_amount: &BigDecimal, max_pay: &BigDecimal) -> BigDecimal {
    if max_pay.is_zero() {
        return BigDecimal::zero();
    }
    let position = div_round(&(pay_amount * &BigDecimal::from(SLIDER_MAX)), max_pay, 4)
        .unwrap_or_else(|_| BigDecimal::zero());
    trim_zeros(position.min(BigDecimal::from(SLIDER_MAX)))
}

/// Largest claim amount the amount panel offers: the swap limit converted at
/// the ratio, capped by the balance.
pub fn max_claim_amount(max_pay: &BigDecimal, ratio: &Ratio, balance: &BigDecimal) -> BigDecimal {
    claim_from_pay(max_pay, ratio).min(balance.clone())
}
