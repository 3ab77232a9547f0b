//! Claim transaction request and outcome
//!
//! The claim itself is submitted by an external transaction service. This
//! module builds what is handed to it and interprets the states it reports
//! back; only a receipt or confirmation ends the session.

use bigdecimal::BigDecimal;
use ito_core::ProtocolError;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::amount::{format_full, truncate_to_integer};
use crate::constants::SUMMARY_VERB;
use crate::state::{ClaimState, ExchangePayload, Token};

/// States reported by the claim transaction service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClaimTxState {
    Unknown,
    WaitForConfirming,
    Hash {
        hash: String,
    },
    /// Mined; `to_value` comes from the `SwapSuccess` event
    Receipt {
        #[serde(default)]
        to_value: Option<String>,
    },
    Confirmed {
        #[serde(default)]
        to_value: Option<String>,
    },
    Failed {
        message: String,
    },
}

impl ClaimTxState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Receipt { .. } | Self::Confirmed { .. })
    }
}

/// Completion signal returned when a claim settles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutcome {
    /// Offered tokens actually received, if the receipt reported it
    pub actual_swap_amount: Option<BigDecimal>,
    pub offered_token: Token,
    /// The caller should add the offered token to the wallet's token list
    pub track_token: bool,
}

/// Interpret a transaction state. `None` unless the claim has settled.
pub fn claim_outcome(tx: &ClaimTxState, offered_token: &Token) -> Option<ClaimOutcome> {
    let to_value = match tx {
        ClaimTxState::Receipt { to_value } | ClaimTxState::Confirmed { to_value } => to_value,
        _ => return None,
    };

    let actual_swap_amount = to_value.as_deref().and_then(|raw| match raw.parse::<BigDecimal>() {
        Ok(amount) => Some(amount),
        Err(e) => {
            tracing::warn!(raw, error = %e, "Unreadable swap amount in claim receipt");
            None
        }
    });

    Some(ClaimOutcome {
        actual_swap_amount,
        offered_token: offered_token.clone(),
        track_token: offered_token.needs_allowance(),
    })
}

/// Arguments for the claim contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub pid: String,
    pub password: String,
    /// Integer smallest units of the exchange token
    pub amount: String,
    pub exchange_token: Token,
}

/// Build the claim call for the current state.
///
/// The contract takes an integer amount, so a claim amount with a sub-unit
/// fraction is refused rather than rounded.
pub fn claim_request(
    payload: &ExchangePayload,
    state: &ClaimState,
) -> Result<ClaimRequest, ProtocolError> {
    state.check(payload)?;
    if state.is_claimed() {
        return Err(ProtocolError::SessionClosed);
    }

    let units = truncate_to_integer(&state.claim_amount)?;
    if BigDecimal::from(units.clone()) != state.claim_amount {
        return Err(ProtocolError::InvalidAmount {
            message: format!(
                "claim amount {} is not a whole number of {} units",
                state.claim_amount, state.exchange_token.symbol
            ),
        });
    }
    if units.is_zero() {
        return Err(ProtocolError::InvalidAmount {
            message: "claim amount is zero".to_string(),
        });
    }

    Ok(ClaimRequest {
        pid: payload.pid.clone(),
        password: payload.password.clone(),
        amount: units.to_string(),
        exchange_token: state.exchange_token.clone(),
    })
}

/// Summary line shown while the claim transaction is pending
pub fn transaction_summary(pay_amount: &BigDecimal, offered_token: &Token) -> String {
    format!(
        "{} {} {}",
        SUMMARY_VERB,
        format_full(pay_amount, offered_token.unit_decimals()),
        offered_token.symbol
    )
}
