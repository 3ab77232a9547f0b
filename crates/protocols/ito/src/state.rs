//! ITO claim state types
//!
//! Payload and token descriptions supplied by the ITO, the per-dialog claim
//! session state, and the derived preview handed to the front end.

use std::collections::HashSet;

use bigdecimal::BigDecimal;
use ito_core::constants::{ETHER_DECIMALS, MAX_TOKEN_DECIMALS};
use ito_core::{ProtocolError, TokenAddress};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::amount::{check_magnitude, deserialize_amount, parse_display_amount};
use crate::approval::{ApproveState, ClaimAction};
use crate::calculator::{resolve, Ratio};
use crate::validate::ValidationOutcome;

/// Token standard, which decides whether a claim needs an allowance first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Ether,
    Erc20,
}

/// Token metadata from the token catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: TokenAddress,
    pub decimals: u32,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl Token {
    /// Decimals used for unit conversion. The native currency is always 18.
    pub fn unit_decimals(&self) -> u32 {
        match self.kind {
            TokenKind::Ether => ETHER_DECIMALS,
            TokenKind::Erc20 => self.decimals,
        }
    }

    /// Whether spending this token through the ITO contract needs an allowance
    pub fn needs_allowance(&self) -> bool {
        match self.kind {
            TokenKind::Ether => false,
            TokenKind::Erc20 => true,
        }
    }

    pub fn is_same(&self, address: &TokenAddress) -> bool {
        &self.address == address
    }

    fn check(&self) -> Result<(), ProtocolError> {
        self.address.check_format()?;
        if self.decimals > MAX_TOKEN_DECIMALS {
            return Err(ProtocolError::InvalidToken {
                address: self.address.to_string(),
                reason: format!("decimals {} exceeds {}", self.decimals, MAX_TOKEN_DECIMALS),
            });
        }
        Ok(())
    }
}

/// Exchange configuration of one ITO, as shared in the ITO payload.
///
/// `exchange_amounts` holds one `(numerator, denominator)` pair per entry of
/// `exchange_tokens`, flattened: `[n0, d0, n1, d1, ...]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangePayload {
    #[serde(default)]
    pub pid: String,
    #[serde(default)]
    pub password: String,
    pub exchange_tokens: Vec<Token>,
    pub exchange_amounts: Vec<String>,
    /// The offered token being claimed
    pub token: Token,
}

impl ExchangePayload {
    /// Check the structural invariants of the payload
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.exchange_tokens.is_empty() {
            return Err(ProtocolError::InvalidPayload {
                reason: "no exchange tokens".to_string(),
            });
        }

        if self.exchange_amounts.len() != 2 * self.exchange_tokens.len() {
            return Err(ProtocolError::InvalidPayload {
                reason: format!(
                    "expected {} exchange amounts for {} tokens, got {}",
                    2 * self.exchange_tokens.len(),
                    self.exchange_tokens.len(),
                    self.exchange_amounts.len()
                ),
            });
        }

        let mut seen = HashSet::new();
        for token in &self.exchange_tokens {
            token.check()?;
            if !seen.insert(token.address.clone()) {
                return Err(ProtocolError::InvalidPayload {
                    reason: format!("duplicate exchange token {}", token.address),
                });
            }
        }
        self.token.check()?;

        for index in 0..self.exchange_tokens.len() {
            self.amount_pair(index)?;
        }

        Ok(())
    }

    pub fn exchange_token(&self, index: usize) -> Result<&Token, ProtocolError> {
        self.exchange_tokens
            .get(index)
            .ok_or(ProtocolError::IndexOutOfRange {
                index,
                len: self.exchange_tokens.len(),
            })
    }

    /// Parsed `(numerator, denominator)` for the exchange token at `index`.
    /// Both must be positive.
    pub fn amount_pair(&self, index: usize) -> Result<(BigDecimal, BigDecimal), ProtocolError> {
        self.exchange_token(index)?;

        let parse = |slot: usize| -> Result<BigDecimal, ProtocolError> {
            let raw = self
                .exchange_amounts
                .get(slot)
                .ok_or_else(|| ProtocolError::InvalidPayload {
                    reason: format!("missing exchange amount #{}", slot),
                })?;
            let value = parse_display_amount(raw).map_err(|e| ProtocolError::InvalidPayload {
                reason: format!("exchange amount #{}: {}", slot, e),
            })?;
            if value.is_zero() {
                return Err(ProtocolError::InvalidPayload {
                    reason: format!("exchange amount #{} is zero", slot),
                });
            }
            Ok(value)
        };

        Ok((parse(2 * index)?, parse(2 * index + 1)?))
    }

    /// Index of an exchange token by address (case-insensitive)
    pub fn find_token(&self, address: &TokenAddress) -> Result<usize, ProtocolError> {
        self.exchange_tokens
            .iter()
            .position(|t| t.is_same(address))
            .ok_or_else(|| ProtocolError::TokenNotExchangeable {
                address: address.to_string(),
            })
    }
}

/// Lifecycle of a claim session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Editing,
    Claimed,
}

/// Mutable state of one claim dialog session.
///
/// `claim_amount` is in the selected exchange token's smallest units;
/// `pay_amount` is the paired amount bounded by the per-wallet swap limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimState {
    pub token_index: usize,
    pub exchange_token: Token,
    pub ratio: Ratio,
    #[serde(deserialize_with = "deserialize_amount")]
    pub claim_amount: BigDecimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub pay_amount: BigDecimal,
    /// Amount text shown in the input panel, in display units
    pub display_text: String,
    pub phase: SessionPhase,
}

impl ClaimState {
    pub fn is_claimed(&self) -> bool {
        self.phase == SessionPhase::Claimed
    }

    /// Check that a state handed back by a client belongs to `payload`: the
    /// payload itself is valid, and the selected token and ratio are the
    /// ones the payload defines at `token_index`.
    pub fn check(&self, payload: &ExchangePayload) -> Result<(), ProtocolError> {
        payload.validate()?;

        let expected = payload.exchange_token(self.token_index)?;
        if *expected != self.exchange_token {
            return Err(ProtocolError::InvalidPayload {
                reason: format!(
                    "session token {} is not exchange token #{} ({})",
                    self.exchange_token.address, self.token_index, expected.address
                ),
            });
        }

        if resolve(payload, self.token_index)? != self.ratio {
            return Err(ProtocolError::InvalidPayload {
                reason: format!(
                    "session ratio {} does not match exchange token #{}",
                    self.ratio.value(),
                    self.token_index
                ),
            });
        }

        check_magnitude(&self.claim_amount)?;
        check_magnitude(&self.pay_amount)?;
        Ok(())
    }
}

/// Inputs from external collaborators needed to render a preview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewInputs {
    /// Last known balance of the selected exchange token (smallest units)
    pub balance: String,
    /// Per-wallet swap limit
    #[serde(deserialize_with = "deserialize_amount")]
    pub max_pay: BigDecimal,
    pub account_connected: bool,
    pub chain_valid: bool,
    #[serde(default)]
    pub approve_state: ApproveState,
}

/// Everything the dialog renders for the current state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPreview {
    /// Ratio as a decimal, for display
    pub ratio: BigDecimal,
    pub claim_amount: BigDecimal,
    pub pay_amount: BigDecimal,
    pub display_text: String,
    /// Pay amount in the offered token's display units
    pub pay_display: String,
    pub validation: ValidationOutcome,
    pub message: Option<String>,
    pub approve_required: bool,
    pub action: ClaimAction,
    pub action_label: String,
    /// Slider position in percent of the swap limit
    pub slider_position: BigDecimal,
    /// Cap for the amount panel's max button (smallest units)
    pub max_claim_amount: BigDecimal,
    pub summary: String,
}
