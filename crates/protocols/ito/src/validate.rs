//! Claim amount validation

use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::calculator::{pay_from_claim, Ratio};
use crate::state::Token;

/// Result of checking a claim amount. Not an error: every variant is a state
/// the dialog renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationOutcome {
    Valid,
    ZeroAmount,
    InsufficientBalance { symbol: String },
    ExceedsSwapLimit,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// User-facing message, `None` when the claim can proceed
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::ZeroAmount => Some("Enter an amount".to_string()),
            Self::InsufficientBalance { symbol } => Some(format!("Insufficient {} balance", symbol)),
            Self::ExceedsSwapLimit => Some("Swap amount exceeds the wallet limit".to_string()),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::ZeroAmount => "zero_amount",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::ExceedsSwapLimit => "exceeds_swap_limit",
        }
    }
}

/// Check a claim amount against the balance of the selected exchange token
/// and the per-wallet swap limit. Rules are checked in order, first match wins.
pub fn validate(
    claim_amount: &BigDecimal,
    balance: &BigDecimal,
    ratio: &Ratio,
    max_pay: &BigDecimal,
    exchange_token: &Token,
) -> ValidationOutcome {
    if claim_amount.is_zero() {
        return ValidationOutcome::ZeroAmount;
    }

    if claim_amount > balance {
        return ValidationOutcome::InsufficientBalance {
            symbol: exchange_token.symbol.clone(),
        };
    }

    if pay_from_claim(claim_amount, ratio) > *max_pay {
        return ValidationOutcome::ExceedsSwapLimit;
    }

    ValidationOutcome::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::{token, DAI};
    use crate::state::TokenKind;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn dai() -> Token {
        token(DAI, "DAI", 18, TokenKind::Erc20)
    }

    fn three() -> Ratio {
        Ratio::new(dec("3"), dec("1")).unwrap()
    }

    #[test]
    fn test_zero_amount_wins_regardless_of_inputs() {
        let outcome = validate(&dec("0"), &dec("0"), &three(), &dec("0"), &dai());
        assert_eq!(outcome, ValidationOutcome::ZeroAmount);

        let outcome = validate(&dec("0"), &dec("1000"), &three(), &dec("1"), &dai());
        assert_eq!(outcome, ValidationOutcome::ZeroAmount);
    }

    #[test]
    fn test_insufficient_balance_scenario() {
        let outcome = validate(&dec("100"), &dec("50"), &three(), &dec("1000"), &dai());
        assert_eq!(
            outcome,
            ValidationOutcome::InsufficientBalance {
                symbol: "DAI".to_string()
            }
        );
        assert_eq!(outcome.message().unwrap(), "Insufficient DAI balance");
    }

    #[test]
    fn test_balance_checked_before_swap_limit() {
        // over balance and over limit at once
        let outcome = validate(&dec("100"), &dec("50"), &three(), &dec("1"), &dai());
        assert_eq!(outcome.code(), "insufficient_balance");
    }

    #[test]
    fn test_exceeds_swap_limit() {
        // 301 / 3 > 100
        let outcome = validate(&dec("301"), &dec("1000"), &three(), &dec("100"), &dai());
        assert_eq!(outcome, ValidationOutcome::ExceedsSwapLimit);
    }

    #[test]
    fn test_valid_at_exact_limit() {
        let outcome = validate(&dec("300"), &dec("300"), &three(), &dec("100"), &dai());
        assert!(outcome.is_valid());
        assert_eq!(outcome.message(), None);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&ValidationOutcome::InsufficientBalance {
            symbol: "ETH".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"insufficientBalance","symbol":"ETH"}"#);
    }
}
