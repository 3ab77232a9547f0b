//! Allowance handling and the claim button state

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::amount::format_balance;
use crate::state::Token;
use crate::validate::ValidationOutcome;

/// Allowance state reported by the external approval service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApproveState {
    #[default]
    Unknown,
    NotApproved,
    Updating,
    Pending,
    Approved,
}

/// How much allowance to grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApproveMode {
    /// Exactly the claim amount
    Exact,
    /// Unlimited allowance
    Infinite,
}

/// Request handed to the approval service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub token: Token,
    /// `None` for an unlimited allowance
    pub amount: Option<BigDecimal>,
    pub mode: ApproveMode,
}

/// Whether the approval step blocks the claim.
///
/// The native currency is sent with the call and never needs an allowance.
pub fn approve_required(token: &Token, state: ApproveState) -> bool {
    token.needs_allowance() && matches!(state, ApproveState::NotApproved | ApproveState::Pending)
}

/// Build an approval request. Only issued from `NotApproved`.
pub fn approval_request(
    token: &Token,
    claim_amount: &BigDecimal,
    state: ApproveState,
    mode: ApproveMode,
) -> Option<ApprovalRequest> {
    if state != ApproveState::NotApproved || !token.needs_allowance() {
        tracing::debug!(?state, symbol = %token.symbol, "Approval not requested");
        return None;
    }

    Some(ApprovalRequest {
        token: token.clone(),
        amount: match mode {
            ApproveMode::Exact => Some(claim_amount.clone()),
            ApproveMode::Infinite => None,
        },
        mode,
    })
}

/// What the dialog's action area offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClaimAction {
    /// Approval is in flight
    Unlocking { symbol: String },
    /// Exact or infinite approval choice
    Unlock { amount: String, symbol: String },
    ConnectWallet,
    InvalidNetwork,
    /// Claim disabled by a validation outcome
    Blocked { outcome: ValidationOutcome },
    Claim,
}

impl ClaimAction {
    pub fn label(&self) -> String {
        match self {
            Self::Unlocking { symbol } => format!("Unlocking {}…", symbol),
            Self::Unlock { amount, symbol } => format!("Unlock {} {}", amount, symbol),
            Self::ConnectWallet => "Connect a Wallet".to_string(),
            Self::InvalidNetwork => "Invalid Network".to_string(),
            Self::Blocked { outcome } => outcome.message().unwrap_or_default(),
            Self::Claim => "Swap".to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(
            self,
            Self::Unlocking { .. } | Self::InvalidNetwork | Self::Blocked { .. }
        )
    }
}

/// Wallet facts the action area depends on
#[derive(Debug, Clone, Copy)]
pub struct WalletStatus {
    pub account_connected: bool,
    pub chain_valid: bool,
    pub approve_state: ApproveState,
}

/// Pick the action for the current state.
///
/// Approval comes first, but only once the amount itself is valid. After
/// that: connect wallet, wrong network, validation message, claim.
pub fn claim_action(
    wallet: WalletStatus,
    exchange_token: &Token,
    claim_amount: &BigDecimal,
    validation: &ValidationOutcome,
    unlock_display_digits: u32,
) -> ClaimAction {
    let approving = approve_required(exchange_token, wallet.approve_state);

    if approving && validation.is_valid() {
        if wallet.approve_state == ApproveState::Pending {
            return ClaimAction::Unlocking {
                symbol: exchange_token.symbol.clone(),
            };
        }
        return ClaimAction::Unlock {
            amount: format_balance(
                claim_amount,
                exchange_token.unit_decimals(),
                unlock_display_digits,
            ),
            symbol: exchange_token.symbol.clone(),
        };
    }

    if !wallet.account_connected {
        return ClaimAction::ConnectWallet;
    }

    if !wallet.chain_valid {
        return ClaimAction::InvalidNetwork;
    }

    if !validation.is_valid() {
        return ClaimAction::Blocked {
            outcome: validation.clone(),
        };
    }

    ClaimAction::Claim
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::{ether, token, DAI};
    use crate::state::TokenKind;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn dai() -> Token {
        token(DAI, "DAI", 18, TokenKind::Erc20)
    }

    fn wallet(approve_state: ApproveState) -> WalletStatus {
        WalletStatus {
            account_connected: true,
            chain_valid: true,
            approve_state,
        }
    }

    #[test]
    fn test_ether_never_requires_approval() {
        for state in [
            ApproveState::Unknown,
            ApproveState::NotApproved,
            ApproveState::Pending,
            ApproveState::Approved,
        ] {
            assert!(!approve_required(&ether(), state));
        }
    }

    #[test]
    fn test_erc20_requires_approval_until_approved() {
        assert!(approve_required(&dai(), ApproveState::NotApproved));
        assert!(approve_required(&dai(), ApproveState::Pending));
        assert!(!approve_required(&dai(), ApproveState::Approved));
        assert!(!approve_required(&dai(), ApproveState::Updating));
    }

    #[test]
    fn test_approval_request_only_from_not_approved() {
        let amount = dec("1500000000000000000");
        let exact = approval_request(&dai(), &amount, ApproveState::NotApproved, ApproveMode::Exact)
            .unwrap();
        assert_eq!(exact.amount, Some(amount.clone()));

        let infinite =
            approval_request(&dai(), &amount, ApproveState::NotApproved, ApproveMode::Infinite)
                .unwrap();
        assert_eq!(infinite.amount, None);

        assert!(approval_request(&dai(), &amount, ApproveState::Pending, ApproveMode::Exact).is_none());
        assert!(
            approval_request(&ether(), &amount, ApproveState::NotApproved, ApproveMode::Exact)
                .is_none()
        );
    }

    #[test]
    fn test_unlock_offered_when_valid() {
        let action = claim_action(
            wallet(ApproveState::NotApproved),
            &dai(),
            &dec("1234500000000000000"),
            &ValidationOutcome::Valid,
            2,
        );
        assert_eq!(
            action,
            ClaimAction::Unlock {
                amount: "1.23".to_string(),
                symbol: "DAI".to_string()
            }
        );
        assert_eq!(action.label(), "Unlock 1.23 DAI");
    }

    #[test]
    fn test_unlocking_while_pending() {
        let action = claim_action(
            wallet(ApproveState::Pending),
            &dai(),
            &dec("1"),
            &ValidationOutcome::Valid,
            2,
        );
        assert!(matches!(action, ClaimAction::Unlocking { .. }));
        assert!(!action.is_enabled());
    }

    #[test]
    fn test_invalid_amount_hides_approval() {
        let action = claim_action(
            wallet(ApproveState::NotApproved),
            &dai(),
            &dec("0"),
            &ValidationOutcome::ZeroAmount,
            2,
        );
        assert_eq!(
            action,
            ClaimAction::Blocked {
                outcome: ValidationOutcome::ZeroAmount
            }
        );
        assert_eq!(action.label(), "Enter an amount");
    }

    #[test]
    fn test_wallet_precedence() {
        let mut status = wallet(ApproveState::Approved);
        status.account_connected = false;
        status.chain_valid = false;
        let action = claim_action(status, &dai(), &dec("1"), &ValidationOutcome::ZeroAmount, 2);
        assert_eq!(action, ClaimAction::ConnectWallet);

        status.account_connected = true;
        let action = claim_action(status, &dai(), &dec("1"), &ValidationOutcome::ZeroAmount, 2);
        assert_eq!(action, ClaimAction::InvalidNetwork);
    }

    #[test]
    fn test_claim_enabled() {
        let action = claim_action(
            wallet(ApproveState::Unknown),
            &ether(),
            &dec("1"),
            &ValidationOutcome::Valid,
            2,
        );
        assert_eq!(action, ClaimAction::Claim);
        assert!(action.is_enabled());
        assert_eq!(action.label(), "Swap");
    }
}
