//! ITO Claim Calculator
//!
//! Claim dialog logic for an Initial Token Offering: a buyer pays with one of
//! several exchange tokens, each at its own fixed ratio against the offered
//! token, up to a per-wallet swap limit. This crate resolves ratios, converts
//! between claim and pay amounts exactly, validates the claim, drives the
//! approval step and interprets the claim transaction's result.
//!
//! The session is a reducer: `session::recompute` takes the current
//! `ClaimState` and one `ClaimEvent` and returns the next state.

pub mod amount;
pub mod approval;
pub mod calculator;
pub mod constants;
pub mod receipt;
pub mod session;
pub mod state;
pub mod validate;

// Re-exports
pub use amount::{format_balance, format_full, parse_balance, to_smallest_unit};
pub use approval::{
    approval_request, approve_required, claim_action, ApprovalRequest, ApproveMode,
    ApproveState, ClaimAction, WalletStatus,
};
pub use calculator::{
    claim_from_pay, max_claim_amount, pay_from_claim, pay_from_claim_text,
    pay_from_slider_fraction, pay_from_slider_fraction_with, resolve, slider_position,
    AmountUpdate, Ratio,
};
pub use receipt::{
    claim_outcome, claim_request, transaction_summary, ClaimOutcome, ClaimRequest, ClaimTxState,
};
pub use session::{
    open_session, preview, recompute, ClaimEvent, SessionContext, Transition, TransitionStatus,
};
pub use state::{
    ClaimPreview, ClaimState, ExchangePayload, PreviewInputs, SessionPhase, Token, TokenKind,
};
pub use validate::{validate, ValidationOutcome};
