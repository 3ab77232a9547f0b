//! Claim session reducer
//!
//! Each dialog event is applied with `recompute(payload, state, event, ctx)`,
//! which returns the next state instead of mutating in place. Every
//! transition recomputes claim amount, pay amount and display text together.
//!
//! Reselecting the exchange token always resets the amounts to the
//! configured initial pay amount at the new ratio; any edit in progress is
//! discarded.

use bigdecimal::BigDecimal;
use ito_core::{ItoConfig, ProtocolError, SliderOverflow, TokenAddress};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::amount::{check_magnitude, deserialize_amount, format_full, parse_balance};
use crate::approval::{approve_required, claim_action, WalletStatus};
use crate::calculator::{
    claim_from_pay, max_claim_amount, pay_from_claim_text, pay_from_slider_fraction_with,
    resolve, slider_position, AmountUpdate,
};
use crate::receipt::{claim_outcome, transaction_summary, ClaimOutcome, ClaimTxState};
use crate::state::{ClaimPreview, ClaimState, ExchangePayload, PreviewInputs, SessionPhase};
use crate::validate::validate;

/// Dialog events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClaimEvent {
    /// Slider dragged to `fraction` percent of the swap limit
    SliderMoved {
        #[serde(deserialize_with = "deserialize_amount")]
        fraction: BigDecimal,
    },
    /// Text typed into the amount panel
    AmountEdited { text: String },
    /// Exchange token picked by position
    ExchangeTokenSelected { index: usize },
    /// Exchange token picked from the token list
    ExchangeTokenChosen { address: TokenAddress },
    /// Claim transaction service reported a new state
    TransactionUpdated { tx: ClaimTxState },
}

/// Per-session inputs that do not change between events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// Pay amount restored on every exchange token reselection
    #[serde(deserialize_with = "deserialize_amount")]
    pub init_amount: BigDecimal,
    /// Per-wallet swap limit
    #[serde(deserialize_with = "deserialize_amount")]
    pub max_pay: BigDecimal,
    #[serde(default)]
    pub slider_overflow: SliderOverflow,
}

impl SessionContext {
    pub fn new(init_amount: BigDecimal, max_pay: BigDecimal, config: &ItoConfig) -> Self {
        Self {
            init_amount,
            max_pay,
            slider_overflow: config.slider_overflow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionStatus {
    Applied,
    /// Slider update refused; state unchanged
    Rejected,
    /// Nothing to do for this event; state unchanged
    Ignored,
    /// Claim settled; the session is over
    Completed,
}

/// Result of applying one event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub state: ClaimState,
    pub status: TransitionStatus,
    pub outcome: Option<ClaimOutcome>,
}

impl Transition {
    fn applied(state: ClaimState) -> Self {
        Self {
            state,
            status: TransitionStatus::Applied,
            outcome: None,
        }
    }

    fn unchanged(state: &ClaimState, status: TransitionStatus) -> Self {
        Self {
            state: state.clone(),
            status,
            outcome: None,
        }
    }
}

/// Start a session on the first exchange token with `initial_pay` as the pay amount.
///
/// A zero claim opens with blank text; later reselections show `"0"`.
pub fn open_session(
    payload: &ExchangePayload,
    initial_pay: &BigDecimal,
) -> Result<ClaimState, ProtocolError> {
    payload.validate()?;
    check_magnitude(initial_pay)?;
    let mut state = select_token(payload, 0, initial_pay)?;
    if state.claim_amount.is_zero() {
        state.display_text.clear();
    }
    tracing::debug!(
        pid = %payload.pid,
        symbol = %state.exchange_token.symbol,
        claim = %state.claim_amount,
        "Opened claim session"
    );
    Ok(state)
}

fn select_token(
    payload: &ExchangePayload,
    index: usize,
    pay_amount: &BigDecimal,
) -> Result<ClaimState, ProtocolError> {
    let exchange_token = payload.exchange_token(index)?.clone();
    let ratio = resolve(payload, index)?;
    let claim_amount = claim_from_pay(pay_amount, &ratio);

    Ok(ClaimState {
        token_index: index,
        display_text: format_full(&claim_amount, exchange_token.unit_decimals()),
        exchange_token,
        ratio,
        claim_amount,
        pay_amount: pay_amount.clone(),
        phase: SessionPhase::Editing,
    })
}

fn with_amounts(state: &ClaimState, update: AmountUpdate) -> ClaimState {
    ClaimState {
        claim_amount: update.claim_amount,
        pay_amount: update.pay_amount,
        display_text: update.display_text,
        ..state.clone()
    }
}

/// Apply one event to the session state.
///
/// `state` must belong to `payload` (see `ClaimState::check`).
pub fn recompute(
    payload: &ExchangePayload,
    state: &ClaimState,
    event: &ClaimEvent,
    ctx: &SessionContext,
) -> Result<Transition, ProtocolError> {
    state.check(payload)?;
    check_magnitude(&ctx.init_amount)?;
    check_magnitude(&ctx.max_pay)?;

    if state.is_claimed() {
        tracing::debug!(?event, "Claim session already completed, event ignored");
        return Ok(Transition::unchanged(state, TransitionStatus::Ignored));
    }

    let decimals = state.exchange_token.unit_decimals();

    let transition = match event {
        ClaimEvent::SliderMoved { fraction } => match pay_from_slider_fraction_with(
            fraction,
            &ctx.max_pay,
            &state.ratio,
            decimals,
            ctx.slider_overflow,
        )? {
            Some(update) => Transition::applied(with_amounts(state, update)),
            None => Transition::unchanged(state, TransitionStatus::Rejected),
        },

        ClaimEvent::AmountEdited { text } => Transition::applied(with_amounts(
            state,
            pay_from_claim_text(text, &state.ratio, decimals),
        )),

        ClaimEvent::ExchangeTokenSelected { index } => {
            Transition::applied(select_token(payload, *index, &ctx.init_amount)?)
        }

        ClaimEvent::ExchangeTokenChosen { address } => {
            let index = payload.find_token(address)?;
            Transition::applied(select_token(payload, index, &ctx.init_amount)?)
        }

        ClaimEvent::TransactionUpdated { tx } => match claim_outcome(tx, &payload.token) {
            Some(outcome) => {
                tracing::info!(
                    pid = %payload.pid,
                    received = ?outcome.actual_swap_amount,
                    "Claim settled"
                );
                Transition {
                    state: ClaimState {
                        phase: SessionPhase::Claimed,
                        ..state.clone()
                    },
                    status: TransitionStatus::Completed,
                    outcome: Some(outcome),
                }
            }
            None => {
                if let ClaimTxState::Failed { message } = tx {
                    tracing::warn!(pid = %payload.pid, %message, "Claim transaction failed");
                }
                Transition::unchanged(state, TransitionStatus::Ignored)
            }
        },
    };

    tracing::debug!(
        status = ?transition.status,
        claim = %transition.state.claim_amount,
        pay = %transition.state.pay_amount,
        "Claim session transition"
    );

    Ok(transition)
}

/// Derive everything the dialog renders for `state`.
pub fn preview(
    payload: &ExchangePayload,
    state: &ClaimState,
    inputs: &PreviewInputs,
    config: &ItoConfig,
) -> Result<ClaimPreview, ProtocolError> {
    state.check(payload)?;
    check_magnitude(&inputs.max_pay)?;
    let balance = parse_balance(&inputs.balance)?;
    let validation = validate(
        &state.claim_amount,
        &balance,
        &state.ratio,
        &inputs.max_pay,
        &state.exchange_token,
    );

    let action = claim_action(
        WalletStatus {
            account_connected: inputs.account_connected,
            chain_valid: inputs.chain_valid,
            approve_state: inputs.approve_state,
        },
        &state.exchange_token,
        &state.claim_amount,
        &validation,
        config.unlock_display_digits,
    );

    Ok(ClaimPreview {
        ratio: state.ratio.value(),
        claim_amount: state.claim_amount.clone(),
        pay_amount: state.pay_amount.clone(),
        display_text: state.display_text.clone(),
        pay_display: format_full(&state.pay_amount, payload.token.unit_decimals()),
        message: validation.message(),
        approve_required: approve_required(&state.exchange_token, inputs.approve_state),
        action_label: action.label(),
        action,
        validation,
        slider_position: slider_position(&state.pay_amount, &inputs.max_pay),
        max_claim_amount: max_claim_amount(&inputs.max_pay, &state.ratio, &balance),
        summary: transaction_summary(&state.pay_amount, &payload.token),
    })
}
