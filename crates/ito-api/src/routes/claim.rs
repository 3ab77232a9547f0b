//! ITO Claim Routes (`/ito`)
//!
//! Every endpoint is a pure function of its request plus the server's
//! settings. The client keeps the `ClaimState` and sends it back with each
//! event.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use bigdecimal::BigDecimal;
use ito::{
    approval_request, claim_request, open_session, parse_balance, preview, recompute, resolve,
    transaction_summary, validate, ClaimPreview, ClaimState, PreviewInputs, SessionContext,
    Transition,
};
use ito_core::{ChainId, ProtocolError};

use crate::dto::{
    ApiError, ApproveRequest, ApproveResponse, ClaimBuildRequest, ClaimBuildResponse,
    OpenSessionRequest, PreviewRequest, RatioRequest, RatioResponse, SessionEventRequest,
    ValidateRequest, ValidateResponse,
};
use crate::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create ITO routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ratio", post(get_ratio))
        .route("/session", post(start_session))
        .route("/session/event", post(apply_event))
        .route("/validate", post(validate_claim))
        .route("/preview", post(claim_preview))
        .route("/approve", post(build_approval))
        .route("/claim/build", post(build_claim))
}

/// Convert ProtocolError to API error response
fn protocol_error(error: ProtocolError) -> (StatusCode, Json<ApiError>) {
    tracing::debug!(code = error.error_code(), "{}", error);
    (
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ApiError::new(error.error_code(), error.to_string())),
    )
}

fn require_non_negative(name: &str, value: &BigDecimal) -> Result<(), (StatusCode, Json<ApiError>)> {
    if *value < BigDecimal::from(0) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!("{} must not be negative", name))),
        ));
    }
    Ok(())
}

/// POST /ito/ratio - Resolve the exchange ratio for one exchange token
async fn get_ratio(Json(request): Json<RatioRequest>) -> ApiResult<RatioResponse> {
    request.payload.validate().map_err(protocol_error)?;
    let ratio = resolve(&request.payload, request.token_index).map_err(protocol_error)?;
    let exchange_token = request
        .payload
        .exchange_token(request.token_index)
        .map_err(protocol_error)?
        .clone();

    Ok(Json(RatioResponse {
        value: ratio.value(),
        ratio,
        exchange_token,
    }))
}

/// POST /ito/session - Open a claim session on the first exchange token
async fn start_session(Json(request): Json<OpenSessionRequest>) -> ApiResult<ClaimState> {
    require_non_negative("initAmount", &request.init_amount)?;
    let state = open_session(&request.payload, &request.init_amount).map_err(protocol_error)?;
    Ok(Json(state))
}

/// POST /ito/session/event - Apply one dialog event
async fn apply_event(
    State(state): State<AppState>,
    Json(request): Json<SessionEventRequest>,
) -> ApiResult<Transition> {
    request.payload.validate().map_err(protocol_error)?;
    require_non_negative("initAmount", &request.init_amount)?;
    require_non_negative("maxPay", &request.max_pay)?;

    let ctx = SessionContext::new(
        request.init_amount,
        request.max_pay,
        &state.ito_config().await,
    );
    let transition =
        recompute(&request.payload, &request.state, &request.event, &ctx).map_err(protocol_error)?;

    Ok(Json(transition))
}

/// POST /ito/validate - Check a claim amount
async fn validate_claim(Json(request): Json<ValidateRequest>) -> ApiResult<ValidateResponse> {
    let balance = parse_balance(&request.balance).map_err(protocol_error)?;
    let outcome = validate(
        &request.claim_amount,
        &balance,
        &request.ratio,
        &request.max_pay,
        &request.exchange_token,
    );

    Ok(Json(ValidateResponse {
        valid: outcome.is_valid(),
        message: outcome.message(),
        outcome,
    }))
}

/// POST /ito/preview - Everything the dialog renders for a state
async fn claim_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> ApiResult<ClaimPreview> {
    request.payload.validate().map_err(protocol_error)?;
    require_non_negative("maxPay", &request.max_pay)?;
    let config = state.config().await;

    // an unknown chain is just another wrong network
    let chain_valid = ChainId::from_id(request.chain_id) == Some(config.chain_id);
    if !chain_valid {
        tracing::debug!(
            wallet_chain = request.chain_id,
            expected = %config.chain_id,
            "Wallet on a different network"
        );
    }

    let inputs = PreviewInputs {
        balance: request.balance,
        max_pay: request.max_pay,
        account_connected: request.account_connected,
        chain_valid,
        approve_state: request.approve_state,
    };

    let view = preview(&request.payload, &request.state, &inputs, &config.ito)
        .map_err(protocol_error)?;
    Ok(Json(view))
}

/// POST /ito/approve - Build the allowance request, if one is due
async fn build_approval(Json(request): Json<ApproveRequest>) -> ApiResult<ApproveResponse> {
    Ok(Json(ApproveResponse {
        request: approval_request(
            &request.exchange_token,
            &request.claim_amount,
            request.approve_state,
            request.mode,
        ),
    }))
}

/// POST /ito/claim/build - Build the claim call for the current state
async fn build_claim(Json(request): Json<ClaimBuildRequest>) -> ApiResult<ClaimBuildResponse> {
    request.payload.validate().map_err(protocol_error)?;
    let claim = claim_request(&request.payload, &request.state).map_err(protocol_error)?;

    tracing::info!(
        pid = %claim.pid,
        amount = %claim.amount,
        symbol = %claim.exchange_token.symbol,
        "Built claim request"
    );

    Ok(Json(ClaimBuildResponse {
        summary: transaction_summary(&request.state.pay_amount, &request.payload.token),
        request: claim,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ito::{ClaimAction, ClaimEvent, ExchangePayload, TransitionStatus, ValidationOutcome};
    use ito_core::{AppConfig, ItoConfig, SliderOverflow};
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    /// ETH at 2:1 and DAI (6 decimals) at 3:1, offering MASK
    fn payload() -> ExchangePayload {
        serde_json::from_value(json!({
            "pid": "0x01",
            "password": "secret",
            "exchange_tokens": [
                {"address": "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE", "decimals": 18, "symbol": "ETH", "type": "ether"},
                {"address": "0x6B175474E89094C44Da98b954EedeAC495271d0F", "decimals": 6, "symbol": "DAI", "type": "erc20"}
            ],
            "exchange_amounts": ["2", "1", "3", "1"],
            "token": {"address": "0x69af81e73A73B40adF4f3d4223Cd9b1ECE623074", "decimals": 18, "symbol": "MASK", "type": "erc20"}
        }))
        .unwrap()
    }

    async fn session() -> ClaimState {
        let Json(state) = start_session(Json(OpenSessionRequest {
            payload: payload(),
            init_amount: dec("100"),
        }))
        .await
        .unwrap();
        state
    }

    #[tokio::test]
    async fn test_ratio() {
        let Json(response) = get_ratio(Json(RatioRequest {
            payload: payload(),
            token_index: 1,
        }))
        .await
        .unwrap();
        assert_eq!(response.value, dec("3"));
        assert_eq!(response.exchange_token.symbol, "DAI");
    }

    #[tokio::test]
    async fn test_ratio_index_out_of_range() {
        let (status, Json(error)) = get_ratio(Json(RatioRequest {
            payload: payload(),
            token_index: 7,
        }))
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "index_out_of_range");
    }

    #[tokio::test]
    async fn test_open_session_rejects_negative_init() {
        let (status, _) = start_session(Json(OpenSessionRequest {
            payload: payload(),
            init_amount: dec("-1"),
        }))
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_event_reselect_resets_amounts() {
        let start = session().await;
        let Json(edited) = apply_event(
            State(AppState::new()),
            Json(SessionEventRequest {
                payload: payload(),
                state: start,
                init_amount: dec("100"),
                max_pay: dec("1000"),
                event: ClaimEvent::AmountEdited { text: "0.25".into() },
            }),
        )
        .await
        .unwrap();

        let Json(next) = apply_event(
            State(AppState::new()),
            Json(SessionEventRequest {
                payload: payload(),
                state: edited.state,
                init_amount: dec("100"),
                max_pay: dec("1000"),
                event: ClaimEvent::ExchangeTokenSelected { index: 1 },
            }),
        )
        .await
        .unwrap();

        assert_eq!(next.status, TransitionStatus::Applied);
        assert_eq!(next.state.exchange_token.symbol, "DAI");
        assert_eq!(next.state.pay_amount, dec("100"));
        assert_eq!(next.state.claim_amount, dec("300"));
        assert_eq!(next.state.display_text, "0.0003");
    }

    #[tokio::test]
    async fn test_event_uses_configured_overflow_policy() {
        let app_state = AppState::with_config(AppConfig {
            ito: ItoConfig {
                slider_overflow: SliderOverflow::Clamp,
                unlock_display_digits: 2,
            },
            ..AppConfig::default()
        });

        let Json(next) = apply_event(
            State(app_state),
            Json(SessionEventRequest {
                payload: payload(),
                state: session().await,
                init_amount: dec("100"),
                max_pay: dec("1000"),
                event: ClaimEvent::SliderMoved { fraction: dec("50") },
            }),
        )
        .await
        .unwrap();
        assert_eq!(next.status, TransitionStatus::Applied);
        assert!(next.state.pay_amount <= dec("1000"));
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let Json(response) = validate_claim(Json(ValidateRequest {
            claim_amount: dec("100"),
            balance: "50".into(),
            ratio: ito::Ratio::new(dec("3"), dec("1")).unwrap(),
            max_pay: dec("1000"),
            exchange_token: payload().exchange_tokens[1].clone(),
        }))
        .await
        .unwrap();
        assert!(!response.valid);
        assert_eq!(response.message.as_deref(), Some("Insufficient DAI balance"));
    }

    #[tokio::test]
    async fn test_preview_wrong_network() {
        let Json(view) = claim_preview(
            State(AppState::new()),
            Json(PreviewRequest {
                payload: payload(),
                state: session().await,
                balance: "1000".into(),
                max_pay: dec("1000"),
                account_connected: true,
                chain_id: 4,
                approve_state: Default::default(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(view.validation, ValidationOutcome::Valid);
        assert_eq!(view.action, ClaimAction::InvalidNetwork);
        assert_eq!(view.action_label, "Invalid Network");
    }

    #[tokio::test]
    async fn test_preview_mainnet_claim() {
        let Json(view) = claim_preview(
            State(AppState::new()),
            Json(PreviewRequest {
                payload: payload(),
                state: session().await,
                balance: "1000".into(),
                max_pay: dec("1000"),
                account_connected: true,
                chain_id: 1,
                approve_state: Default::default(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(view.action, ClaimAction::Claim);
        assert_eq!(view.slider_position, dec("10"));
    }

    #[tokio::test]
    async fn test_build_claim_after_claimed_is_conflict() {
        let mut state = session().await;
        state.phase = ito::SessionPhase::Claimed;
        let (status, Json(error)) = build_claim(Json(ClaimBuildRequest {
            payload: payload(),
            state,
        }))
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error.code, "session_closed");
    }

    #[tokio::test]
    async fn test_build_claim() {
        let Json(response) = build_claim(Json(ClaimBuildRequest {
            payload: payload(),
            state: session().await,
        }))
        .await
        .unwrap();
        assert_eq!(response.request.amount, "200");
        assert_eq!(response.summary, "Swap 0.0000000000000001 MASK");
    }

    #[tokio::test]
    async fn test_build_approval_for_erc20_only() {
        let tokens = payload().exchange_tokens;
        let Json(eth) = build_approval(Json(ApproveRequest {
            exchange_token: tokens[0].clone(),
            claim_amount: dec("1"),
            approve_state: ito::ApproveState::NotApproved,
            mode: ito::ApproveMode::Exact,
        }))
        .await
        .unwrap();
        assert!(eth.request.is_none());

        let Json(dai) = build_approval(Json(ApproveRequest {
            exchange_token: tokens[1].clone(),
            claim_amount: dec("300"),
            approve_state: ito::ApproveState::NotApproved,
            mode: ito::ApproveMode::Exact,
        }))
        .await
        .unwrap();
        assert_eq!(dai.request.unwrap().amount, Some(dec("300")));
    }
}
