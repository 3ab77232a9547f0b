//! Data Transfer Objects for API requests and responses

use bigdecimal::BigDecimal;
use ito::amount::deserialize_amount;
use ito::{
    ApprovalRequest, ApproveMode, ApproveState, ClaimEvent, ClaimState, ExchangePayload, Ratio,
    Token, ValidationOutcome,
};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub chain: String,
}

impl HealthResponse {
    pub fn ok(chain: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            chain: chain.into(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}

// =============================================================================
// Ratio
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioRequest {
    pub payload: ExchangePayload,
    pub token_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioResponse {
    pub ratio: Ratio,
    /// Decimal value of the ratio
    pub value: BigDecimal,
    pub exchange_token: Token,
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub payload: ExchangePayload,
    #[serde(deserialize_with = "deserialize_amount")]
    pub init_amount: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEventRequest {
    pub payload: ExchangePayload,
    pub state: ClaimState,
    /// Pay amount restored on exchange token reselection
    #[serde(deserialize_with = "deserialize_amount")]
    pub init_amount: BigDecimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub max_pay: BigDecimal,
    pub event: ClaimEvent,
}

// =============================================================================
// Validation and preview
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(deserialize_with = "deserialize_amount")]
    pub claim_amount: BigDecimal,
    /// Smallest units; empty while the balance is loading
    #[serde(default)]
    pub balance: String,
    pub ratio: Ratio,
    #[serde(deserialize_with = "deserialize_amount")]
    pub max_pay: BigDecimal,
    pub exchange_token: Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub outcome: ValidationOutcome,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub payload: ExchangePayload,
    pub state: ClaimState,
    #[serde(default)]
    pub balance: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub max_pay: BigDecimal,
    pub account_connected: bool,
    /// Chain the wallet is currently connected to
    pub chain_id: u64,
    #[serde(default)]
    pub approve_state: ApproveState,
}

// =============================================================================
// Approval and claim
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub exchange_token: Token,
    #[serde(deserialize_with = "deserialize_amount")]
    pub claim_amount: BigDecimal,
    pub approve_state: ApproveState,
    pub mode: ApproveMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    /// `None` when no approval should be sent in the current state
    pub request: Option<ApprovalRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimBuildRequest {
    pub payload: ExchangePayload,
    pub state: ClaimState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimBuildResponse {
    pub request: ito::ClaimRequest,
    /// Text shown while the transaction is pending
    pub summary: String,
}
