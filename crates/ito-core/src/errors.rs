//! Error types for the ITO claim workspace

use thiserror::Error;

/// Top-level errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Claim calculator errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Exchange token index {index} out of range ({len} tokens)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid ITO payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Invalid token {address}: {reason}")]
    InvalidToken { address: String, reason: String },

    #[error("Token {address} is not an exchange token of this ITO")]
    TokenNotExchangeable { address: String },

    #[error("Claim session already completed")]
    SessionClosed,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl ProtocolError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::InvalidPayload { .. } => "invalid_payload",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidToken { .. } => "invalid_token",
            Self::TokenNotExchangeable { .. } => "token_not_exchangeable",
            Self::SessionClosed => "session_closed",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } | Self::InvalidToken { .. } => 400,
            Self::InvalidPayload { .. } | Self::IndexOutOfRange { .. } => 400,
            Self::TokenNotExchangeable { .. } => 422,
            Self::SessionClosed => 409,
        }
    }
}
