//! Application state shared across API handlers

use std::sync::Arc;

use ito_core::{AppConfig, ChainId, ItoConfig};
use thiserror::Error;
use tokio::sync::RwLock;

/// Upper bound for `unlock_display_digits`
const MAX_UNLOCK_DISPLAY_DIGITS: u32 = 36;

/// Errors from updating shared state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid ITO settings: {reason}")]
    InvalidSettings { reason: String },
}

impl StateError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSettings { .. } => "invalid_settings",
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    pub async fn ito_config(&self) -> ItoConfig {
        self.inner.config.read().await.ito.clone()
    }

    /// Chain the wallet must be connected to
    pub async fn chain_id(&self) -> ChainId {
        self.inner.config.read().await.chain_id
    }

    /// Replace the calculator settings
    pub async fn set_ito_config(&self, ito: ItoConfig) -> Result<(), StateError> {
        if ito.unlock_display_digits > MAX_UNLOCK_DISPLAY_DIGITS {
            return Err(StateError::InvalidSettings {
                reason: format!(
                    "unlock_display_digits {} exceeds {}",
                    ito.unlock_display_digits, MAX_UNLOCK_DISPLAY_DIGITS
                ),
            });
        }

        let mut config = self.inner.config.write().await;
        tracing::info!(
            slider_overflow = ?ito.slider_overflow,
            unlock_display_digits = ito.unlock_display_digits,
            "Updated ITO settings"
        );
        config.ito = ito;
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ito_core::SliderOverflow;

    #[tokio::test]
    async fn test_set_ito_config() {
        let state = AppState::new();
        assert_eq!(state.ito_config().await.slider_overflow, SliderOverflow::Reject);

        state
            .set_ito_config(ItoConfig {
                slider_overflow: SliderOverflow::Clamp,
                unlock_display_digits: 4,
            })
            .await
            .unwrap();

        let ito = state.clone().ito_config().await;
        assert_eq!(ito.slider_overflow, SliderOverflow::Clamp);
        assert_eq!(ito.unlock_display_digits, 4);
    }

    #[tokio::test]
    async fn test_set_ito_config_rejects_excess_digits() {
        let state = AppState::new();
        let result = state
            .set_ito_config(ItoConfig {
                slider_overflow: SliderOverflow::Reject,
                unlock_display_digits: 99,
            })
            .await;
        assert!(result.is_err());
        assert_eq!(state.ito_config().await.unlock_display_digits, 2);
    }

    #[tokio::test]
    async fn test_chain_from_config() {
        let config = AppConfig {
            chain_id: ChainId::Rinkeby,
            ..AppConfig::default()
        };
        let state = AppState::with_config(config);
        assert_eq!(state.chain_id().await, ChainId::Rinkeby);
    }
}
