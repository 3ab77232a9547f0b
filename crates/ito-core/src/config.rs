//! Configuration types

use serde::{Deserialize, Serialize};

use crate::{ChainId, Error};

/// What to do when a slider move re-derives a pay amount above the swap limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderOverflow {
    /// Drop the update and keep the previous state
    #[default]
    Reject,
    /// Pin the pay amount to the swap limit
    Clamp,
}

impl SliderOverflow {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

/// Claim calculator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItoConfig {
    #[serde(default)]
    pub slider_overflow: SliderOverflow,

    /// Significant fraction digits shown in the unlock button label
    #[serde(default = "default_unlock_display_digits")]
    pub unlock_display_digits: u32,
}

fn default_unlock_display_digits() -> u32 {
    2
}

impl Default for ItoConfig {
    fn default() -> Self {
        Self {
            slider_overflow: SliderOverflow::default(),
            unlock_display_digits: default_unlock_display_digits(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chain the wallet is expected to be on
    pub chain_id: ChainId,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    #[serde(default)]
    pub ito: ItoConfig,
}

fn default_api_port() -> u16 {
    19054
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::Mainnet,
            api_port: default_api_port(),
            ito: ItoConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `ITO_API_PORT`, `ITO_CHAIN_ID` and `ITO_SLIDER_OVERFLOW`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(port) = lookup("ITO_API_PORT") {
            config.api_port = port
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("ITO_API_PORT '{}': {}", port, e)))?;
        }

        if let Some(chain) = lookup("ITO_CHAIN_ID") {
            config.chain_id = match chain.trim().parse::<u64>() {
                Ok(id) => ChainId::from_id(id),
                Err(_) => ChainId::from_name(&chain),
            }
            .ok_or_else(|| Error::Config(format!("ITO_CHAIN_ID '{}' is not supported", chain)))?;
        }

        if let Some(policy) = lookup("ITO_SLIDER_OVERFLOW") {
            config.ito.slider_overflow = SliderOverflow::from_name(&policy).ok_or_else(|| {
                Error::Config(format!(
                    "ITO_SLIDER_OVERFLOW '{}' must be 'reject' or 'clamp'",
                    policy
                ))
            })?;
        }

        tracing::debug!(
            chain = %config.chain_id,
            port = config.api_port,
            slider_overflow = ?config.ito.slider_overflow,
            "Loaded configuration"
        );

        Ok(config)
    }
}
