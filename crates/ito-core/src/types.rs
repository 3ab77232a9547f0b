//! Core type definitions shared across the workspace

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ProtocolError;

/// EVM account or contract address (`0x` + 40 hex chars).
///
/// Equality and hashing ignore letter case, so a checksummed address and its
/// lowercase form identify the same token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAddress(pub String);

impl TokenAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Parse and format-check an address.
    pub fn parse(addr: &str) -> Result<Self, ProtocolError> {
        let address = Self::new(addr.trim());
        address.check_format()?;
        Ok(address)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the `0x` prefix, length and hex body.
    pub fn check_format(&self) -> Result<(), ProtocolError> {
        let body = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .ok_or_else(|| ProtocolError::InvalidToken {
                address: self.0.clone(),
                reason: "address must start with '0x'".to_string(),
            })?;

        if body.len() != 40 {
            return Err(ProtocolError::InvalidToken {
                address: self.0.clone(),
                reason: format!("address must be 42 characters, got {}", self.0.len()),
            });
        }

        hex::decode(body).map_err(|e| ProtocolError::InvalidToken {
            address: self.0.clone(),
            reason: format!("address is not hex: {}", e),
        })?;

        Ok(())
    }

    /// Case-insensitive comparison against a raw address string
    pub fn is_same(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for TokenAddress {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(&other.0)
    }
}

impl Eq for TokenAddress {}

impl Hash for TokenAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_lowercase().hash(state);
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EVM chains an ITO can be deployed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Mainnet,
    Ropsten,
    Rinkeby,
    Kovan,
    Gorli,
}

impl ChainId {
    /// All supported chains
    pub const ALL: [ChainId; 5] = [
        ChainId::Mainnet,
        ChainId::Ropsten,
        ChainId::Rinkeby,
        ChainId::Kovan,
        ChainId::Gorli,
    ];

    /// Numeric EIP-155 chain id
    pub fn id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Ropsten => 3,
            Self::Rinkeby => 4,
            Self::Gorli => 5,
            Self::Kovan => 42,
        }
    }

    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Ropsten => "ropsten",
            Self::Rinkeby => "rinkeby",
            Self::Kovan => "kovan",
            Self::Gorli => "gorli",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constants
pub mod constants {
    /// Placeholder address used for the chain's native currency
    pub const ETHER_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

    /// Decimals of the native currency
    pub const ETHER_DECIMALS: u32 = 18;

    /// ERC20 `decimals()` is a uint8
    pub const MAX_TOKEN_DECIMALS: u32 = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_address_case_insensitive_identity() {
        let checksummed = TokenAddress::new("0x6B175474E89094C44Da98b954EedeAC495271d0F");
        let lower = TokenAddress::new("0x6b175474e89094c44da98b954eedeac495271d0f");
        assert_eq!(checksummed, lower);

        let mut set = HashSet::new();
        set.insert(checksummed);
        assert!(set.contains(&lower));
    }

    #[test]
    fn test_address_format() {
        assert!(TokenAddress::parse("0x6B175474E89094C44Da98b954EedeAC495271d0F").is_ok());
        assert!(TokenAddress::parse(constants::ETHER_ADDRESS).is_ok());
        assert!(TokenAddress::parse("6B175474E89094C44Da98b954EedeAC495271d0F").is_err());
        assert!(TokenAddress::parse("0x6B17").is_err());
        assert!(TokenAddress::parse("0xZZ175474E89094C44Da98b954EedeAC495271d0F").is_err());
    }

    #[test]
    fn test_chain_id_lookup() {
        assert_eq!(ChainId::from_id(1), Some(ChainId::Mainnet));
        assert_eq!(ChainId::from_id(42), Some(ChainId::Kovan));
        assert_eq!(ChainId::from_id(56), None);
        assert_eq!(ChainId::from_name("Rinkeby"), Some(ChainId::Rinkeby));
        assert_eq!(ChainId::Gorli.to_string(), "gorli");
    }
}
