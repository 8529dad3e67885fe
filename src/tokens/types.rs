/// Core types shared by discovery, pricing and aggregation
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::units::{format_units, raw_amount};
use crate::networks::Network;

/// Reserved address for a network's base asset
pub const NATIVE_ADDRESS: &str = "native";

// ============================================================================
// DISCOVERY METHOD
// ============================================================================

/// Which path reported a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMethod {
    Indexer,
    Native,
    ContractProbe,
}

impl DiscoveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMethod::Indexer => "indexer",
            DiscoveryMethod::Native => "native",
            DiscoveryMethod::ContractProbe => "contract-probe",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TOKEN
// ============================================================================

/// Identity of a token: network plus canonical address (or the native sentinel)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenKey {
    pub network: Network,
    pub address: String,
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.network, self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub network: Network,
    /// Canonical contract address, or [`NATIVE_ADDRESS`]
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub is_native: bool,
    pub coingecko_id: Option<String>,
    pub discovery_method: DiscoveryMethod,
    /// Listed in the curated allowlist; native assets always are
    pub verified: bool,
}

impl Token {
    /// Base asset of `network`
    pub fn native(network: Network, discovery_method: DiscoveryMethod) -> Self {
        let asset = network.native_asset();
        Self {
            network,
            address: NATIVE_ADDRESS.to_string(),
            symbol: asset.symbol.to_string(),
            name: asset.name.to_string(),
            decimals: asset.decimals,
            is_native: true,
            coingecko_id: Some(asset.coingecko_id.to_string()),
            discovery_method,
            verified: true,
        }
    }

    pub fn key(&self) -> TokenKey {
        TokenKey {
            network: self.network,
            address: self.address.clone(),
        }
    }
}

/// On-chain ERC-20 style metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

// ============================================================================
// BALANCE
// ============================================================================

/// Raw on-chain amount plus the decimals needed to read it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Balance {
    #[serde(with = "raw_amount")]
    pub raw: U256,
    pub decimals: u8,
}

impl Balance {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn is_positive(&self) -> bool {
        !self.raw.is_zero()
    }

    /// Exact decimal string, e.g. `1000000` at 6 decimals is `"1.0"`
    pub fn formatted(&self) -> String {
        format_units(self.raw, self.decimals)
    }

    /// Human amount as a float for valuation
    pub fn as_f64(&self) -> f64 {
        self.formatted().parse::<f64>().unwrap_or(0.0)
    }
}

/// Token plus the balance a discovery strategy observed for it
#[derive(Debug, Clone, PartialEq)]
pub struct TokenCandidate {
    pub token: Token,
    pub balance: Balance,
}

impl TokenCandidate {
    pub fn new(token: Token, raw: U256) -> Self {
        let balance = Balance::new(raw, token.decimals);
        Self { token, balance }
    }

    pub fn key(&self) -> TokenKey {
        self.token.key()
    }
}
