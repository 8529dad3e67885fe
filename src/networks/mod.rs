//! Supported networks, their address rules, and probe allowlists

pub mod address;
pub mod allowlist;

use crate::config::{
    DEFAULT_CELO_RPC_URL, DEFAULT_ETHEREUM_RPC_URL, DEFAULT_TRONGRID_URL,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use address::{normalize_contract, validate_address};
pub use allowlist::{allowlist_for, AllowlistToken};

/// Account/addressing model of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
    /// Base58check `T...` accounts, TRC-20 tokens
    Tron,
    /// 20-byte hex accounts, ERC-20 tokens, JSON-RPC
    Evm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Tron,
    Ethereum,
    Celo,
}

/// Base asset of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeAsset {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub coingecko_id: &'static str,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Tron, Network::Ethereum, Network::Celo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Tron => "tron",
            Network::Ethereum => "ethereum",
            Network::Celo => "celo",
        }
    }

    pub fn family(&self) -> ChainFamily {
        match self {
            Network::Tron => ChainFamily::Tron,
            Network::Ethereum | Network::Celo => ChainFamily::Evm,
        }
    }

    pub fn native_asset(&self) -> NativeAsset {
        match self {
            Network::Tron => NativeAsset {
                symbol: "TRX",
                name: "TRON",
                decimals: 6,
                coingecko_id: "tron",
            },
            Network::Ethereum => NativeAsset {
                symbol: "ETH",
                name: "Ethereum",
                decimals: 18,
                coingecko_id: "ethereum",
            },
            Network::Celo => NativeAsset {
                symbol: "CELO",
                name: "Celo",
                decimals: 18,
                coingecko_id: "celo",
            },
        }
    }

    /// Decimals assumed when a token source omits them
    pub fn default_token_decimals(&self) -> u8 {
        match self.family() {
            ChainFamily::Tron => 6,
            ChainFamily::Evm => 18,
        }
    }

    /// Public RPC / full-node endpoint used when config leaves it empty
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Tron => DEFAULT_TRONGRID_URL,
            Network::Ethereum => DEFAULT_ETHEREUM_RPC_URL,
            Network::Celo => DEFAULT_CELO_RPC_URL,
        }
    }

    fn explorer_base(&self) -> &'static str {
        match self {
            Network::Tron => "https://nile.tronscan.org/#",
            Network::Ethereum => "https://sepolia.etherscan.io",
            Network::Celo => "https://alfajores.celoscan.io",
        }
    }

    pub fn explorer_address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tron" | "trx" => Ok(Network::Tron),
            "ethereum" | "eth" => Ok(Network::Ethereum),
            "celo" => Ok(Network::Celo),
            other => Err(format!("Unknown network '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parsing_and_display_agree() {
        for network in Network::ALL {
            assert_eq!(network.as_str().parse::<Network>(), Ok(network));
        }
        assert_eq!("ETH".parse::<Network>(), Ok(Network::Ethereum));
        assert!("solana".parse::<Network>().is_err());
    }

    #[test]
    fn test_native_assets() {
        assert_eq!(Network::Tron.native_asset().decimals, 6);
        assert_eq!(Network::Celo.native_asset().coingecko_id, "celo");
        assert_eq!(Network::Ethereum.family(), ChainFamily::Evm);
    }

    #[test]
    fn test_explorer_urls() {
        assert_eq!(
            Network::Tron.explorer_address_url("TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf"),
            "https://nile.tronscan.org/#/address/TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf"
        );
        assert_eq!(
            Network::Celo.explorer_address_url("0xabc"),
            "https://alfajores.celoscan.io/address/0xabc"
        );
    }
}
