//! Static per-network token allowlists for contract probing
//!
//! The probe strategy reads `balanceOf` for every entry here when the indexer
//! path yields nothing. Config `extra_tokens` are appended per network.

use super::{normalize_contract, Network};
use crate::config::TokenListEntry;
use crate::logger::{self, LogTag};

#[derive(Debug, Clone, PartialEq)]
pub struct AllowlistToken {
    /// Canonical contract address
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub coingecko_id: Option<String>,
    pub verified: bool,
}

struct StaticToken {
    address: &'static str,
    symbol: &'static str,
    name: &'static str,
    decimals: u8,
    coingecko_id: &'static str,
    verified: bool,
}

const ETHEREUM_TOKENS: &[StaticToken] = &[
    StaticToken {
        address: "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238",
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        coingecko_id: "usd-coin",
        verified: true,
    },
    StaticToken {
        address: "0x7b79995e5f793A07Bc00c21412e50Ecae098E7f9",
        symbol: "WETH",
        name: "Wrapped Ether",
        decimals: 18,
        coingecko_id: "weth",
        verified: true,
    },
    StaticToken {
        address: "0x7169D38820dfd117C3FA1f22a697dBA58d90BA06",
        symbol: "USDT",
        name: "Tether USD",
        decimals: 6,
        coingecko_id: "tether",
        verified: true,
    },
    StaticToken {
        address: "0x2227C4aE0fA56F51d4e6A46b13C2f8b9a2A5B3E3",
        symbol: "DAI",
        name: "Dai Stablecoin",
        decimals: 18,
        coingecko_id: "dai",
        verified: true,
    },
    StaticToken {
        address: "0x779877A7B0D9E8603169DdbD7836e478b4624789",
        symbol: "LINK",
        name: "ChainLink Token",
        decimals: 18,
        coingecko_id: "chainlink",
        verified: true,
    },
];

const CELO_TOKENS: &[StaticToken] = &[
    StaticToken {
        address: "0x874069Fa1Eb16D44d622F2e0Ca25eeA172369bC1",
        symbol: "cUSD",
        name: "Celo Dollar",
        decimals: 18,
        coingecko_id: "celo-dollar",
        verified: true,
    },
    StaticToken {
        address: "0x10c892A6EC43a53E45D0B916B4b7D383B1b78C0F",
        symbol: "cEUR",
        name: "Celo Euro",
        decimals: 18,
        coingecko_id: "celo-euro",
        verified: true,
    },
    StaticToken {
        address: "0xBba91F588d031469ABCCA566FE80fB1Ad8Ee3287",
        symbol: "USDT",
        name: "Tether USD",
        decimals: 6,
        coingecko_id: "tether",
        verified: true,
    },
    StaticToken {
        address: "0x2F25deB3848C207fc8E0c34035B3Ba7fC157602B",
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        coingecko_id: "usd-coin",
        verified: true,
    },
    StaticToken {
        address: "0xF194afDf50B03e69Bd7D057c1Aa9e10c9954E4C9",
        symbol: "cREAL",
        name: "Celo Brazilian Real",
        decimals: 18,
        coingecko_id: "celo-brazilian-real",
        verified: true,
    },
];

const TRON_TOKENS: &[StaticToken] = &[
    StaticToken {
        address: "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf",
        symbol: "USDT",
        name: "Tether USD",
        decimals: 6,
        coingecko_id: "tether",
        verified: true,
    },
    StaticToken {
        address: "TEkxiTehnzSmSe2XqrBj4w32RUN966rdz8",
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        coingecko_id: "usd-coin",
        verified: true,
    },
    StaticToken {
        address: "TG3XXyExBkPp9nzdajDZsozEu4BkaSJozs",
        symbol: "USDT",
        name: "Tether USD (Alternative)",
        decimals: 6,
        coingecko_id: "tether",
        verified: false,
    },
];

fn static_tokens(network: Network) -> &'static [StaticToken] {
    match network {
        Network::Tron => TRON_TOKENS,
        Network::Ethereum => ETHEREUM_TOKENS,
        Network::Celo => CELO_TOKENS,
    }
}

/// Built-in allowlist for `network` followed by `extra` entries
///
/// Entries whose address does not normalize are skipped, as are later
/// duplicates of an address already listed.
pub fn allowlist_for(network: Network, extra: &[TokenListEntry]) -> Vec<AllowlistToken> {
    let builtin = static_tokens(network).iter().map(|t| {
        (
            t.address,
            AllowlistToken {
                address: String::new(),
                symbol: t.symbol.to_string(),
                name: t.name.to_string(),
                decimals: t.decimals,
                coingecko_id: Some(t.coingecko_id.to_string()),
                verified: t.verified,
            },
        )
    });
    let configured = extra.iter().map(|t| {
        (
            t.address.as_str(),
            AllowlistToken {
                address: String::new(),
                symbol: t.symbol.clone(),
                name: t.name.clone(),
                decimals: t.decimals,
                coingecko_id: t.coingecko_id.clone(),
                verified: false,
            },
        )
    });

    let mut tokens: Vec<AllowlistToken> = Vec::new();
    for (raw_address, mut token) in builtin.chain(configured) {
        let Some(address) = normalize_contract(network, raw_address) else {
            logger::warning(
                LogTag::Config,
                &format!(
                    "Skipping {} allowlist entry {} with unparseable address '{}'",
                    network, token.symbol, raw_address
                ),
            );
            continue;
        };
        if tokens.iter().any(|t| t.address == address) {
            continue;
        }
        token.address = address;
        tokens.push(token);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ethereum_allowlist_is_canonical() {
        let tokens = allowlist_for(Network::Ethereum, &[]);
        assert!(tokens.len() >= 3);
        let usdc = tokens
            .iter()
            .find(|t| t.symbol == "USDC")
            .expect("USDC listed");
        assert_eq!(usdc.address, "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");
        assert_eq!(usdc.decimals, 6);
        assert_eq!(usdc.coingecko_id.as_deref(), Some("usd-coin"));
    }

    #[test]
    fn test_tron_allowlist_contains_nile_usdt() {
        let tokens = allowlist_for(Network::Tron, &[]);
        assert!(tokens
            .iter()
            .any(|t| t.address == "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf" && t.decimals == 6));
    }

    #[test]
    fn test_extra_tokens_are_appended_and_deduped() {
        let extra = vec![
            TokenListEntry {
                address: "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".to_string(),
                symbol: "TST".to_string(),
                name: "Test Token".to_string(),
                decimals: 8,
                coingecko_id: None,
            },
            TokenListEntry {
                address: "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238".to_string(),
                symbol: "USDC2".to_string(),
                name: "Duplicate".to_string(),
                decimals: 6,
                coingecko_id: None,
            },
            TokenListEntry {
                address: "not-an-address".to_string(),
                symbol: "BAD".to_string(),
                name: "Bad".to_string(),
                decimals: 6,
                coingecko_id: None,
            },
        ];

        let base = allowlist_for(Network::Ethereum, &[]).len();
        let tokens = allowlist_for(Network::Ethereum, &extra);
        assert_eq!(tokens.len(), base + 1);

        let added = tokens.last().expect("extra token present");
        assert_eq!(added.address, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(!added.verified);
    }
}
