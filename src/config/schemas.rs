use crate::config_struct;
use serde::{Deserialize, Serialize};

// ============================================================================
// DEFAULT ENDPOINTS (testnets)
// ============================================================================

pub const DEFAULT_TRONSCAN_URL: &str = "https://nileapi.tronscan.org";
pub const DEFAULT_TRONGRID_URL: &str = "https://nile.trongrid.io";
pub const DEFAULT_ETHEREUM_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";
pub const DEFAULT_ETHEREUM_ALCHEMY_URL: &str = "https://eth-sepolia.g.alchemy.com/v2";
pub const DEFAULT_CELO_RPC_URL: &str = "https://alfajores-forno.celo-testnet.org";
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Extra token the user wants probed on top of the built-in allowlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenListEntry {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default)]
    pub coingecko_id: Option<String>,
}

// ============================================================================
// NETWORKS
// ============================================================================

config_struct! {
    /// Tron endpoints: TronScan-style indexer plus TronGrid full node
    pub struct TronNetworkConfig {
        enabled: bool = true,
        indexer_url: String = DEFAULT_TRONSCAN_URL.to_string(),
        node_url: String = DEFAULT_TRONGRID_URL.to_string(),
        /// Sent as TRON-PRO-API-KEY when present
        api_key: Option<String> = None,
        timeout_secs: u64 = 10,
        extra_tokens: Vec<TokenListEntry> = Vec::new(),
    }
}

config_struct! {
    /// EVM endpoints. Empty `rpc_url` falls back to the network default.
    pub struct EvmNetworkConfig {
        enabled: bool = true,
        rpc_url: String = String::new(),
        /// Alchemy-style token balance indexer base URL (API key appended)
        indexer_url: Option<String> = None,
        indexer_api_key: Option<String> = None,
        timeout_secs: u64 = 10,
        extra_tokens: Vec<TokenListEntry> = Vec::new(),
    }
}

config_struct! {
    pub struct NetworksConfig {
        tron: TronNetworkConfig = TronNetworkConfig::default(),
        ethereum: EvmNetworkConfig = EvmNetworkConfig {
            rpc_url: DEFAULT_ETHEREUM_RPC_URL.to_string(),
            indexer_url: Some(DEFAULT_ETHEREUM_ALCHEMY_URL.to_string()),
            ..EvmNetworkConfig::default()
        },
        celo: EvmNetworkConfig = EvmNetworkConfig {
            rpc_url: DEFAULT_CELO_RPC_URL.to_string(),
            ..EvmNetworkConfig::default()
        },
    }
}

// ============================================================================
// PRICES
// ============================================================================

config_struct! {
    /// Price service (CoinGecko simple/price compatible)
    pub struct PricesConfig {
        enabled: bool = true,
        base_url: String = DEFAULT_COINGECKO_URL.to_string(),
        /// Sent as x-cg-demo-api-key when present
        api_key: Option<String> = None,
        cache_ttl_secs: u64 = 300,
        cache_capacity: usize = 256,
        timeout_secs: u64 = 10,
        /// Demo tier allows 30 calls a minute; 0 disables spacing
        rate_limit_per_minute: usize = 30,
    }
}

// ============================================================================
// DISCOVERY
// ============================================================================

config_struct! {
    pub struct DiscoveryConfig {
        indexer_enabled: bool = true,
        probe_enabled: bool = true,
        /// ERC-20 metadata cache lifetime
        metadata_ttl_secs: u64 = 24 * 60 * 60,
    }
}

// ============================================================================
// LOGGING / RATE LIMIT
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        level: String = "info".to_string(),
        debug_tags: Vec<String> = Vec::new(),
        console: bool = true,
    }
}

config_struct! {
    pub struct RateLimitConfig {
        window_secs: u64 = 24 * 60 * 60,
        /// SQLite file shared by every instance; in-memory when unset
        store_path: Option<String> = None,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    pub struct Config {
        networks: NetworksConfig = NetworksConfig::default(),
        prices: PricesConfig = PricesConfig::default(),
        discovery: DiscoveryConfig = DiscoveryConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
        rate_limit: RateLimitConfig = RateLimitConfig::default(),
    }
}
