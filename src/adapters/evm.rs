/// EVM adapter: balance reads and ERC-20 metadata over an alloy provider
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::sync::Arc;

use super::erc20::{self, IERC20};
use super::{MetadataSource, NetworkAdapter};
use crate::apis::EvmRpcClient;
use crate::cache::{CacheConfig, CacheManager};
use crate::clock::{system_clock, Clock};
use crate::config::Config;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use crate::networks::{address::evm_address, Network};
use crate::tokens::{TokenKey, TokenMetadata};

/// Decimals assumed when `decimals()` cannot be read
const DEFAULT_ERC20_DECIMALS: u8 = 18;

#[derive(Debug, Clone, Copy)]
enum TextField {
    Symbol,
    Name,
}

pub struct EvmAdapter {
    network: Network,
    rpc: EvmRpcClient,
    metadata_cache: CacheManager<TokenKey, TokenMetadata>,
}

impl EvmAdapter {
    pub fn new(
        network: Network,
        rpc_url: &str,
        timeout_secs: u64,
        metadata_cache: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            network,
            rpc: EvmRpcClient::new(rpc_url, timeout_secs)?,
            metadata_cache: CacheManager::with_clock(metadata_cache, clock),
        })
    }

    /// Adapter for `network` using its configured RPC endpoint
    pub fn from_config(
        network: Network,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ApiError> {
        let settings = config.evm(network).ok_or(ApiError::Disabled)?;
        let mut cache = CacheConfig::token_metadata();
        cache.ttl = std::time::Duration::from_secs(config.discovery.metadata_ttl_secs);
        Self::new(
            network,
            &settings.rpc_url_or_default(network),
            settings.timeout_secs,
            cache,
            clock,
        )
    }

    pub fn with_defaults(network: Network, rpc_url: &str) -> Result<Self, ApiError> {
        Self::new(network, rpc_url, 10, CacheConfig::token_metadata(), system_clock())
    }

    async fn read_text(&self, contract: Address, field: TextField) -> Option<String> {
        let erc20 = IERC20::new(contract, self.rpc.provider());
        let result = match field {
            TextField::Symbol => self.rpc.bounded(erc20.symbol().call_raw()).await,
            TextField::Name => self.rpc.bounded(erc20.name().call_raw()).await,
        };

        match result {
            Ok(data) => erc20::decode_text(&data),
            Err(e) => {
                logger::debug(
                    LogTag::Rpc,
                    &format!("{} {:?} on {} failed: {}", self.network, field, contract, e),
                );
                None
            }
        }
    }

    async fn read_decimals(&self, contract: Address) -> Option<u8> {
        let erc20 = IERC20::new(contract, self.rpc.provider());
        self.rpc.bounded(erc20.decimals().call()).await.ok()
    }

    pub fn metadata_cache_len(&self) -> usize {
        self.metadata_cache.len()
    }
}

#[async_trait]
impl NetworkAdapter for EvmAdapter {
    fn network(&self) -> Network {
        self.network
    }

    async fn native_balance(&self, address: &str) -> U256 {
        let Some(owner) = evm_address(address) else {
            return U256::ZERO;
        };

        match self.rpc.native_balance(owner).await {
            Ok(balance) => balance,
            Err(e) => {
                logger::warning(
                    LogTag::Rpc,
                    &format!("{} native balance read failed: {}", self.network, e),
                );
                U256::ZERO
            }
        }
    }

    async fn token_balance(&self, address: &str, contract: &str) -> U256 {
        let (Some(owner), Some(token)) = (evm_address(address), evm_address(contract)) else {
            return U256::ZERO;
        };

        let erc20 = IERC20::new(token, self.rpc.provider());
        match self.rpc.bounded(erc20.balanceOf(owner).call()).await {
            Ok(balance) => balance,
            Err(e) => {
                logger::debug(
                    LogTag::Rpc,
                    &format!("{} balanceOf on {} failed: {}", self.network, contract, e),
                );
                U256::ZERO
            }
        }
    }
}

#[async_trait]
impl MetadataSource for EvmAdapter {
    async fn token_metadata(&self, contract: &str) -> Option<TokenMetadata> {
        let key = TokenKey {
            network: self.network,
            address: contract.to_string(),
        };
        if let Some(cached) = self.metadata_cache.get(&key) {
            return Some(cached);
        }

        let token = evm_address(contract)?;
        let (symbol, name, decimals) = tokio::join!(
            self.read_text(token, TextField::Symbol),
            self.read_text(token, TextField::Name),
            self.read_decimals(token),
        );

        let (symbol, name) = match (symbol, name) {
            (None, None) => return None,
            (Some(symbol), Some(name)) => (symbol, name),
            (Some(symbol), None) => (symbol.clone(), symbol),
            (None, Some(name)) => (name.clone(), name),
        };

        let metadata = TokenMetadata {
            symbol,
            name,
            decimals: decimals.unwrap_or(DEFAULT_ERC20_DECIMALS),
        };
        self.metadata_cache.insert(key, metadata.clone());
        Some(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_rpc_reads_zero() {
        let adapter = EvmAdapter::new(
            Network::Ethereum,
            "http://127.0.0.1:1",
            1,
            CacheConfig::token_metadata(),
            system_clock(),
        )
        .expect("adapter builds");

        let owner = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert_eq!(adapter.native_balance(owner).await, U256::ZERO);
        assert_eq!(
            adapter
                .token_balance(owner, "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238")
                .await,
            U256::ZERO
        );
        assert!(adapter
            .token_metadata("0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238")
            .await
            .is_none());
        assert_eq!(adapter.metadata_cache_len(), 0);
    }

    #[tokio::test]
    async fn test_malformed_owner_reads_zero() {
        let adapter = EvmAdapter::with_defaults(Network::Celo, "http://127.0.0.1:1")
            .expect("adapter builds");
        assert_eq!(adapter.token_balance("not-hex", "0x00").await, U256::ZERO);
    }
}
