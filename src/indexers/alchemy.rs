/// Alchemy-style EVM indexer
///
/// `eth_getBalance` plus `alchemy_getTokenBalances(address)`; token metadata
/// comes from the adapter's ERC-20 reader. The API key is part of the
/// endpoint path and is scrubbed from errors.
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;

use super::{AccountSnapshot, IndexedToken, IndexerClient};
use crate::adapters::MetadataSource;
use crate::apis::EvmRpcClient;
use crate::config::{Config, DEFAULT_ETHEREUM_ALCHEMY_URL};
use crate::errors::ApiError;
use crate::logger::{self, LogTag};
use crate::networks::{address::evm_address, Network};
use crate::tokens::parse_hex_quantity;

pub struct AlchemyIndexer {
    network: Network,
    rpc: EvmRpcClient,
    metadata: Arc<dyn MetadataSource>,
}

/// Positive, error-free `(contract, raw)` pairs; anything partial is skipped
fn held_tokens(result: &Value) -> Vec<(String, U256)> {
    let Some(entries) = result.get("tokenBalances").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|entry| entry.get("error").map_or(true, Value::is_null))
        .filter_map(|entry| {
            let contract = entry
                .get("contractAddress")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())?;
            let raw = entry
                .get("tokenBalance")
                .and_then(Value::as_str)
                .and_then(parse_hex_quantity)?;
            (!raw.is_zero()).then(|| (contract.to_string(), raw))
        })
        .collect()
}

impl AlchemyIndexer {
    /// Networks the provider serves
    pub fn supports(network: Network) -> bool {
        matches!(network, Network::Ethereum)
    }

    /// Indexer at `{base_url}/{api_key}`
    pub fn new(
        network: Network,
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        metadata: Arc<dyn MetadataSource>,
    ) -> Result<Self, ApiError> {
        let endpoint = format!("{}/{}", base_url.trim_end_matches('/'), api_key);
        let rpc = EvmRpcClient::new(&endpoint, timeout_secs)
            .map_err(|e| e.redact(api_key))?
            .with_secret(api_key);

        Ok(Self {
            network,
            rpc,
            metadata,
        })
    }

    /// `None` unless the network is served and an API key is configured
    pub fn from_config(
        network: Network,
        config: &Config,
        metadata: Arc<dyn MetadataSource>,
    ) -> Option<Self> {
        if !Self::supports(network) {
            return None;
        }
        let settings = config.evm(network)?;
        let base = settings
            .indexer_url
            .as_deref()
            .unwrap_or(DEFAULT_ETHEREUM_ALCHEMY_URL);
        let key = settings
            .indexer_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())?;

        match Self::new(network, base, key, settings.timeout_secs, metadata) {
            Ok(indexer) => Some(indexer),
            Err(e) => {
                logger::warning(
                    LogTag::Indexer,
                    &format!("Alchemy indexer for {} unavailable: {}", network, e),
                );
                None
            }
        }
    }

    async fn fetch(&self, owner: Address) -> Result<(U256, Vec<(String, U256)>), ApiError> {
        let (native, balances) = tokio::join!(
            self.rpc.native_balance(owner),
            self.rpc.raw_json("alchemy_getTokenBalances", (owner,)),
        );

        Ok((native?, held_tokens(&balances?)))
    }
}

#[async_trait]
impl IndexerClient for AlchemyIndexer {
    fn network(&self) -> Network {
        self.network
    }

    fn name(&self) -> &'static str {
        "alchemy"
    }

    async fn account_snapshot(&self, address: &str) -> Option<AccountSnapshot> {
        let owner = evm_address(address)?;
        let (native_raw, held) = match self.fetch(owner).await {
            Ok(result) => result,
            Err(e) => {
                logger::warning(
                    LogTag::Indexer,
                    &format!("Alchemy lookup on {} failed: {}", self.network, e),
                );
                return None;
            }
        };

        let metadata = join_all(
            held.iter()
                .map(|(contract, _)| self.metadata.token_metadata(contract)),
        )
        .await;

        let tokens: Vec<IndexedToken> = held
            .into_iter()
            .zip(metadata)
            .filter_map(|((contract, raw), meta)| {
                let Some(meta) = meta else {
                    logger::debug(
                        LogTag::Indexer,
                        &format!("Skipping {} token {}: no metadata", self.network, contract),
                    );
                    return None;
                };
                Some(IndexedToken {
                    contract,
                    symbol: Some(meta.symbol),
                    name: Some(meta.name),
                    decimals: Some(meta.decimals),
                    raw,
                })
            })
            .collect();

        Some(AccountSnapshot { native_raw, tokens })
    }
}
