//! Per-chain balance readers
//!
//! Adapters never fail at the signature level: any transport error, timeout,
//! or malformed answer reads as a zero balance and is logged.

pub mod erc20;
pub mod evm;
pub mod tron;

use alloy::primitives::U256;
use async_trait::async_trait;
use futures::future::join_all;

use crate::networks::Network;
use crate::tokens::TokenMetadata;

pub use evm::EvmAdapter;
pub use tron::TronAdapter;

/// Balance reads for one network
#[async_trait]
pub trait NetworkAdapter: Send + Sync {
    fn network(&self) -> Network;

    /// Native balance in base units, `0` on any failure
    async fn native_balance(&self, address: &str) -> U256;

    /// Balance of `contract` held by `address`, `0` on any failure
    async fn token_balance(&self, address: &str, contract: &str) -> U256;

    /// Balances for several contracts, read concurrently, in input order
    async fn token_balances(&self, address: &str, contracts: &[String]) -> Vec<U256> {
        join_all(
            contracts
                .iter()
                .map(|contract| self.token_balance(address, contract)),
        )
        .await
    }
}

/// On-chain token metadata reader
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// `None` when the contract exposes neither a symbol nor a name
    async fn token_metadata(&self, contract: &str) -> Option<TokenMetadata>;
}
