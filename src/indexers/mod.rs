//! Chain indexers: one batched call for the whole account
//!
//! Any failure reads as `None` and sends discovery to the probe path.

pub mod alchemy;
pub mod tronscan;

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::networks::Network;

pub use alchemy::AlchemyIndexer;
pub use tronscan::TronScanIndexer;

/// Token balance as reported by an indexer; fields it omitted stay `None`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedToken {
    /// Contract address as reported (not yet canonical)
    pub contract: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u8>,
    pub raw: U256,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountSnapshot {
    pub native_raw: U256,
    pub tokens: Vec<IndexedToken>,
}

#[async_trait]
pub trait IndexerClient: Send + Sync {
    fn network(&self) -> Network;

    /// Short provider name for logs
    fn name(&self) -> &'static str;

    async fn account_snapshot(&self, address: &str) -> Option<AccountSnapshot>;
}
