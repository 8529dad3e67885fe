//! Token discovery for one wallet on one network
//!
//! An orchestrator runs an ordered list of [`DiscoveryStrategy`]
//! implementations. The usual setup is indexer first, then an allowlist probe
//! that only runs when nothing positive was found before it. Results are
//! filtered to positive balances and deduplicated by identity key, with
//! earlier strategies winning.

mod merge;
mod strategies;

pub use merge::merge_candidates;
pub use strategies::{DiscoveryStrategy, IndexerStrategy, ProbeStrategy};

use crate::logger::{self, LogTag};
use crate::networks::Network;
use crate::tokens::TokenCandidate;

pub struct DiscoveryOrchestrator {
    network: Network,
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
}

impl DiscoveryOrchestrator {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy; order of calls is execution order
    pub fn with_strategy(mut self, strategy: Box<dyn DiscoveryStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Positive, deduplicated holdings of `address`
    ///
    /// Expects a validated address. Never fails: exhausted strategies yield
    /// an empty list.
    pub async fn discover(&self, address: &str) -> Vec<TokenCandidate> {
        let mut found: Vec<TokenCandidate> = Vec::new();

        for strategy in &self.strategies {
            if strategy.is_fallback() && !found.is_empty() {
                logger::debug(
                    LogTag::Discovery,
                    &format!(
                        "{}: skipping fallback '{}', {} holdings already found",
                        self.network,
                        strategy.name(),
                        found.len()
                    ),
                );
                continue;
            }

            let batch = strategy.discover(address).await;
            let reported = batch.len();
            found = merge_candidates(found, batch);

            logger::debug(
                LogTag::Discovery,
                &format!(
                    "{}: '{}' reported {} candidates, {} holdings so far",
                    self.network,
                    strategy.name(),
                    reported,
                    found.len()
                ),
            );
        }

        logger::info(
            LogTag::Discovery,
            &format!(
                "Discovered {} tokens for {} on {}",
                found.len(),
                address,
                self.network
            ),
        );
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{DiscoveryMethod, Token};
    use alloy::primitives::U256;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedStrategy {
        name: &'static str,
        fallback: bool,
        candidates: Vec<TokenCandidate>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DiscoveryStrategy for FixedStrategy {
        fn name(&self) -> &str {
            self.name
        }

        fn is_fallback(&self) -> bool {
            self.fallback
        }

        async fn discover(&self, _address: &str) -> Vec<TokenCandidate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.candidates.clone()
        }
    }

    fn usdt(method: DiscoveryMethod, raw: u64) -> TokenCandidate {
        TokenCandidate::new(
            Token {
                network: Network::Tron,
                address: "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf".to_string(),
                symbol: "USDT".to_string(),
                name: "Tether USD".to_string(),
                decimals: 6,
                is_native: false,
                coingecko_id: Some("tether".to_string()),
                discovery_method: method,
                verified: true,
            },
            U256::from(raw),
        )
    }

    fn strategy(
        name: &'static str,
        fallback: bool,
        candidates: Vec<TokenCandidate>,
    ) -> (Box<dyn DiscoveryStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(FixedStrategy {
                name,
                fallback,
                candidates,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    #[tokio::test]
    async fn test_fallback_runs_when_indexer_finds_nothing() {
        let (indexer, _) = strategy("indexer", false, vec![]);
        let (probe, probe_calls) =
            strategy("probe", true, vec![usdt(DiscoveryMethod::ContractProbe, 5)]);

        let orchestrator = DiscoveryOrchestrator::new(Network::Tron)
            .with_strategy(indexer)
            .with_strategy(probe);
        let found = orchestrator.discover("T...").await;

        assert_eq!(probe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].token.discovery_method, DiscoveryMethod::ContractProbe);
    }

    #[tokio::test]
    async fn test_fallback_skipped_after_positive_indexer_result() {
        let (indexer, _) = strategy("indexer", false, vec![usdt(DiscoveryMethod::Indexer, 9)]);
        let (probe, probe_calls) =
            strategy("probe", true, vec![usdt(DiscoveryMethod::ContractProbe, 5)]);

        let orchestrator = DiscoveryOrchestrator::new(Network::Tron)
            .with_strategy(indexer)
            .with_strategy(probe);
        let found = orchestrator.discover("T...").await;

        assert_eq!(probe_calls.load(Ordering::SeqCst), 0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].balance.raw, U256::from(9u8));
    }

    #[tokio::test]
    async fn test_indexer_wins_when_both_report_same_token() {
        let (indexer, _) = strategy("indexer", false, vec![usdt(DiscoveryMethod::Indexer, 9)]);
        let (probe, _) = strategy("probe", false, vec![usdt(DiscoveryMethod::ContractProbe, 5)]);

        let found = DiscoveryOrchestrator::new(Network::Tron)
            .with_strategy(indexer)
            .with_strategy(probe)
            .discover("T...")
            .await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].token.discovery_method, DiscoveryMethod::Indexer);
        assert_eq!(found[0].balance.raw, U256::from(9u8));
    }

    #[tokio::test]
    async fn test_zero_balances_only_indexer_triggers_fallback() {
        let (indexer, _) = strategy("indexer", false, vec![usdt(DiscoveryMethod::Indexer, 0)]);
        let (probe, probe_calls) = strategy("probe", true, vec![]);

        let found = DiscoveryOrchestrator::new(Network::Tron)
            .with_strategy(indexer)
            .with_strategy(probe)
            .discover("T...")
            .await;

        assert!(found.is_empty());
        assert_eq!(probe_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_strategies_is_empty() {
        let orchestrator = DiscoveryOrchestrator::new(Network::Celo);
        assert!(orchestrator.strategy_names().is_empty());
        assert!(orchestrator.discover("0x00").await.is_empty());
    }
}
