/// Discovery strategies: indexer snapshot and allowlist probe
use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::NetworkAdapter;
use crate::indexers::{IndexedToken, IndexerClient};
use crate::logger::{self, LogTag};
use crate::networks::{normalize_contract, AllowlistToken, Network};
use crate::pricing::coingecko_id_for_symbol;
use crate::tokens::{DiscoveryMethod, Token, TokenCandidate};

/// One way of finding what a wallet holds
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Fallback strategies are skipped once earlier ones found holdings
    fn is_fallback(&self) -> bool {
        false
    }

    /// Candidates for `address`; failures yield an empty list
    async fn discover(&self, address: &str) -> Vec<TokenCandidate>;
}

// =============================================================================
// INDEXER
// =============================================================================

/// Single batched account snapshot from a chain indexer
pub struct IndexerStrategy {
    indexer: Arc<dyn IndexerClient>,
    allowlist: Vec<AllowlistToken>,
}

impl IndexerStrategy {
    /// `allowlist` only marks reported tokens as verified
    pub fn new(indexer: Arc<dyn IndexerClient>, allowlist: Vec<AllowlistToken>) -> Self {
        Self { indexer, allowlist }
    }

    fn indexed_token(&self, network: Network, reported: IndexedToken) -> Option<TokenCandidate> {
        let Some(address) = normalize_contract(network, &reported.contract) else {
            logger::debug(
                LogTag::Discovery,
                &format!(
                    "{} indexer reported unparseable contract '{}'",
                    network, reported.contract
                ),
            );
            return None;
        };

        let symbol = reported.symbol.unwrap_or_else(|| "UNKNOWN".to_string());
        let name = reported.name.unwrap_or_else(|| symbol.clone());
        let decimals = reported
            .decimals
            .unwrap_or_else(|| network.default_token_decimals());
        let verified = self.allowlist.iter().any(|t| t.address == address);

        let token = Token {
            network,
            coingecko_id: coingecko_id_for_symbol(&symbol).map(str::to_string),
            address,
            symbol,
            name,
            decimals,
            is_native: false,
            discovery_method: DiscoveryMethod::Indexer,
            verified,
        };
        Some(TokenCandidate::new(token, reported.raw))
    }
}

#[async_trait]
impl DiscoveryStrategy for IndexerStrategy {
    fn name(&self) -> &str {
        self.indexer.name()
    }

    async fn discover(&self, address: &str) -> Vec<TokenCandidate> {
        let network = self.indexer.network();
        let Some(snapshot) = self.indexer.account_snapshot(address).await else {
            return Vec::new();
        };

        let mut candidates = Vec::with_capacity(snapshot.tokens.len() + 1);
        candidates.push(TokenCandidate::new(
            Token::native(network, DiscoveryMethod::Indexer),
            snapshot.native_raw,
        ));
        candidates.extend(
            snapshot
                .tokens
                .into_iter()
                .filter_map(|reported| self.indexed_token(network, reported)),
        );
        candidates
    }
}

// =============================================================================
// ALLOWLIST PROBE
// =============================================================================

/// Native read plus `balanceOf` against every allowlisted contract, concurrently
pub struct ProbeStrategy {
    adapter: Arc<dyn NetworkAdapter>,
    allowlist: Vec<AllowlistToken>,
}

impl ProbeStrategy {
    pub fn new(adapter: Arc<dyn NetworkAdapter>, allowlist: Vec<AllowlistToken>) -> Self {
        Self { adapter, allowlist }
    }

    fn probed_token(network: Network, listed: &AllowlistToken) -> Token {
        Token {
            network,
            address: listed.address.clone(),
            symbol: listed.symbol.clone(),
            name: listed.name.clone(),
            decimals: listed.decimals,
            is_native: false,
            coingecko_id: listed
                .coingecko_id
                .clone()
                .or_else(|| coingecko_id_for_symbol(&listed.symbol).map(str::to_string)),
            discovery_method: DiscoveryMethod::ContractProbe,
            verified: listed.verified,
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for ProbeStrategy {
    fn name(&self) -> &str {
        "allowlist-probe"
    }

    fn is_fallback(&self) -> bool {
        true
    }

    async fn discover(&self, address: &str) -> Vec<TokenCandidate> {
        let network = self.adapter.network();
        let contracts: Vec<String> = self.allowlist.iter().map(|t| t.address.clone()).collect();

        let (native_raw, token_raws) = tokio::join!(
            self.adapter.native_balance(address),
            self.adapter.token_balances(address, &contracts),
        );

        let mut candidates = Vec::with_capacity(self.allowlist.len() + 1);
        candidates.push(TokenCandidate::new(
            Token::native(network, DiscoveryMethod::Native),
            native_raw,
        ));
        candidates.extend(
            self.allowlist
                .iter()
                .zip(token_raws)
                .map(|(listed, raw)| TokenCandidate::new(Self::probed_token(network, listed), raw)),
        );
        candidates
    }
}
