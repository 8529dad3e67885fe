//! Portfolio entry point: validate, discover, price, aggregate
//!
//! ```rust,ignore
//! let service = PortfolioService::from_config(&config)?;
//! let snapshot = service
//!     .discover_and_price("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", Network::Tron)
//!     .await?;
//! ```

use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::adapters::{EvmAdapter, MetadataSource, NetworkAdapter, TronAdapter};
use crate::clock::{system_clock, Clock};
use crate::config::{get_config_clone, Config};
use crate::discovery::{DiscoveryOrchestrator, IndexerStrategy, ProbeStrategy};
use crate::errors::{AddressError, ApiError};
use crate::indexers::{AlchemyIndexer, TronScanIndexer};
use crate::logger::{self, LogTag};
use crate::networks::{allowlist_for, validate_address, Network};
use crate::portfolio::{aggregate, PortfolioSnapshot};
use crate::pricing::PriceResolver;
use crate::tokens::TokenCandidate;

pub struct PortfolioService {
    orchestrators: HashMap<Network, DiscoveryOrchestrator>,
    prices: PriceResolver,
    clock: Arc<dyn Clock>,
}

/// Assembles a service from explicit parts
pub struct PortfolioServiceBuilder {
    orchestrators: HashMap<Network, DiscoveryOrchestrator>,
    prices: PriceResolver,
    clock: Arc<dyn Clock>,
}

impl PortfolioServiceBuilder {
    pub fn new(prices: PriceResolver) -> Self {
        Self {
            orchestrators: HashMap::new(),
            prices,
            clock: system_clock(),
        }
    }

    /// Enable the orchestrator's network; a later call for the same network replaces it
    pub fn with_orchestrator(mut self, orchestrator: DiscoveryOrchestrator) -> Self {
        self.orchestrators.insert(orchestrator.network(), orchestrator);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> PortfolioService {
        PortfolioService {
            orchestrators: self.orchestrators,
            prices: self.prices,
            clock: self.clock,
        }
    }
}

impl PortfolioService {
    pub fn builder(prices: PriceResolver) -> PortfolioServiceBuilder {
        PortfolioServiceBuilder::new(prices)
    }

    /// Service over the globally installed configuration
    pub fn from_global_config() -> Result<Self, ApiError> {
        Self::from_config(&get_config_clone())
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::from_config_with_clock(config, system_clock())
    }

    /// Wire adapters, indexers and strategies for every enabled network
    pub fn from_config_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, ApiError> {
        let prices = PriceResolver::from_config(&config.prices, clock.clone())?;
        let mut builder = Self::builder(prices).with_clock(clock.clone());

        for network in Network::ALL {
            if !config.is_network_enabled(network) {
                logger::debug(LogTag::Config, &format!("{} disabled in config", network));
                continue;
            }
            let orchestrator = build_orchestrator(network, config, clock.clone())?;
            logger::debug(
                LogTag::Config,
                &format!("{} strategies: {:?}", network, orchestrator.strategy_names()),
            );
            builder = builder.with_orchestrator(orchestrator);
        }

        Ok(builder.build())
    }

    pub fn enabled_networks(&self) -> Vec<Network> {
        let mut networks: Vec<Network> = self.orchestrators.keys().copied().collect();
        networks.sort();
        networks
    }

    pub fn price_resolver(&self) -> &PriceResolver {
        &self.prices
    }

    fn check_wallet(&self, address: &str, network: Network) -> Result<String, AddressError> {
        let canonical = validate_address(network, address)?;
        if !self.orchestrators.contains_key(&network) {
            return Err(AddressError::NetworkDisabled { network });
        }
        Ok(canonical)
    }

    async fn discover(&self, address: &str, network: Network) -> Vec<TokenCandidate> {
        match self.orchestrators.get(&network) {
            Some(orchestrator) => orchestrator.discover(address).await,
            None => Vec::new(),
        }
    }

    async fn price_and_aggregate(
        &self,
        networks: &[Network],
        candidates: Vec<TokenCandidate>,
    ) -> PortfolioSnapshot {
        let ids: Vec<String> = candidates
            .iter()
            .filter(|c| c.balance.is_positive())
            .filter_map(|c| c.token.coingecko_id.clone())
            .collect();
        let prices = self.prices.resolve_prices(&ids).await;

        let snapshot = aggregate(networks, candidates, &prices, self.clock.now());
        logger::info(
            LogTag::Portfolio,
            &format!(
                "Portfolio: {} tokens worth ${:.2} across {} networks",
                snapshot.token_count,
                snapshot.total_usd_value,
                snapshot.chain_totals.len()
            ),
        );
        snapshot
    }

    /// Holdings of one wallet with USD valuations
    ///
    /// Only a malformed address or a disabled network is an error; every
    /// upstream failure degrades to missing tokens or fallback prices.
    pub async fn discover_and_price(
        &self,
        address: &str,
        network: Network,
    ) -> Result<PortfolioSnapshot, AddressError> {
        let canonical = self.check_wallet(address, network)?;
        let candidates = self.discover(&canonical, network).await;
        Ok(self.price_and_aggregate(&[network], candidates).await)
    }

    /// Combined snapshot for several wallets
    ///
    /// Every pair is validated before any network call. Repeated pairs are
    /// discovered once; one token held by several wallets becomes one summed
    /// entry. Prices are resolved in a single batch.
    pub async fn discover_and_price_many(
        &self,
        wallets: &[(String, Network)],
    ) -> Result<PortfolioSnapshot, AddressError> {
        let mut unique: BTreeSet<(Network, String)> = BTreeSet::new();
        for (address, network) in wallets {
            unique.insert((*network, self.check_wallet(address, *network)?));
        }

        let discovered = join_all(
            unique
                .iter()
                .map(|(network, address)| self.discover(address, *network)),
        )
        .await;

        let mut networks: Vec<Network> = unique.iter().map(|(network, _)| *network).collect();
        networks.dedup();

        let candidates: Vec<TokenCandidate> = discovered.into_iter().flatten().collect();
        Ok(self.price_and_aggregate(&networks, candidates).await)
    }
}

/// Indexer strategy (when available) followed by the allowlist probe
fn build_orchestrator(
    network: Network,
    config: &Config,
    clock: Arc<dyn Clock>,
) -> Result<DiscoveryOrchestrator, ApiError> {
    let discovery = &config.discovery;
    let mut orchestrator = DiscoveryOrchestrator::new(network);

    let (adapter, allowlist): (Arc<dyn NetworkAdapter>, _) = match network {
        Network::Tron => {
            let tron = &config.networks.tron;
            let allowlist = allowlist_for(network, &tron.extra_tokens);
            if discovery.indexer_enabled {
                let indexer = TronScanIndexer::from_config(tron)?;
                orchestrator = orchestrator.with_strategy(Box::new(IndexerStrategy::new(
                    Arc::new(indexer),
                    allowlist.clone(),
                )));
            }
            (
                Arc::new(TronAdapter::from_config(tron)?) as Arc<dyn NetworkAdapter>,
                allowlist,
            )
        }
        Network::Ethereum | Network::Celo => {
            let evm = Arc::new(EvmAdapter::from_config(network, config, clock)?);
            let extra = config
                .evm(network)
                .map(|settings| settings.extra_tokens.as_slice())
                .unwrap_or_default();
            let allowlist = allowlist_for(network, extra);

            if discovery.indexer_enabled {
                let metadata: Arc<dyn MetadataSource> = evm.clone();
                if let Some(indexer) = AlchemyIndexer::from_config(network, config, metadata) {
                    orchestrator = orchestrator.with_strategy(Box::new(IndexerStrategy::new(
                        Arc::new(indexer),
                        allowlist.clone(),
                    )));
                }
            }
            (evm as Arc<dyn NetworkAdapter>, allowlist)
        }
    };

    if discovery.probe_enabled {
        orchestrator = orchestrator.with_strategy(Box::new(ProbeStrategy::new(adapter, allowlist)));
    }
    Ok(orchestrator)
}
