//! USD price resolution with cache and static fallbacks
//!
//! [`PriceResolver::resolve_prices`] never fails. Per ID the answer is, in
//! order: a positive live quote, the fallback table entry, or `0.0`.

mod cache;
mod fallback;

pub use cache::PriceCache;
pub use fallback::{coingecko_id_for_symbol, fallback_price};

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::apis::CoinGeckoClient;
use crate::cache::CacheConfig;
use crate::clock::{system_clock, Clock};
use crate::config::PricesConfig;
use crate::errors::ApiError;
use crate::logger::{self, LogTag};

/// Batched USD quote provider
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Prices for the IDs the source knows; unknown IDs are absent
    async fn fetch_usd_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, ApiError>;
}

pub struct PriceResolver {
    source: Arc<dyn PriceSource>,
    cache: PriceCache,
}

impl PriceResolver {
    pub fn new(source: Arc<dyn PriceSource>, cache: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: PriceCache::new(cache, clock),
        }
    }

    /// CoinGecko-backed resolver from the `[prices]` section
    pub fn from_config(config: &PricesConfig, clock: Arc<dyn Clock>) -> Result<Self, ApiError> {
        let client = CoinGeckoClient::from_config(config)?;
        Ok(Self::new(
            Arc::new(client),
            CacheConfig::custom(config.cache_ttl_secs, config.cache_capacity),
            clock,
        ))
    }

    pub fn with_source(source: Arc<dyn PriceSource>) -> Self {
        Self::new(source, CacheConfig::price_quotes(), system_clock())
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// USD price for every non-empty ID in `ids`
    pub async fn resolve_prices(&self, ids: &[String]) -> HashMap<String, f64> {
        let wanted: BTreeSet<String> = ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if wanted.is_empty() {
            return HashMap::new();
        }

        let live = match self.cache.get(&wanted) {
            Some(cached) => {
                logger::debug(
                    LogTag::Cache,
                    &format!("Price cache hit for {}", PriceCache::key_for(&wanted)),
                );
                cached
            }
            None => self.fetch_live(&wanted).await,
        };

        wanted
            .into_iter()
            .map(|id| {
                let price = live
                    .get(&id)
                    .copied()
                    .filter(|p| p.is_finite() && *p > 0.0)
                    .or_else(|| fallback_price(&id))
                    .unwrap_or(0.0);
                (id, price)
            })
            .collect()
    }

    async fn fetch_live(&self, wanted: &BTreeSet<String>) -> HashMap<String, f64> {
        let ids: Vec<String> = wanted.iter().cloned().collect();
        match self.source.fetch_usd_prices(&ids).await {
            Ok(prices) => {
                if prices.len() < ids.len() {
                    logger::debug(
                        LogTag::Prices,
                        &format!(
                            "Live prices missing for {} of {} ids",
                            ids.len() - prices.len(),
                            ids.len()
                        ),
                    );
                }
                self.cache.insert(wanted, prices.clone());
                prices
            }
            Err(e) => {
                logger::warning(
                    LogTag::Prices,
                    &format!("Price service unavailable, using fallback prices: {}", e),
                );
                HashMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedSource {
        responses: Mutex<Vec<Result<HashMap<String, f64>, ApiError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<HashMap<String, f64>, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        async fn fetch_usd_prices(&self, _ids: &[String]) -> Result<HashMap<String, f64>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                Err(ApiError::Network("script exhausted".to_string()))
            } else {
                responses.remove(0)
            }
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn prices(list: &[(&str, f64)]) -> HashMap<String, f64> {
        list.iter().map(|(id, p)| (id.to_string(), *p)).collect()
    }

    #[tokio::test]
    async fn test_outage_uses_fallbacks() {
        let source = ScriptedSource::new(vec![Err(ApiError::HttpStatus {
            endpoint: "simple/price".to_string(),
            status: 500,
        })]);
        let resolver = PriceResolver::with_source(source);

        let resolved = resolver
            .resolve_prices(&ids(&["tether", "tron", "unknown-coin"]))
            .await;
        assert_eq!(resolved.get("tether"), Some(&1.0));
        assert_eq!(resolved.get("tron"), Some(&0.34));
        assert_eq!(resolved.get("unknown-coin"), Some(&0.0));
    }

    #[tokio::test]
    async fn test_missing_and_zero_live_values_fall_back() {
        let source = ScriptedSource::new(vec![Ok(prices(&[("tron", 0.2), ("tether", 0.0)]))]);
        let resolver = PriceResolver::with_source(source);

        let resolved = resolver
            .resolve_prices(&ids(&["tron", "tether", "celo", "weth"]))
            .await;
        assert_eq!(resolved.get("tron"), Some(&0.2));
        assert_eq!(resolved.get("tether"), Some(&1.0));
        assert_eq!(resolved.get("celo"), Some(&0.5));
        assert_eq!(resolved.get("weth"), Some(&0.0));
    }

    #[tokio::test]
    async fn test_ids_are_deduplicated_and_blank_dropped() {
        let source = ScriptedSource::new(vec![Ok(prices(&[("tron", 0.2)]))]);
        let resolver = PriceResolver::with_source(source.clone());

        let resolved = resolver.resolve_prices(&ids(&["tron", " tron ", ""])).await;
        assert_eq!(resolved.len(), 1);
        assert!(resolver.resolve_prices(&[]).await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let clock = ManualClock::default();
        let source = ScriptedSource::new(vec![
            Ok(prices(&[("tron", 0.2)])),
            Ok(prices(&[("tron", 0.3)])),
        ]);
        let resolver = PriceResolver::new(
            source.clone(),
            CacheConfig::price_quotes(),
            Arc::new(clock.clone()),
        );

        let request = ids(&["tron"]);
        assert_eq!(resolver.resolve_prices(&request).await.get("tron"), Some(&0.2));

        clock.advance(Duration::seconds(299));
        assert_eq!(resolver.resolve_prices(&request).await.get("tron"), Some(&0.2));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(1));
        assert_eq!(resolver.resolve_prices(&request).await.get("tron"), Some(&0.3));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let source = ScriptedSource::new(vec![
            Err(ApiError::Timeout(std::time::Duration::from_secs(10))),
            Ok(prices(&[("tether", 0.999)])),
        ]);
        let resolver = PriceResolver::with_source(source.clone());

        let request = ids(&["tether"]);
        assert_eq!(resolver.resolve_prices(&request).await.get("tether"), Some(&1.0));
        assert_eq!(resolver.resolve_prices(&request).await.get("tether"), Some(&0.999));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
