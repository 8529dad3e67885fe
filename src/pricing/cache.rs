/// Live price responses keyed by the requested ID set
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::cache::{CacheConfig, CacheManager, CacheMetrics};
use crate::clock::Clock;

pub struct PriceCache {
    inner: CacheManager<String, HashMap<String, f64>>,
}

impl PriceCache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: CacheManager::with_clock(config, clock),
        }
    }

    /// Sorted, comma-joined ID set
    pub fn key_for(ids: &BTreeSet<String>) -> String {
        ids.iter().cloned().collect::<Vec<_>>().join(",")
    }

    pub fn get(&self, ids: &BTreeSet<String>) -> Option<HashMap<String, f64>> {
        self.inner.get(&Self::key_for(ids))
    }

    pub fn insert(&self, ids: &BTreeSet<String>, prices: HashMap<String, f64>) {
        self.inner.insert(Self::key_for(ids), prices);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.inner.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_independent() {
        let a: BTreeSet<String> = ["tron", "tether"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["tether", "tron"].iter().map(|s| s.to_string()).collect();
        assert_eq!(PriceCache::key_for(&a), "tether,tron");
        assert_eq!(PriceCache::key_for(&a), PriceCache::key_for(&b));
    }
}
