/// Cache configuration per entity type
///
/// - Price quotes: short TTL, bounded by polling consumers
/// - Token metadata: long TTL, contract metadata practically never changes
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached entries
    pub ttl: Duration,

    /// Maximum number of entries (LRU eviction when exceeded)
    pub capacity: usize,
}

impl CacheConfig {
    /// Price quotes keyed by ID set
    pub fn price_quotes() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 256,
        }
    }

    /// ERC-20 symbol/name/decimals
    pub fn token_metadata() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            capacity: 5000,
        }
    }

    pub fn custom(ttl_secs: u64, capacity: usize) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            capacity,
        }
    }
}
