/// Generic in-memory cache with TTL and LRU eviction
///
/// Thread-safe, generic over key/value types. Entries are immutable value
/// snapshots, so concurrent inserts for one key resolve last-writer-wins.
use super::config::CacheConfig;
use crate::clock::{system_clock, Clock};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Cache metrics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub inserts: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheState<K, V> {
    data: HashMap<K, CacheEntry<V>>,
    access_order: VecDeque<K>,
    metrics: CacheMetrics,
}

pub struct CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> CacheManager<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Mutex::new(CacheState {
                data: HashMap::new(),
                access_order: VecDeque::new(),
                metrics: CacheMetrics::default(),
            }),
        }
    }

    /// Get value from cache (None if expired or missing)
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut state = self.state.lock();

        let expired = match state.data.get(key) {
            None => {
                state.metrics.misses += 1;
                return None;
            }
            Some(entry) => self.is_expired(entry.inserted_at, now),
        };

        if expired {
            state.data.remove(key);
            state.access_order.retain(|k| k != key);
            state.metrics.misses += 1;
            state.metrics.expirations += 1;
            return None;
        }

        touch(&mut state.access_order, key);
        state.metrics.hits += 1;
        state.data.get(key).map(|entry| entry.value.clone())
    }

    /// Insert value (evicts LRU if at capacity)
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut state = self.state.lock();

        if state.data.len() >= self.config.capacity && !state.data.contains_key(&key) {
            if let Some(lru_key) = state.access_order.pop_front() {
                state.data.remove(&lru_key);
                state.metrics.evictions += 1;
            }
        }

        state.data.insert(
            key.clone(),
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
        touch(&mut state.access_order, &key);
        state.metrics.inserts += 1;
    }

    pub fn remove(&self, key: &K) {
        let mut state = self.state.lock();
        state.data.remove(key);
        state.access_order.retain(|k| k != key);
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.data.clear();
        state.access_order.clear();
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.state.lock().metrics.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, inserted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // Negative age (clock stepped back) counts as fresh
        (now - inserted_at)
            .to_std()
            .map(|age| age >= self.config.ttl)
            .unwrap_or(false)
    }
}

// Move key to the back (most recently used)
fn touch<K: Clone + PartialEq>(order: &mut VecDeque<K>, key: &K) {
    order.retain(|k| k != key);
    order.push_back(key.clone());
}
