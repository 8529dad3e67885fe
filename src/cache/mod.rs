//! In-process TTL caches

mod config;
mod manager;

pub use config::CacheConfig;
pub use manager::{CacheManager, CacheMetrics};
