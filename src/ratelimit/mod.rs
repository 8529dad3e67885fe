//! Per-key cooldown limiter
//!
//! A key (typically a wallet address) may be served once per window. The
//! clock is injectable and state lives in a [`CooldownStore`], so several
//! processes sharing a SQLite file enforce one window.

mod store;

pub use store::{CooldownStore, MemoryCooldownStore, SqliteCooldownStore};

use std::sync::Arc;

use crate::clock::{system_clock, Clock};
use crate::config::RateLimitConfig;
use crate::errors::{hours_remaining, CooldownError};
use crate::logger::{self, LogTag};

/// Ten years; keeps `last_hit + window` inside chrono's range
const MAX_WINDOW_SECS: u64 = 10 * 365 * 24 * 60 * 60;

pub struct CooldownLimiter {
    store: Arc<dyn CooldownStore>,
    clock: Arc<dyn Clock>,
    window: chrono::Duration,
}

impl CooldownLimiter {
    pub fn new(store: Arc<dyn CooldownStore>, clock: Arc<dyn Clock>, window: chrono::Duration) -> Self {
        Self {
            store,
            clock,
            window,
        }
    }

    /// SQLite-backed when `store_path` is set, in-memory otherwise
    pub fn from_config(config: &RateLimitConfig) -> Result<Self, CooldownError> {
        let store: Arc<dyn CooldownStore> = match config.store_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Arc::new(SqliteCooldownStore::open(path)?),
            _ => Arc::new(MemoryCooldownStore::new()),
        };
        let secs = config.window_secs.min(MAX_WINDOW_SECS) as i64;
        Ok(Self::new(store, system_clock(), chrono::Duration::seconds(secs)))
    }

    pub fn window(&self) -> chrono::Duration {
        self.window
    }

    /// Admit `key` and start its window, or refuse with the time left
    pub fn check_and_record(&self, key: &str) -> Result<(), CooldownError> {
        let key = key.trim();
        let now = self.clock.now();

        match self.store.try_acquire(key, now, self.window)? {
            None => {
                logger::debug(LogTag::RateLimit, &format!("Admitted {}", key));
                Ok(())
            }
            Some(last) => {
                let remaining = last + self.window - now;
                logger::info(
                    LogTag::RateLimit,
                    &format!(
                        "Refused {}: cooling down for {} more hours",
                        key,
                        hours_remaining(&remaining)
                    ),
                );
                Err(CooldownError::CoolingDown { remaining })
            }
        }
    }

    /// Time left before `key` is admitted again, without recording a hit
    pub fn remaining(&self, key: &str) -> Result<Option<chrono::Duration>, CooldownError> {
        let now = self.clock.now();
        Ok(self.store.last_hit(key.trim())?.and_then(|last| {
            let remaining = last + self.window - now;
            (remaining > chrono::Duration::zero()).then_some(remaining)
        }))
    }
}
