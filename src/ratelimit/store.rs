/// Cooldown stores: last-hit timestamp per key
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::CooldownError;

/// Last-hit persistence for [`CooldownLimiter`](super::CooldownLimiter)
pub trait CooldownStore: Send + Sync {
    fn last_hit(&self, key: &str) -> Result<Option<DateTime<Utc>>, CooldownError>;

    fn record_hit(&self, key: &str, at: DateTime<Utc>) -> Result<(), CooldownError>;

    /// Record `now` unless a hit lies within `window` before it
    ///
    /// Returns the blocking hit when refused. Stores shared between
    /// processes must make this atomic.
    fn try_acquire(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<DateTime<Utc>>, CooldownError> {
        if let Some(last) = self.last_hit(key)? {
            if now - last < window {
                return Ok(Some(last));
            }
        }
        self.record_hit(key, now)?;
        Ok(None)
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryCooldownStore {
    hits: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl MemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CooldownStore for MemoryCooldownStore {
    fn last_hit(&self, key: &str) -> Result<Option<DateTime<Utc>>, CooldownError> {
        Ok(self.hits.lock().get(key).copied())
    }

    fn record_hit(&self, key: &str, at: DateTime<Utc>) -> Result<(), CooldownError> {
        self.hits.lock().insert(key.to_string(), at);
        Ok(())
    }

    fn try_acquire(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<DateTime<Utc>>, CooldownError> {
        let mut hits = self.hits.lock();
        if let Some(last) = hits.get(key) {
            if now - *last < window {
                return Ok(Some(*last));
            }
        }
        hits.insert(key.to_string(), now);
        Ok(None)
    }
}

// =============================================================================
// SQLITE
// =============================================================================

fn store_err(error: rusqlite::Error) -> CooldownError {
    CooldownError::Store(error.to_string())
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, CooldownError> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| CooldownError::Store(format!("invalid stored timestamp {}", ms)))
}

/// SQLite file store, shared by every process that opens the same file
pub struct SqliteCooldownStore {
    conn: Mutex<Connection>,
}

impl SqliteCooldownStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CooldownError> {
        let conn = Connection::open(path).map_err(store_err)?;
        Self::initialize(conn)
    }

    pub fn open_in_memory() -> Result<Self, CooldownError> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, CooldownError> {
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(store_err)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cooldowns (
                key TEXT PRIMARY KEY,
                last_hit_ms INTEGER NOT NULL
            )",
            [],
        )
        .map_err(store_err)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CooldownStore for SqliteCooldownStore {
    fn last_hit(&self, key: &str) -> Result<Option<DateTime<Utc>>, CooldownError> {
        let conn = self.conn.lock();
        let ms: Option<i64> = conn
            .query_row(
                "SELECT last_hit_ms FROM cooldowns WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(store_err)?;
        ms.map(from_millis).transpose()
    }

    fn record_hit(&self, key: &str, at: DateTime<Utc>) -> Result<(), CooldownError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO cooldowns (key, last_hit_ms) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET last_hit_ms = excluded.last_hit_ms",
            params![key, at.timestamp_millis()],
        )
        .map_err(store_err)?;
        Ok(())
    }

    fn try_acquire(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Option<DateTime<Utc>>, CooldownError> {
        let mut conn = self.conn.lock();
        // IMMEDIATE takes the write lock up front so two processes cannot both pass
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(store_err)?;

        let last_ms: Option<i64> = tx
            .query_row(
                "SELECT last_hit_ms FROM cooldowns WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(store_err)?;

        if let Some(ms) = last_ms {
            let last = from_millis(ms)?;
            if now - last < window {
                tx.commit().map_err(store_err)?;
                return Ok(Some(last));
            }
        }

        tx.execute(
            "INSERT INTO cooldowns (key, last_hit_ms) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET last_hit_ms = excluded.last_hit_ms",
            params![key, now.timestamp_millis()],
        )
        .map_err(store_err)?;
        tx.commit().map_err(store_err)?;
        Ok(None)
    }
}
