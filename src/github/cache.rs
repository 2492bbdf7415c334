// Response cache with per-entry expiry.
// Entries are persisted to the local store after every write; persistence is best-effort.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::Clock;
use crate::error::Result;
use crate::store::{CACHE_KEY, LocalStore};

/// Default lifetime of a cached response: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Value,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Check if this entry is older than `ttl` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let elapsed = now
            .signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > ttl
    }
}

/// In-memory map of cache entries mirrored to a `LocalStore`.
///
/// The in-memory map is authoritative for the session. A write that fails
/// to persist is logged and otherwise ignored.
pub struct ResponseCache {
    entries: BTreeMap<String, CacheEntry>,
    ttl: Duration,
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache, loading any previously persisted entries.
    /// Missing or corrupt data yields an empty cache.
    pub fn new(store: Arc<dyn LocalStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let entries = match load_entries(store.as_ref()) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding persisted response cache");
                BTreeMap::new()
            }
        };

        Self {
            entries,
            ttl,
            store,
            clock,
        }
    }

    /// Get a fresh payload. A stale entry is removed and `None` returned.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let expired = self.entries.get(key)?.is_expired(now, self.ttl);
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    pub fn set(&mut self, key: &str, payload: Value) {
        let entry = CacheEntry {
            key: key.to_string(),
            payload,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key.to_string(), entry);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        let pairs: Vec<(&String, &CacheEntry)> = self.entries.iter().collect();
        let result = serde_json::to_string(&pairs)
            .map_err(Into::into)
            .and_then(|json| self.store.set(CACHE_KEY, &json));

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist response cache");
        }
    }
}

fn load_entries(store: &dyn LocalStore) -> Result<BTreeMap<String, CacheEntry>> {
    let Some(json) = store.get(CACHE_KEY)? else {
        return Ok(BTreeMap::new());
    };
    let pairs: Vec<(String, CacheEntry)> = serde_json::from_str(&json)?;
    Ok(pairs.into_iter().collect())
}
