// src/governance/cache.rs

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Key/value store with per-entry expiry.
///
/// Expired entries are only evicted when a read observes them; there is no
/// background sweep and no size bound.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Returns the live value for `key`. A stale entry is removed by the read.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => {}
        }

        // The read guard above is released before removing, DashMap would deadlock otherwise.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            debug!(key, "Evicted expired cache entry");
        }
        None
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
