//! # Analysis Cache
//!
//! A keyed TTL cache for computed results, owned by whoever constructs the
//! engine and passed in explicitly. Two engines never share entries unless
//! they were handed the same cache.
//!
//! Entries expire `ttl` after insertion. Expired entries are dropped lazily on
//! lookup. When a capacity is set and the cache is full, the oldest entry is
//! evicted to make room.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::temporal::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
}

/// Point-in-time view of cache occupancy and effectiveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    /// Keys currently held, sorted.
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
}

/// Thread-safe TTL cache.
pub struct AnalysisCache<V> {
    state: Mutex<CacheState<V>>,
    ttl: Duration,
    capacity: Option<usize>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> AnalysisCache<V> {
    /// Cache on the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
            }),
            ttl,
            capacity: None,
            clock,
        }
    }

    /// Bound the number of live entries.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a live entry, dropping it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let expired = state
            .entries
            .get(key)
            .map(|entry| now - entry.stored_at >= self.ttl);
        let fresh = match expired {
            Some(false) => state.entries.get(key).map(|entry| entry.value.clone()),
            Some(true) => {
                state.entries.remove(key);
                None
            }
            None => None,
        };
        if fresh.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        fresh
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = self.clock.now();
        let mut state = self.state.lock();
        if let Some(capacity) = self.capacity {
            if !state.entries.contains_key(&key) && state.entries.len() >= capacity {
                let oldest = state
                    .entries
                    .iter()
                    .min_by(|a, b| a.1.stored_at.cmp(&b.1.stored_at).then_with(|| a.0.cmp(b.0)))
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    tracing::debug!(key = %oldest, "evicting oldest cache entry");
                    state.entries.remove(&oldest);
                }
            }
        }
        state.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.state.lock().entries.remove(key).map(|e| e.value)
    }

    /// Drop every entry and reset counters.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut keys: Vec<String> = state.entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: state.entries.len(),
            keys,
            hits: state.hits,
            misses: state.misses,
        }
    }
}

impl<V> std::fmt::Debug for AnalysisCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
