// SPDX-FileCopyrightText: 2026 Reposcan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded least-recently-used cache with per-entry absolute expiry.
//!
//! Expired entries are not swept by a background task: they are filtered on
//! read and left in place for normal LRU pressure to displace. All
//! operations are O(1); the cache is safe to share behind an `Arc`.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A fixed-capacity LRU map whose entries carry an absolute expiry.
pub struct TtlCache<V> {
    inner: Mutex<LruCache<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; configuration validation rejects that
    /// before construction.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).expect("cache capacity must be non-zero");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Looks up `key`, treating an expired entry as absent.
    ///
    /// A hit promotes the entry to most-recently-used. An expired entry
    /// reads as a miss but keeps its slot until LRU pressure displaces it.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.inner.lock().expect("cache mutex poisoned");
        match cache.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Evicts the least-recently-used entry when at capacity.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let mut cache = self.inner.lock().expect("cache mutex poisoned");
        cache.put(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
