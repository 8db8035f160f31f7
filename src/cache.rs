//! Content-addressed result caches shared across analysis runs.
//!
//! The admissibility and sentiment components memoize per-text results keyed
//! by a stable hash of the fragment text. Caches are bounded; the default
//! eviction policy is a full clear once the bound is exceeded. That discards
//! warm entries wholesale, which is acceptable staleness: values are
//! deterministic for the same input, so concurrent readers that briefly miss
//! an entry simply recompute it.

use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};
use tracing::debug;

/// Stable cache key for a text fragment: hex SHA-256 of the content.
pub fn content_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Eviction behavior once the capacity bound is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Drop every entry. Simple and observable; the historical behavior.
    ClearOnOverflow,
    /// Drop the least recently used entry.
    Lru,
}

struct Slot<V> {
    value: V,
    /// Monotonic access tick, used only under the LRU policy.
    last_used: u64,
}

struct Inner<V> {
    entries: HashMap<String, Slot<V>>,
    tick: u64,
}

/// Bounded map from content hash to a computed result.
///
/// Shared and mutable; concurrent batch calls may race on population, which
/// is fine because the last writer wins with an identical value.
pub struct ContentCache<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
    policy: EvictionPolicy,
}

impl<V: Clone> ContentCache<V> {
    /// Create a cache with the default clear-on-overflow policy.
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, EvictionPolicy::ClearOnOverflow)
    }

    /// Create a cache with an explicit eviction policy.
    pub fn with_policy(capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
            policy,
        }
    }

    /// Look up a previously computed result.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.tick += 1;
        let tick = inner.tick;
        inner.entries.get_mut(key).map(|slot| {
            slot.last_used = tick;
            slot.value.clone()
        })
    }

    /// Store a result, evicting per policy if the bound is exceeded.
    pub fn put(&self, key: String, value: V) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.tick += 1;
        let tick = inner.tick;
        inner.entries.insert(key, Slot { value, last_used: tick });

        if inner.entries.len() > self.capacity {
            match self.policy {
                EvictionPolicy::ClearOnOverflow => {
                    debug!(capacity = self.capacity, "cache bound exceeded, clearing");
                    inner.entries.clear();
                }
                EvictionPolicy::Lru => {
                    if let Some(oldest) = inner
                        .entries
                        .iter()
                        .min_by_key(|(_, slot)| slot.last_used)
                        .map(|(k, _)| k.clone())
                    {
                        inner.entries.remove(&oldest);
                    }
                }
            }
        }
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .entries
            .clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }

    /// True if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
