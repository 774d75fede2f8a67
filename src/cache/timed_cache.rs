//! Time-based cache with TTL (Time To Live) and a size cap.
//!
//! Entries expire after a fixed duration. When the cache is full, an insert
//! first drops expired entries and then, if still full, the oldest one.
//! Insertion order is tracked in a queue so eviction never scans the map.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    seq: u64,
}

/// Map plus insertion order. A queued `(key, seq)` whose seq no longer
/// matches the stored entry is stale (replaced or removed) and is skipped.
struct Store<K, V> {
    map: HashMap<K, CacheEntry<V>>,
    order: VecDeque<(K, u64)>,
    next_seq: u64,
}

impl<K: Eq + Hash + Clone, V> Store<K, V> {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            next_seq: 0,
        }
    }

    fn is_current(&self, key: &K, seq: u64) -> bool {
        self.map.get(key).is_some_and(|entry| entry.seq == seq)
    }

    /// Drop stale records from the front of the queue.
    fn skip_stale(&mut self) {
        while let Some((key, seq)) = self.order.front() {
            if self.is_current(key, *seq) {
                break;
            }
            self.order.pop_front();
        }
    }

    /// Remove the oldest entry if `evict` accepts it.
    fn pop_oldest_if(&mut self, evict: impl Fn(&CacheEntry<V>) -> bool) -> bool {
        self.skip_stale();
        let Some((key, _)) = self.order.front() else {
            return false;
        };
        if !self.map.get(key).is_some_and(evict) {
            return false;
        }
        if let Some((key, _)) = self.order.pop_front() {
            self.map.remove(&key);
        }
        true
    }

    fn compact(&mut self) {
        let map = &self.map;
        self.order
            .retain(|(key, seq)| map.get(key).is_some_and(|entry| entry.seq == *seq));
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

/// A thread-safe cache with time-based expiration and bounded size.
///
/// Clones share the same storage (uses Arc internally).
///
/// ```
/// use std::time::Duration;
/// use tenant_primitives::cache::TimedCache;
///
/// let cache = TimedCache::with_capacity(Duration::from_secs(60), 2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3);
/// assert_eq!(cache.len(), 2);
/// assert_eq!(cache.get(&"a"), None);
/// ```
#[derive(Clone)]
pub struct TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    entries: Arc<RwLock<Store<K, V>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new TimedCache with the specified TTL in seconds and the default capacity.
    pub fn new(ttl_seconds: u64) -> Self {
        Self::with_capacity(Duration::from_secs(ttl_seconds), DEFAULT_MAX_ENTRIES)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Store::new())),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Insert a value, replacing any previous value for the key.
    ///
    /// Returns how many entries were evicted to make room.
    pub fn insert(&self, key: K, value: V) -> usize {
        let Ok(mut store) = self.entries.write() else {
            return 0;
        };
        let now = Instant::now();

        let mut expired = 0;
        let mut oldest = 0;
        if !store.map.contains_key(&key) && store.map.len() >= self.max_entries {
            // one TTL for all entries: the oldest are the first to expire
            while store.pop_oldest_if(|e| now.duration_since(e.inserted_at) >= self.ttl) {
                expired += 1;
            }
            if store.map.len() >= self.max_entries && store.pop_oldest_if(|_| true) {
                oldest = 1;
            }
        }

        let seq = store.next_seq;
        store.next_seq += 1;
        store.order.push_back((key.clone(), seq));
        store.map.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                seq,
            },
        );
        // replaced keys leave stale records behind
        if store.order.len() > 2 * self.max_entries {
            store.compact();
        }

        let evicted = expired + oldest;
        if evicted > 0 {
            debug!(
                expired = expired,
                oldest = oldest,
                capacity = self.max_entries,
                "Evicted cache entries"
            );
        }
        evicted
    }

    /// Get a value from the cache if it exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let store = self.entries.read().ok()?;
        store
            .map
            .get(key)
            .filter(|entry| now.duration_since(entry.inserted_at) < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&self, key: &K) {
        if let Ok(mut store) = self.entries.write() {
            store.map.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut store) = self.entries.write() {
            store.clear();
        }
    }

    /// Remove all expired entries. Expired entries are already invisible to
    /// `get()`; this only frees their memory.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        if let Ok(mut store) = self.entries.write() {
            while store.pop_oldest_if(|e| now.duration_since(e.inserted_at) >= self.ttl) {}
            store.compact();
        }
    }

    /// Number of stored entries, including expired ones not yet cleaned up.
    pub fn len(&self) -> usize {
        self.entries.read().map(|store| store.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl<K, V> std::fmt::Debug for TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("entries", &self.len())
            .finish()
    }
}
