//! Memoized validation of raw input.
//!
//! Repeated validation of the same raw string for the same primitive type
//! returns the cached outcome, success or failure. Each distinct type has its
//! own key space, so a tenant id and a user id parsed from the same text never
//! share an entry.

use super::timed_cache::TimedCache;
use crate::config::Config;
use crate::domain::{PrimitiveKind, ValidationError, ValueObject};
use serde::Serialize;
use std::any::{Any, TypeId};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

type CachedOutcome = Result<Arc<dyn Any + Send + Sync>, ValidationError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: PrimitiveKind,
    type_id: TypeId,
    raw: String,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe validation memo. Clones share entries and counters.
///
/// ```
/// use tenant_primitives::cache::ValidationCache;
/// use tenant_primitives::domain::EmailAddress;
///
/// let cache = ValidationCache::new(60, 100);
/// let a: EmailAddress = cache.validate("user@example.com").unwrap();
/// let b: EmailAddress = cache.validate("user@example.com").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(cache.stats().hits, 1);
/// ```
#[derive(Clone)]
pub struct ValidationCache {
    entries: TimedCache<CacheKey, CachedOutcome>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
}

impl ValidationCache {
    pub fn new(ttl_seconds: u64, max_entries: usize) -> Self {
        Self {
            entries: TimedCache::with_capacity(Duration::from_secs(ttl_seconds), max_entries),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.validation_cache_ttl_seconds,
            config.validation_cache_max_entries,
        )
    }

    /// Parse `raw` as `T`, reusing a cached outcome when one is live.
    pub fn validate<T>(&self, raw: &str) -> Result<T, ValidationError>
    where
        T: ValueObject + FromStr<Err = ValidationError>,
    {
        let kind = T::KIND;
        let key = CacheKey {
            kind,
            type_id: TypeId::of::<T>(),
            raw: raw.to_string(),
        };

        if let Some(outcome) = self.entries.get(&key) {
            let cached = match outcome {
                Ok(value) => value.downcast_ref::<T>().cloned().map(Ok),
                Err(err) => Some(Err(err)),
            };
            if let Some(result) = cached {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(kind = %kind, valid = result.is_ok(), "Validation cache hit");
                return result;
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(kind = %kind, "Validation cache miss");

        let result = raw.parse::<T>();
        let outcome: CachedOutcome = match &result {
            Ok(value) => Ok(Arc::new(value.clone()) as Arc<dyn Any + Send + Sync>),
            Err(err) => Err(err.clone()),
        };
        let evicted = self.entries.insert(key, outcome);
        if evicted > 0 {
            self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
        }
        result
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Drop all entries. Counters are kept.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ValidationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationCache")
            .field("entries", &self.entries)
            .field("stats", &self.stats())
            .finish()
    }
}
