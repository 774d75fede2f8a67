//! Caching utilities.
//!
//! A generic time-based cache with TTL and size cap, and a validation memo
//! built on it.

pub mod timed_cache;
pub mod validation_cache;

pub use timed_cache::TimedCache;
pub use validation_cache::{CacheStats, ValidationCache};
