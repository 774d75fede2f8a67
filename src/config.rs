//! Configuration management for the primitives toolkit.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file. Nothing here prints to stdout, which carries validation output.

use crate::error::{ConfigError, ConfigResult};
use std::env;

const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;
const DEFAULT_LOG_LEVEL: &str = "error";

#[derive(Debug, Clone)]
pub struct Config {
    /// How long a validation outcome stays cached (default: 300)
    pub validation_cache_ttl_seconds: u64,

    /// Upper bound on cached validation outcomes (default: 10000)
    pub validation_cache_max_entries: usize,

    /// Fallback tracing filter when `RUST_LOG` is unset (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `VALIDATION_CACHE_TTL_SECONDS`: cache TTL in seconds (default: 300)
    /// - `VALIDATION_CACHE_MAX_ENTRIES`: cache capacity, at least 1 (default: 10000)
    /// - `LOG_LEVEL`: logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env is fine, a malformed one is not.
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::DotenvError(e.to_string()));
            }
        }

        let validation_cache_ttl_seconds =
            Self::parse_env_u64("VALIDATION_CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS)?;
        let validation_cache_max_entries =
            Self::parse_env_usize("VALIDATION_CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?;

        if validation_cache_max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                var: "VALIDATION_CACHE_MAX_ENTRIES".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        let log_level = match env::var("LOG_LEVEL") {
            Ok(level) if level.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    var: "LOG_LEVEL".to_string(),
                    reason: "Cannot be empty".to_string(),
                })
            }
            Ok(level) => level.trim().to_string(),
            Err(_) => DEFAULT_LOG_LEVEL.to_string(),
        };

        Ok(Config {
            validation_cache_ttl_seconds,
            validation_cache_max_entries,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            validation_cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            validation_cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
