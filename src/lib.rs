//! Tenant Primitives - immutable, self-validating domain values for a
//! multi-tenant SaaS backend.
//!
//! Every primitive is built from raw input, normalized, checked against its
//! invariants and never mutated afterwards. Consumers hold them by value and
//! can rely on any instance they receive being valid.
//!
//! # Architecture
//!
//! - **domain**: the value objects and the [`ValueObject`] contract they share
//! - **cache**: a TTL cache and a memoizing validator built on it
//! - **config**: configuration from environment variables
//! - **error**: infrastructure error types
//!
//! # Example
//!
//! ```
//! use tenant_primitives::domain::{Currency, Money, MoneyOptions, TenantId, ValueObject};
//!
//! let tenant = TenantId::generate();
//! let parsed: TenantId = tenant.to_string().parse().unwrap();
//! assert_eq!(parsed, tenant);
//!
//! let price = Money::new(19.99, Currency::Usd, MoneyOptions::default()).unwrap();
//! let total = price.multiply(3.0).unwrap();
//! assert_eq!(total.amount_string(), "59.97");
//! assert_eq!(Money::from_json(&total.to_json().unwrap()).unwrap(), total);
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;

pub use cache::{CacheStats, TimedCache, ValidationCache};
pub use config::Config;
pub use domain::{PrimitiveKind, ValidationError, ValueObject, Violation};
pub use error::{ConfigError, ConfigResult};
