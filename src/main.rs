//! Tenant Primitives - command line validator
//!
//! Validates raw values as a given primitive kind and prints each one's
//! serialized form as a JSON line on stdout. Values come from the arguments,
//! or one per line from stdin when none are given. Invalid values are
//! reported on stderr and make the process exit with status 1.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::str::FromStr;
use tenant_primitives::domain::{
    AuthToken, DateRange, DepartmentCode, DepartmentId, DepartmentName, DeviceToken, DomainName,
    EmailAddress, Money, OrganizationCode, OrganizationId, OrganizationName, PersonName,
    PhoneNumber, TenantCode, TenantId, TenantName, TokenType, UniqueId, UserId, Username,
    ValidationError, ValueObject, Violation, WebhookUrl,
};
use tenant_primitives::{Config, ValidationCache};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

type Validator = fn(&ValidationCache, &str) -> Result<String, ValidationError>;

const KINDS: &[&str] = &[
    "id",
    "user-id",
    "tenant-id",
    "organization-id",
    "department-id",
    "tenant-code",
    "organization-code",
    "department-code",
    "person-name",
    "tenant-name",
    "organization-name",
    "department-name",
    "username",
    "domain",
    "money",
    "date-range",
    "email",
    "phone",
    "device-token",
    "webhook-url",
    "auth-token",
];

fn usage() -> String {
    format!(
        "usage: tenant-primitives <kind> [value...]\n\nkinds: {}",
        KINDS.join(", ")
    )
}

fn to_json<T: ValueObject>(value: &T, raw: &str) -> Result<String, ValidationError> {
    value
        .to_json()
        .map_err(|e| ValidationError::new(T::KIND, raw, Violation::Malformed(e.to_string())))
}

fn check<T>(cache: &ValidationCache, raw: &str) -> Result<String, ValidationError>
where
    T: ValueObject + FromStr<Err = ValidationError>,
{
    let value: T = cache.validate(raw)?;
    to_json(&value, raw)
}

// Secrets are never memoized.
fn check_auth_token(_cache: &ValidationCache, raw: &str) -> Result<String, ValidationError> {
    let token = AuthToken::new(raw, TokenType::Api)?;
    to_json(&token, &token.masked())
}

fn validator_for(kind: &str) -> Option<Validator> {
    let validator: Validator = match kind {
        "id" => check::<UniqueId>,
        "user-id" => check::<UserId>,
        "tenant-id" => check::<TenantId>,
        "organization-id" => check::<OrganizationId>,
        "department-id" => check::<DepartmentId>,
        "tenant-code" => check::<TenantCode>,
        "organization-code" => check::<OrganizationCode>,
        "department-code" => check::<DepartmentCode>,
        "person-name" => check::<PersonName>,
        "tenant-name" => check::<TenantName>,
        "organization-name" => check::<OrganizationName>,
        "department-name" => check::<DepartmentName>,
        "username" => check::<Username>,
        "domain" => check::<DomainName>,
        "money" => check::<Money>,
        "date-range" => check::<DateRange>,
        "email" => check::<EmailAddress>,
        "phone" => check::<PhoneNumber>,
        "device-token" => check::<DeviceToken>,
        "webhook-url" => check::<WebhookUrl>,
        "auth-token" => check_auth_token,
        _ => return None,
    };
    Some(validator)
}

fn main() -> Result<ExitCode> {
    let config = Config::from_env();

    // Logging goes to stderr; stdout carries only JSON results
    let fallback = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let mut args = std::env::args().skip(1);
    let Some(kind) = args.next() else {
        eprintln!("{}", usage());
        return Ok(ExitCode::from(2));
    };
    let Some(validator) = validator_for(&kind) else {
        eprintln!("unknown kind: {kind}\n{}", usage());
        return Ok(ExitCode::from(2));
    };

    let cache = ValidationCache::from_config(&config);
    info!(
        kind = %kind,
        ttl_seconds = config.validation_cache_ttl_seconds,
        max_entries = config.validation_cache_max_entries,
        "Validating values"
    );

    let values: Vec<String> = args.collect();
    let inputs: Box<dyn Iterator<Item = String>> = if values.is_empty() {
        Box::new(io::stdin().lock().lines().map_while(io::Result::ok))
    } else {
        Box::new(values.into_iter())
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;
    for line in inputs {
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        match validator(&cache, raw) {
            Ok(json) => writeln!(out, "{json}")?,
            Err(e) => {
                failures += 1;
                eprintln!("{e}");
            }
        }
    }
    out.flush()?;

    let stats = cache.stats();
    debug!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        entries = stats.entries,
        "Validation cache summary"
    );

    if failures > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
