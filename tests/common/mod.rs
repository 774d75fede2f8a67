//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 instant, panicking on bad fixtures.
pub fn at(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .unwrap_or_else(|e| panic!("bad fixture instant {text}: {e}"))
        .with_timezone(&Utc)
}

/// A fixed "now": Wednesday 2024-05-15 13:45 UTC.
pub fn wednesday_afternoon() -> DateTime<Utc> {
    at("2024-05-15T13:45:00Z")
}

pub const IOS_TOKEN: &str = "9f8e7d6c5b4a39281706f5e4d3c2b1a09f8e7d6c5b4a39281706f5e4d3c2b1a0";

pub fn fcm_token() -> String {
    format!("cXp0aGVfZGV2aWNl:APA91bH{}", "Qw-_".repeat(36))
}

pub fn web_push_token() -> String {
    "B".repeat(87)
}
