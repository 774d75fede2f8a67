//! Domain validation errors.
//!
//! Every primitive reports failures through [`ValidationError`], which pairs the
//! primitive's type tag with the rule that was violated and the raw input that
//! violated it.

use super::money::Currency;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Type tag identifying which primitive rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Identifier,
    Code,
    Name,
    Username,
    DomainName,
    Money,
    DateRange,
    Email,
    PhoneNumber,
    DeviceToken,
    WebhookUrl,
    AuthToken,
    TenantStatus,
}

impl PrimitiveKind {
    /// Human-readable name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Code => "code",
            Self::Name => "name",
            Self::Username => "username",
            Self::DomainName => "domain name",
            Self::Money => "money",
            Self::DateRange => "date range",
            Self::Email => "email",
            Self::PhoneNumber => "phone number",
            Self::DeviceToken => "device token",
            Self::WebhookUrl => "webhook URL",
            Self::AuthToken => "auth token",
            Self::TenantStatus => "tenant status",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The specific rule a rejected value broke.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Nothing left after trimming
    #[error("value is empty")]
    Empty,

    #[error("length {actual} is below the minimum of {min}")]
    TooShort { min: usize, actual: usize },

    #[error("length {actual} exceeds the maximum of {max}")]
    TooLong { max: usize, actual: usize },

    #[error("character {0:?} is not allowed")]
    DisallowedCharacter(char),

    #[error("contains control characters")]
    ControlCharacter,

    #[error("contains whitespace")]
    Whitespace,

    #[error("starts or ends with a separator")]
    EdgeSeparator,

    #[error("contains consecutive separators")]
    ConsecutiveSeparators,

    #[error("must not start with a digit")]
    LeadingDigit,

    #[error("{0:?} is reserved")]
    Reserved(String),

    /// Structural mismatch not covered by a more specific rule
    #[error("{0}")]
    Format(String),

    #[error("amount is not a finite number")]
    NotFinite,

    #[error("amount must not be negative")]
    Negative,

    #[error("amount exceeds the representable range")]
    Overflow,

    #[error("precision {precision} exceeds the maximum of {max}")]
    Precision { precision: u32, max: u32 },

    #[error("unsupported currency {0:?}")]
    UnknownCurrency(String),

    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    #[error("division by zero")]
    DivisionByZero,

    #[error("start {start} is after end {end}")]
    StartAfterEnd { start: String, end: String },

    #[error("ranges neither overlap nor touch")]
    NotMergeable,

    #[error("unsupported timezone tag {0:?}")]
    InvalidTimezone(String),

    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("host is missing")]
    MissingHost,

    #[error("path must not be empty or root")]
    MissingPath,

    #[error("credentials must not be embedded")]
    EmbeddedCredentials,

    #[error("local address {0} is not allowed")]
    LocalAddress(String),

    #[error("private network address {0} is not allowed")]
    PrivateNetwork(String),

    #[error("unknown operator prefix {0}")]
    UnknownOperatorPrefix(String),

    #[error("value is purely numeric")]
    PureNumeric,

    #[error("expected {expected} token, detected {detected}")]
    PlatformMismatch { expected: String, detected: String },

    #[error("expected {expected} scope, found {found}")]
    ScopeMismatch { expected: String, found: String },

    #[error("cannot transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    /// Serialized payload could not be decoded
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// A value was rejected by a primitive's constructor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} {value:?}: {violation}")]
pub struct ValidationError {
    kind: PrimitiveKind,
    value: String,
    violation: Violation,
}

impl ValidationError {
    pub fn new(kind: PrimitiveKind, value: impl Into<String>, violation: Violation) -> Self {
        Self {
            kind,
            value: value.into(),
            violation,
        }
    }

    /// The primitive that rejected the value.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// The offending raw input. Diagnostic only.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn violation(&self) -> &Violation {
        &self.violation
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True when the value was rejected for being too short or too long.
    pub fn is_length_violation(&self) -> bool {
        matches!(
            self.violation,
            Violation::TooShort { .. } | Violation::TooLong { .. } | Violation::Empty
        )
    }
}

/// Convenience type alias for Results with ValidationError
pub type ValidationResult<T> = Result<T, ValidationError>;
