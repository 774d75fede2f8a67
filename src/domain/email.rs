//! EmailAddress value object.

use super::domain_name::DomainName;
use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::text_rules::{check_charset, check_length, check_separators};
use super::value_object::{impl_value_object_serde, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Throwaway inbox providers.
const DISPOSABLE_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "getnada.com",
    "guerrillamail.com",
    "mailinator.com",
    "sharklasers.com",
    "temp-mail.org",
    "tempmail.com",
    "throwaway.email",
    "trashmail.com",
    "yopmail.com",
];

/// Consumer webmail providers.
const FREE_PROVIDERS: &[&str] = &[
    "126.com",
    "163.com",
    "aol.com",
    "foxmail.com",
    "gmail.com",
    "hotmail.com",
    "icloud.com",
    "live.com",
    "outlook.com",
    "protonmail.com",
    "qq.com",
    "sina.com",
    "yahoo.com",
    "yandex.com",
];

fn is_local_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || "!#$%&'*+/=?^_`{|}~.-".contains(c)
}

/// A type-safe, lower-cased email address.
///
/// # Validation Rules
///
/// - At most 254 characters, exactly one `@`
/// - Local part at most 64 characters of the RFC 5322 atom set, dots not at
///   either end and never doubled
/// - Domain part is a valid [`DomainName`] (at most 253 characters)
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::EmailAddress;
///
/// let email = EmailAddress::new("Jane.Doe@Acme.io").unwrap();
/// assert_eq!(email.as_str(), "jane.doe@acme.io");
/// assert_eq!(email.domain(), "acme.io");
/// assert!(email.is_corporate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

pub type Email = EmailAddress;

impl EmailAddress {
    pub const MAX_LEN: usize = 254;
    pub const MAX_LOCAL_LEN: usize = 64;

    /// Trim, lower-case and validate.
    pub fn new(email: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self(email.as_ref().trim().to_lowercase()).checked()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Get the local part (before '@').
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(&self.0, |(local, _)| local)
    }

    /// Get the domain part (after '@').
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }

    pub fn is_disposable(&self) -> bool {
        DISPOSABLE_DOMAINS.contains(&self.domain())
    }

    pub fn is_free_provider(&self) -> bool {
        FREE_PROVIDERS.contains(&self.domain())
    }

    /// Neither disposable nor a consumer webmail provider.
    pub fn is_corporate(&self) -> bool {
        !self.is_disposable() && !self.is_free_provider()
    }

    /// First character of the local part followed by `***`, e.g. `j***@acme.io`.
    pub fn masked(&self) -> String {
        let first = self.local_part().chars().next().unwrap_or('*');
        format!("{first}***@{}", self.domain())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRepr {
    pub value: String,
}

impl ValueObject for EmailAddress {
    type Repr = EmailRepr;
    const KIND: PrimitiveKind = PrimitiveKind::Email;

    fn validate(&self) -> Result<(), ValidationError> {
        let v = &self.0;
        check_length(Self::KIND, v, 3, Self::MAX_LEN)?;

        let (local, domain) = match v.split_once('@') {
            Some((local, domain)) if !domain.contains('@') => (local, domain),
            _ => {
                return Err(ValidationError::new(
                    Self::KIND,
                    v.as_str(),
                    Violation::Format("must contain exactly one '@'".to_string()),
                ))
            }
        };

        if local.is_empty() {
            return Err(ValidationError::new(
                Self::KIND,
                v.as_str(),
                Violation::Format("local part is empty".to_string()),
            ));
        }
        let local_len = local.chars().count();
        if local_len > Self::MAX_LOCAL_LEN {
            return Err(ValidationError::new(
                Self::KIND,
                v.as_str(),
                Violation::TooLong {
                    max: Self::MAX_LOCAL_LEN,
                    actual: local_len,
                },
            ));
        }
        check_charset(Self::KIND, local, is_local_char)
            .and_then(|()| check_separators(Self::KIND, local, |c| c == '.'))
            .map_err(|e| ValidationError::new(Self::KIND, v.as_str(), e.violation().clone()))?;

        // domain rules are shared with tenant domains; re-tag the failure
        DomainName::new(domain)
            .map_err(|e| ValidationError::new(Self::KIND, v.as_str(), e.violation().clone()))?;
        Ok(())
    }

    fn canonical_string(&self) -> String {
        self.0.clone()
    }

    fn to_repr(&self) -> EmailRepr {
        EmailRepr {
            value: self.0.clone(),
        }
    }

    fn from_repr(repr: EmailRepr) -> Result<Self, ValidationError> {
        Self::new(repr.value)
    }
}

impl_value_object_serde!(EmailAddress);

impl FromStr for EmailAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
