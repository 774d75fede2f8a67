//! Display name value objects.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::scope::{Department, Organization, Scope, Tenant, User};
use super::text_rules::{check_charset, check_length, check_no_control, check_separators};
use super::value_object::{impl_value_object_serde, ValueObject};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

static NAME_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}\p{N}_\- ]$").expect("name pattern is valid"));

fn is_name_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    NAME_CHAR.is_match(c.encode_utf8(&mut buf))
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '_')
}

/// A people- or organization-facing name such as `Acme 北京 Office`.
///
/// Surrounding whitespace is trimmed and casing is kept for display.
/// Two names are equal when they match case-insensitively.
///
/// # Validation Rules
///
/// - 2 to 100 characters
/// - Unicode letters, marks and digits, plus space, hyphen and underscore
/// - No control characters
/// - No leading, trailing or doubled separator
#[derive(Debug, Clone)]
pub struct Name<S: Scope> {
    display: String,
    key: String,
    _scope: PhantomData<S>,
}

pub type PersonName = Name<User>;
pub type TenantName = Name<Tenant>;
pub type OrganizationName = Name<Organization>;
pub type DepartmentName = Name<Department>;

impl<S: Scope> Name<S> {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 100;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let display = raw.as_ref().trim().to_string();
        let key = display.to_lowercase();
        Self {
            display,
            key,
            _scope: PhantomData,
        }
        .checked()
    }

    /// The name as entered, trimmed.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Case-folded form used for equality and hashing.
    pub fn normalized(&self) -> &str {
        &self.key
    }

    /// Initials of each word, upper-cased, e.g. `"Acme Beijing"` -> `"AB"`.
    pub fn initials(&self) -> String {
        self.display
            .split(is_separator)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl<S: Scope> PartialEq for Name<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<S: Scope> Eq for Name<S> {}

impl<S: Scope> Hash for Name<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRepr {
    pub value: String,
    pub normalized: String,
    pub scope: String,
}

impl<S: Scope> ValueObject for Name<S> {
    type Repr = NameRepr;
    const KIND: PrimitiveKind = PrimitiveKind::Name;

    fn validate(&self) -> Result<(), ValidationError> {
        let v = &self.display;
        check_length(Self::KIND, v, Self::MIN_LEN, Self::MAX_LEN)?;
        check_no_control(Self::KIND, v)?;
        check_charset(Self::KIND, v, is_name_char)?;
        check_separators(Self::KIND, v, is_separator)?;
        if self.key != v.to_lowercase() {
            return Err(ValidationError::new(
                Self::KIND,
                v.as_str(),
                Violation::Format("normalized key out of sync".to_string()),
            ));
        }
        Ok(())
    }

    fn canonical_string(&self) -> String {
        self.display.clone()
    }

    fn to_repr(&self) -> NameRepr {
        NameRepr {
            value: self.display.clone(),
            normalized: self.key.clone(),
            scope: S::NAME.to_string(),
        }
    }

    /// The `normalized` field is informational; it is recomputed from `value`.
    fn from_repr(repr: NameRepr) -> Result<Self, ValidationError> {
        if repr.scope != S::NAME {
            return Err(ValidationError::new(
                Self::KIND,
                repr.value,
                Violation::ScopeMismatch {
                    expected: S::NAME.to_string(),
                    found: repr.scope,
                },
            ));
        }
        Self::new(repr.value)
    }
}

impl_value_object_serde!(impl<S: Scope> Name<S>);

impl<S: Scope> FromStr for Name<S> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<S: Scope> fmt::Display for Name<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_valid() {
        let name = TenantName::new("  Acme Corp ").unwrap();
        assert_eq!(name.as_str(), "Acme Corp");
        assert_eq!(name.to_string(), "Acme Corp");
    }

    #[test]
    fn test_name_unicode() {
        assert!(OrganizationName::new("北京分公司").is_ok());
        assert!(PersonName::new("José Núñez").is_ok());
        // combining acute accent
        assert!(PersonName::new("Jose\u{0301} Li").is_ok());
        assert!(DepartmentName::new("R&D").is_err());
    }

    #[test]
    fn test_name_length() {
        assert!(TenantName::new("A").unwrap_err().is_length_violation());
        assert!(TenantName::new("AB").is_ok());
        assert!(TenantName::new("a".repeat(100)).is_ok());
        assert!(TenantName::new("a".repeat(101)).is_err());
        assert_eq!(
            TenantName::new("   ").unwrap_err().violation(),
            &Violation::Empty
        );
    }

    #[test]
    fn test_name_structure() {
        assert_eq!(
            TenantName::new("Acme  Corp").unwrap_err().violation(),
            &Violation::ConsecutiveSeparators
        );
        assert_eq!(
            TenantName::new("-Acme").unwrap_err().violation(),
            &Violation::EdgeSeparator
        );
        assert_eq!(
            TenantName::new("Acme\u{0000}Corp").unwrap_err().violation(),
            &Violation::ControlCharacter
        );
    }

    #[test]
    fn test_name_equality_ignores_case_display_keeps_it() {
        let a = TenantName::new("Acme Corp").unwrap();
        let b = TenantName::new("ACME corp").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.canonical_string(), b.canonical_string());

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_name_initials() {
        let name = OrganizationName::new("acme north-east_branch").unwrap();
        assert_eq!(name.initials(), "ANEB");
    }

    #[test]
    fn test_name_round_trip() {
        let name = DepartmentName::new("Platform Engineering").unwrap();
        let json = name.to_json().unwrap();
        let back = DepartmentName::from_json(&json).unwrap();
        assert_eq!(back, name);
        assert_eq!(back.as_str(), "Platform Engineering");
    }
}
