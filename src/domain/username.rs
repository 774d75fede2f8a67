//! Username value object.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::text_rules::{check_charset, check_length, check_separators};
use super::value_object::{impl_value_object_serde, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Login names that may never be registered.
const RESERVED: &[&str] = &[
    "admin",
    "administrator",
    "root",
    "system",
    "support",
    "api",
    "null",
    "undefined",
];

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '.' | '-')
}

/// A login-style username.
///
/// Comparison is case-insensitive; the original casing is kept for display.
///
/// # Validation Rules
///
/// - 3 to 32 characters
/// - ASCII letters, digits, `_`, `.` and `-`
/// - Must start with a letter
/// - No trailing or doubled separator
/// - Not a reserved name
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::Username;
///
/// let a = Username::new("Alice.Smith").unwrap();
/// let b = Username::new("alice.smith").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "Alice.Smith");
/// ```
#[derive(Debug, Clone)]
pub struct Username {
    display: String,
    key: String,
}

impl Username {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 32;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let display = raw.as_ref().trim().to_string();
        let key = display.to_ascii_lowercase();
        Self { display, key }.checked()
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lower-cased form used for equality and lookups.
    pub fn normalized(&self) -> &str {
        &self.key
    }

    pub fn is_reserved(raw: &str) -> bool {
        RESERVED.contains(&raw.trim().to_ascii_lowercase().as_str())
    }
}

impl PartialEq for Username {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Username {}

impl Hash for Username {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameRepr {
    pub value: String,
    pub normalized: String,
}

impl ValueObject for Username {
    type Repr = UsernameRepr;
    const KIND: PrimitiveKind = PrimitiveKind::Username;

    fn validate(&self) -> Result<(), ValidationError> {
        let v = &self.display;
        check_length(Self::KIND, v, Self::MIN_LEN, Self::MAX_LEN)?;
        check_charset(Self::KIND, v, |c| c.is_ascii_alphanumeric() || is_separator(c))?;
        if v.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ValidationError::new(
                Self::KIND,
                v.as_str(),
                Violation::LeadingDigit,
            ));
        }
        check_separators(Self::KIND, v, is_separator)?;
        if RESERVED.contains(&self.key.as_str()) {
            return Err(ValidationError::new(
                Self::KIND,
                v.as_str(),
                Violation::Reserved(self.key.clone()),
            ));
        }
        Ok(())
    }

    fn canonical_string(&self) -> String {
        self.display.clone()
    }

    fn to_repr(&self) -> UsernameRepr {
        UsernameRepr {
            value: self.display.clone(),
            normalized: self.key.clone(),
        }
    }

    fn from_repr(repr: UsernameRepr) -> Result<Self, ValidationError> {
        Self::new(repr.value)
    }
}

impl_value_object_serde!(Username);

impl FromStr for Username {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
