//! Machine code value objects (lookup keys, URL segments).

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::scope::{Department, Organization, Scope, Tenant};
use super::text_rules::{check_charset, check_length, check_separators};
use super::value_object::{impl_value_object_serde, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A scoped, ASCII-only machine code such as `ACME_CN`.
///
/// Input is trimmed and upper-cased before validation.
///
/// # Validation Rules
///
/// - 2 to 20 characters
/// - ASCII letters, digits and underscore only
/// - No leading, trailing or doubled underscore
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::TenantCode;
///
/// let code: TenantCode = " acme_cn ".parse().unwrap();
/// assert_eq!(code.as_str(), "ACME_CN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code<S: Scope> {
    value: String,
    _scope: PhantomData<S>,
}

pub type TenantCode = Code<Tenant>;
pub type OrganizationCode = Code<Organization>;
pub type DepartmentCode = Code<Department>;

impl<S: Scope> Code<S> {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 20;

    /// Create a new code, normalizing then validating.
    ///
    /// # Errors
    ///
    /// Returns a [`PrimitiveKind::Code`] error naming the first rule broken.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self {
            value: raw.as_ref().trim().to_ascii_uppercase(),
            _scope: PhantomData,
        }
        .checked()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRepr {
    pub value: String,
    pub scope: String,
}

impl<S: Scope> ValueObject for Code<S> {
    type Repr = CodeRepr;
    const KIND: PrimitiveKind = PrimitiveKind::Code;

    fn validate(&self) -> Result<(), ValidationError> {
        let v = &self.value;
        check_length(Self::KIND, v, Self::MIN_LEN, Self::MAX_LEN)?;
        check_charset(Self::KIND, v, |c| {
            c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
        })?;
        check_separators(Self::KIND, v, |c| c == '_')
    }

    fn canonical_string(&self) -> String {
        self.value.clone()
    }

    fn to_repr(&self) -> CodeRepr {
        CodeRepr {
            value: self.value.clone(),
            scope: S::NAME.to_string(),
        }
    }

    fn from_repr(repr: CodeRepr) -> Result<Self, ValidationError> {
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

impl_value_object_serde!(impl<S: Scope> Code<S>);

impl<S: Scope> FromStr for Code<S> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<S: Scope> fmt::Display for Code<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
