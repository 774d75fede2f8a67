//! Unique identifier value objects.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::scope::{Department, Organization, Scope, Tenant, Unscoped, User};
use super::value_object::{impl_value_object_serde, ValueObject};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// Hyphenated version-4 layout: the version nibble is `4`, the variant nibble one of `8 9 a b`.
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("identifier pattern is valid")
});

/// A type-safe unique identifier scoped to one domain.
///
/// `Id<User>` and `Id<Department>` share a representation but are distinct
/// types, so one can never be passed or compared where the other is expected.
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::{TenantId, UserId};
///
/// let tenant = TenantId::generate();
/// let parsed: TenantId = tenant.to_string().parse().unwrap();
/// assert_eq!(tenant, parsed);
///
/// // Same text, different scope: a separate type.
/// let user: UserId = tenant.to_string().parse().unwrap();
/// assert_eq!(user.as_str(), tenant.as_str());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<S: Scope> {
    uuid: Uuid,
    _scope: PhantomData<S>,
}

/// Identifier with no domain tag.
pub type UniqueId = Id<Unscoped>;
pub type UserId = Id<User>;
pub type TenantId = Id<Tenant>;
pub type OrganizationId = Id<Organization>;
pub type DepartmentId = Id<Department>;

impl<S: Scope> Id<S> {
    /// Generate a fresh identifier from the operating system's secure random source.
    pub fn generate() -> Self {
        Self::from_parts(Uuid::new_v4())
    }

    /// Parse and validate a hyphenated identifier. Upper-case hex is accepted and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns a [`PrimitiveKind::Identifier`] error if the text is not a
    /// hyphenated version-4 identifier.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new(
                PrimitiveKind::Identifier,
                raw,
                Violation::Empty,
            ));
        }
        if !ID_PATTERN.is_match(trimmed) {
            return Err(ValidationError::new(
                PrimitiveKind::Identifier,
                raw,
                Violation::Format("expected a hyphenated version-4 identifier".to_string()),
            ));
        }
        let uuid = Uuid::parse_str(trimmed).map_err(|e| {
            ValidationError::new(
                PrimitiveKind::Identifier,
                raw,
                Violation::Format(e.to_string()),
            )
        })?;
        Self::from_parts(uuid).checked()
    }

    /// Wrap an existing UUID, which must be version 4 with the standard variant.
    pub fn from_uuid(uuid: Uuid) -> Result<Self, ValidationError> {
        Self::from_parts(uuid).checked()
    }

    /// Construct from text that was validated elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is not a valid identifier.
    pub fn from_trusted(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns true if `raw` would be accepted by [`Id::parse`].
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    fn from_parts(uuid: Uuid) -> Self {
        Self {
            uuid,
            _scope: PhantomData,
        }
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.uuid
    }

    /// Lower-case hyphenated text.
    pub fn as_str(&self) -> String {
        self.uuid.hyphenated().to_string()
    }

    /// Name of the scope tag, e.g. `"tenant"`.
    pub fn scope(&self) -> &'static str {
        S::NAME
    }

    /// Drop the domain tag.
    pub fn into_unscoped(self) -> UniqueId {
        Id::from_parts(self.uuid)
    }

    /// Attach this scope's tag to an untagged identifier.
    pub fn tag(id: UniqueId) -> Self {
        Self::from_parts(id.uuid)
    }
}

/// Serialized form: `{ "value": "...", "scope": "tenant" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdRepr {
    pub value: String,
    pub scope: String,
}

impl<S: Scope> ValueObject for Id<S> {
    type Repr = IdRepr;
    const KIND: PrimitiveKind = PrimitiveKind::Identifier;

    fn validate(&self) -> Result<(), ValidationError> {
        let version_ok = self.uuid.get_version_num() == 4;
        let variant_ok = self.uuid.get_variant() == uuid::Variant::RFC4122;
        if version_ok && variant_ok {
            Ok(())
        } else {
            Err(ValidationError::new(
                PrimitiveKind::Identifier,
                self.as_str(),
                Violation::Format("version or variant nibble is not reserved value".to_string()),
            ))
        }
    }

    fn canonical_string(&self) -> String {
        self.as_str()
    }

    fn to_repr(&self) -> IdRepr {
        IdRepr {
            value: self.as_str(),
            scope: S::NAME.to_string(),
        }
    }

    fn from_repr(repr: IdRepr) -> Result<Self, ValidationError> {
        if repr.scope != S::NAME {
            return Err(ValidationError::new(
                PrimitiveKind::Identifier,
                repr.value,
                Violation::ScopeMismatch {
                    expected: S::NAME.to_string(),
                    found: repr.scope,
                },
            ));
        }
        Self::parse(&repr.value)
    }
}

impl_value_object_serde!(impl<S: Scope> Id<S>);

impl<S: Scope> FromStr for Id<S> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Display support
impl<S: Scope> fmt::Display for Id<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid.hyphenated())
    }
}
