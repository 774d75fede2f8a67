//! The contract shared by every domain primitive.
//!
//! A value object is built from raw input, normalized, checked against its
//! invariants, and never mutated afterwards. Derived operations return new
//! instances. Serialization goes through a flat `Repr` struct so that decoding
//! a payload runs exactly the same validation as direct construction.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::hash::Hash;

/// Behaviour common to all domain primitives.
///
/// `PartialEq` is the structural `equals`: it is only defined between values of
/// the same type, so comparisons across primitive kinds do not compile. Use
/// [`ValueObject::equals_any`] where the other side is only known dynamically.
pub trait ValueObject: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Flat serialized form.
    type Repr: Serialize + DeserializeOwned;

    /// Type tag reported in every [`ValidationError`] this primitive produces.
    const KIND: PrimitiveKind;

    /// Check the invariants of an already normalized instance.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Human-readable normalized form.
    fn canonical_string(&self) -> String;

    fn to_repr(&self) -> Self::Repr;

    /// Rebuild from the serialized form, re-running full validation.
    fn from_repr(repr: Self::Repr) -> Result<Self, ValidationError>;

    /// Run [`ValueObject::validate`] on a freshly normalized value and hand it back.
    fn checked(self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(self)
    }

    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_repr())
    }

    /// Strict inverse of [`ValueObject::to_json`].
    ///
    /// A payload that does not decode fails with this primitive's kind and a
    /// [`Violation::Malformed`] violation.
    fn from_json(payload: &str) -> Result<Self, ValidationError> {
        let repr: Self::Repr =
            serde_json::from_str(payload).map_err(|e| Self::malformed(payload, &e))?;
        Self::from_repr(repr)
    }

    /// Error for a payload that did not decode.
    ///
    /// Primitives holding secrets override this so neither the payload nor
    /// the decoder's message (which may quote it) reaches the error.
    fn malformed(payload: &str, error: &serde_json::Error) -> ValidationError {
        ValidationError::new(Self::KIND, payload, Violation::Malformed(error.to_string()))
    }

    /// Equality against a dynamically typed value; false for any other type.
    fn equals_any(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<Self>().is_some_and(|o| o == self)
    }
}

/// Implement `Serialize`/`Deserialize` for a primitive through its `Repr`.
///
/// Scoped primitives pass their type parameter and its bound:
/// `impl_value_object_serde!(impl<S: Scope> Id<S>);`
macro_rules! impl_value_object_serde {
    (impl<$g:ident: $bound:path> $ty:ty) => {
        impl<$g: $bound> ::serde::Serialize for $ty {
            fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
            where
                Ser: ::serde::Serializer,
            {
                let repr = <$ty as $crate::domain::ValueObject>::to_repr(self);
                ::serde::Serialize::serialize(&repr, serializer)
            }
        }

        impl<'de, $g: $bound> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let repr =
                    <<$ty as $crate::domain::ValueObject>::Repr as ::serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                <$ty as $crate::domain::ValueObject>::from_repr(repr)
                    .map_err(::serde::de::Error::custom)
            }
        }
    };
    ($ty:ty) => {
        impl ::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                let repr = <$ty as $crate::domain::ValueObject>::to_repr(self);
                ::serde::Serialize::serialize(&repr, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let repr =
                    <<$ty as $crate::domain::ValueObject>::Repr as ::serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                <$ty as $crate::domain::ValueObject>::from_repr(repr)
                    .map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_value_object_serde;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Code, EmailAddress, Id, Name, OrganizationCode, OrganizationId, TenantCode, TenantId,
        TenantName,
    };

    #[test]
    fn test_equals_any_same_type() {
        let a = EmailAddress::new("user@example.com").unwrap();
        let b = EmailAddress::new("USER@example.com").unwrap();
        assert!(a.equals_any(&b));
    }

    #[test]
    fn test_equals_any_rejects_other_types() {
        let code: TenantCode = Code::new("ACME").unwrap();
        let other: OrganizationCode = Code::new("ACME").unwrap();
        assert!(!code.equals_any(&other));
        assert!(!code.equals_any(&"ACME".to_string()));
    }

    #[test]
    fn test_from_json_malformed_reports_kind() {
        let err = EmailAddress::from_json("{not json").unwrap_err();
        assert_eq!(err.kind(), PrimitiveKind::Email);
        assert!(matches!(err.violation(), Violation::Malformed(_)));
    }

    #[test]
    fn test_from_json_revalidates() {
        let err = EmailAddress::from_json(r#"{"value":"not-an-email"}"#).unwrap_err();
        assert_eq!(err.kind(), PrimitiveKind::Email);
        assert!(!matches!(err.violation(), Violation::Malformed(_)));
    }

    #[test]
    fn test_scoped_serde_goes_through_repr() {
        let id: TenantId = Id::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, serde_json::to_string(&id.to_repr()).unwrap());
        assert_eq!(serde_json::from_str::<TenantId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<OrganizationId>(&json).is_err());

        let code: TenantCode = Code::new("ACME").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(serde_json::from_str::<TenantCode>(&json).unwrap(), code);
        assert!(serde_json::from_str::<OrganizationCode>(&json).is_err());

        let name: TenantName = Name::new("Acme Corp").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(serde_json::from_str::<TenantName>(&json).unwrap(), name);
    }

    #[test]
    fn test_scoped_deserialize_revalidates() {
        let err = serde_json::from_str::<TenantCode>(r#"{"value":"no spaces!","scope":"tenant"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("code"), "{err}");
    }
}
