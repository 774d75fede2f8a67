//! Compile-time scope tags.
//!
//! Identifiers, codes and names are structurally identical across tenants,
//! organizations, departments and users. A zero-size tag type keeps them apart
//! at compile time without changing their runtime representation.

use std::fmt;
use std::hash::Hash;

/// Marker for a domain scope. Implemented only by uninhabited tag types.
pub trait Scope: fmt::Debug + Copy + Eq + Hash + Send + Sync + 'static {
    /// Tag written into serialized payloads and checked on the way back in.
    const NAME: &'static str;
}

macro_rules! define_scope {
    ($(#[$meta:meta])* $tag:ident => $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $tag {}

        impl Scope for $tag {
            const NAME: &'static str = $name;
        }
    };
}

define_scope!(
    /// No particular domain; the plain unique identifier.
    Unscoped => "unscoped"
);
define_scope!(User => "user");
define_scope!(Tenant => "tenant");
define_scope!(Organization => "organization");
define_scope!(Department => "department");
