//! Tenant lifecycle states and the transitions allowed between them.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a tenant.
///
/// ```text
/// Pending ──> Active <──> Suspended
///    │          ^ │
///    │          │ v
///    │        Maintenance
///    └──────> Deleted  (from any state but Deleted)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    #[default]
    Pending,
    Active,
    Suspended,
    Maintenance,
    Deleted,
}

impl TenantStatus {
    pub const ALL: [TenantStatus; 5] = [
        Self::Pending,
        Self::Active,
        Self::Suspended,
        Self::Maintenance,
        Self::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Maintenance => "maintenance",
            Self::Deleted => "deleted",
        }
    }

    pub fn can_transition_to(&self, next: TenantStatus) -> bool {
        use TenantStatus::*;
        match (self, next) {
            (Deleted, _) => false,
            (_, Deleted) => true,
            (Pending, Active) => true,
            (Active, Suspended | Maintenance) => true,
            (Suspended | Maintenance, Active) => true,
            _ => false,
        }
    }

    /// # Errors
    ///
    /// Returns [`Violation::IllegalTransition`] if the table forbids the move.
    pub fn transition_to(&self, next: TenantStatus) -> Result<TenantStatus, ValidationError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ValidationError::new(
                PrimitiveKind::TenantStatus,
                next.as_str(),
                Violation::IllegalTransition {
                    from: self.as_str().to_string(),
                    to: next.as_str().to_string(),
                },
            ))
        }
    }

    /// Whether the tenant's users can work normally.
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl FromStr for TenantStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                ValidationError::new(
                    PrimitiveKind::TenantStatus,
                    s,
                    Violation::Format("unknown tenant status".to_string()),
                )
            })
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
