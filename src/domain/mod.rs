//! Domain value objects and types.
//!
//! Every primitive here is constructed from raw input, normalized, checked
//! against its invariants and immutable from then on. Invalid data cannot be
//! represented: a constructor either returns a fully valid value or a
//! [`ValidationError`] naming the type and the rule that failed.

pub mod auth_token;
pub mod code;
pub mod date_range;
pub mod device_token;
pub mod domain_name;
pub mod email;
pub mod errors;
pub mod identifier;
pub mod money;
pub mod name;
pub mod phone;
pub mod scope;
pub mod tenant_status;
mod text_rules;
pub mod username;
pub mod value_object;
pub mod webhook_url;

pub use auth_token::{AuthToken, TokenType};
pub use code::{Code, DepartmentCode, OrganizationCode, TenantCode};
pub use date_range::{Bounds, DateRange, Period};
pub use device_token::{DeviceToken, Platform};
pub use domain_name::DomainName;
pub use email::{Email, EmailAddress};
pub use errors::{PrimitiveKind, ValidationError, ValidationResult, Violation};
pub use identifier::{DepartmentId, Id, OrganizationId, TenantId, UniqueId, UserId};
pub use money::{Currency, Money, MoneyOptions, RoundingMode};
pub use name::{DepartmentName, Name, OrganizationName, PersonName, TenantName};
pub use phone::{Carrier, PhoneKind, PhoneNumber};
pub use scope::{Department, Organization, Scope, Tenant, Unscoped, User};
pub use tenant_status::TenantStatus;
pub use username::Username;
pub use value_object::ValueObject;
pub use webhook_url::WebhookUrl;
