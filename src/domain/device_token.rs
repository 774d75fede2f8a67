//! Push notification device token.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::text_rules::{check_length, check_no_control};
use super::value_object::{impl_value_object_serde, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const APNS_LEN: usize = 64;
const WEB_PUSH_LEN: usize = 87;
const FCM_MIN_LEN: usize = 140;

/// Push service a token belongs to, detected from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    Android,
    WebPush,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::WebPush => "web_push",
            Self::Unknown => "unknown",
        }
    }

    /// Classify a trimmed token by length and alphabet.
    pub fn detect(token: &str) -> Self {
        let url_safe = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        let len = token.len();
        if len == APNS_LEN && token.chars().all(|c| c.is_ascii_hexdigit()) {
            Self::Ios
        } else if len == WEB_PUSH_LEN && token.chars().all(url_safe) {
            Self::WebPush
        } else if len >= FCM_MIN_LEN && token.chars().all(|c| url_safe(c) || c == ':') {
            Self::Android
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device registration token for push delivery.
///
/// Tokens that match no known platform shape are still accepted as
/// [`Platform::Unknown`] provided they meet the general rules.
///
/// # Validation Rules
///
/// - 32 to 256 characters after trimming
/// - No control characters and no inner whitespace
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::{DeviceToken, Platform};
///
/// let token = DeviceToken::new("A".repeat(64)).unwrap();
/// assert_eq!(token.platform(), Platform::Ios);
/// assert_eq!(token.as_str(), "a".repeat(64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceToken {
    token: String,
    platform: Platform,
}

impl DeviceToken {
    pub const MIN_LEN: usize = 32;
    pub const MAX_LEN: usize = 256;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        let platform = Platform::detect(trimmed);
        let token = if platform == Platform::Ios {
            trimmed.to_ascii_lowercase()
        } else {
            trimmed.to_string()
        };
        Self { token, platform }.checked()
    }

    /// Like [`DeviceToken::new`], but the detected platform must be `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::PlatformMismatch`] when the token has another shape.
    pub fn for_platform(
        raw: impl AsRef<str>,
        expected: Platform,
    ) -> Result<Self, ValidationError> {
        let token = Self::new(raw)?;
        if token.platform != expected {
            return Err(ValidationError::new(
                Self::KIND,
                token.masked(),
                Violation::PlatformMismatch {
                    expected: expected.to_string(),
                    detected: token.platform.to_string(),
                },
            ));
        }
        Ok(token)
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// First eight and last four characters, e.g. `abcdef01...89ab`.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceTokenRepr {
    pub token: String,
    pub platform: Platform,
}

impl ValueObject for DeviceToken {
    type Repr = DeviceTokenRepr;
    const KIND: PrimitiveKind = PrimitiveKind::DeviceToken;

    fn validate(&self) -> Result<(), ValidationError> {
        let t = &self.token;
        check_length(Self::KIND, t, Self::MIN_LEN, Self::MAX_LEN)?;
        check_no_control(Self::KIND, t)?;
        if t.chars().any(char::is_whitespace) {
            return Err(ValidationError::new(
                Self::KIND,
                t.as_str(),
                Violation::Whitespace,
            ));
        }
        let detected = Platform::detect(t);
        if detected != self.platform {
            return Err(ValidationError::new(
                Self::KIND,
                t.as_str(),
                Violation::PlatformMismatch {
                    expected: self.platform.to_string(),
                    detected: detected.to_string(),
                },
            ));
        }
        Ok(())
    }

    fn canonical_string(&self) -> String {
        self.token.clone()
    }

    fn to_repr(&self) -> DeviceTokenRepr {
        DeviceTokenRepr {
            token: self.token.clone(),
            platform: self.platform,
        }
    }

    fn from_repr(repr: DeviceTokenRepr) -> Result<Self, ValidationError> {
        Self::for_platform(repr.token, repr.platform)
    }
}

impl_value_object_serde!(DeviceToken);

impl FromStr for DeviceToken {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}
