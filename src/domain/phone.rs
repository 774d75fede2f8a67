//! PhoneNumber value object.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::text_rules::check_charset;
use super::value_object::{impl_value_object_serde, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const COUNTRY_CODE: &str = "86";
const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;

/// Network operator owning a mobile number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    Mobile,
    Unicom,
    Telecom,
    Broadnet,
    /// Mobile virtual network operators
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneKind {
    Mobile,
    Landline,
    Unknown,
}

/// Operator for a three-digit mobile prefix, `None` if the prefix is unassigned.
fn carrier_for(prefix: &str) -> Option<Carrier> {
    let carrier = match prefix {
        "134" | "135" | "136" | "137" | "138" | "139" | "147" | "150" | "151" | "152"
        | "157" | "158" | "159" | "172" | "178" | "182" | "183" | "184" | "187" | "188"
        | "195" | "197" | "198" => Carrier::Mobile,
        "130" | "131" | "132" | "145" | "155" | "156" | "166" | "171" | "175" | "176"
        | "185" | "186" | "196" => Carrier::Unicom,
        "133" | "149" | "153" | "173" | "177" | "180" | "181" | "189" | "190" | "191"
        | "193" | "199" => Carrier::Telecom,
        "192" => Carrier::Broadnet,
        "162" | "165" | "167" | "170" => Carrier::Virtual,
        _ => return None,
    };
    Some(carrier)
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.')
}

/// Classify a national digit string by its structure.
fn classify(digits: &str) -> Result<(PhoneKind, Option<Carrier>), Violation> {
    let len = digits.len();
    if len == 11 && digits.starts_with('1') {
        return match carrier_for(&digits[..3]) {
            Some(carrier) => Ok((PhoneKind::Mobile, Some(carrier))),
            None => Err(Violation::UnknownOperatorPrefix(digits[..3].to_string())),
        };
    }
    if digits.starts_with('0') && (10..=12).contains(&len) {
        return Ok((PhoneKind::Landline, None));
    }
    if len < MIN_DIGITS {
        return Err(Violation::TooShort {
            min: MIN_DIGITS,
            actual: len,
        });
    }
    if len > MAX_DIGITS {
        return Err(Violation::TooLong {
            max: MAX_DIGITS,
            actual: len,
        });
    }
    Ok((PhoneKind::Unknown, None))
}

/// A phone number reduced to its national digits and classified.
///
/// Formatting characters are stripped. The international mobile form with
/// the `86` country code is folded into the 11-digit national form.
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::{Carrier, PhoneKind, PhoneNumber};
///
/// let phone = PhoneNumber::new("+86 138-1234-5678").unwrap();
/// assert_eq!(phone.kind(), PhoneKind::Mobile);
/// assert_eq!(phone.carrier(), Some(Carrier::Mobile));
/// assert_eq!(phone.to_e164(), "+8613812345678");
/// assert_eq!(phone.masked(), "138****5678");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    digits: String,
    kind: PhoneKind,
    carrier: Option<Carrier>,
}

impl PhoneNumber {
    /// Create a new PhoneNumber, validating the format.
    ///
    /// # Validation Rules
    ///
    /// - Can contain: digits, spaces, hyphens, parentheses, plus sign, periods
    /// - 11 digits starting with `1` must carry a known operator prefix
    /// - Landlines start with `0` and have 10 to 12 digits
    /// - Anything else must have 7 to 15 digits
    pub fn new(phone: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = phone.as_ref().trim();
        if raw.is_empty() {
            return Err(ValidationError::new(Self::KIND, raw, Violation::Empty));
        }
        check_charset(Self::KIND, raw, is_phone_char)?;

        let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() == 13 && digits.starts_with("861") {
            digits.drain(..COUNTRY_CODE.len());
        }
        let (kind, carrier) =
            classify(&digits).map_err(|v| ValidationError::new(Self::KIND, raw, v))?;
        Self {
            digits,
            kind,
            carrier,
        }
        .checked()
    }

    pub fn kind(&self) -> PhoneKind {
        self.kind
    }

    pub fn carrier(&self) -> Option<Carrier> {
        self.carrier
    }

    pub fn is_mobile(&self) -> bool {
        self.kind == PhoneKind::Mobile
    }

    /// Digits without country code.
    pub fn national_number(&self) -> &str {
        &self.digits
    }

    /// Get the phone number with only digits (no formatting).
    pub fn digits_only(&self) -> String {
        self.digits.clone()
    }

    /// E.164 form. Domestic numbers get the `+86` country code, landlines
    /// losing their trunk `0`.
    pub fn to_e164(&self) -> String {
        match self.kind {
            PhoneKind::Mobile => format!("+{COUNTRY_CODE}{}", self.digits),
            PhoneKind::Landline => format!("+{COUNTRY_CODE}{}", &self.digits[1..]),
            PhoneKind::Unknown => format!("+{}", self.digits),
        }
    }

    /// Grouped for display: `138 1234 5678`, `010-12345678`, `0755-1234567`.
    pub fn formatted(&self) -> String {
        let d = &self.digits;
        match self.kind {
            PhoneKind::Mobile => format!("{} {} {}", &d[..3], &d[3..7], &d[7..]),
            PhoneKind::Landline => {
                // 010 and 02x are the three-digit area codes
                let area = if d.starts_with("01") || d.starts_with("02") {
                    3
                } else {
                    4
                };
                format!("{}-{}", &d[..area], &d[area..])
            }
            PhoneKind::Unknown => d.clone(),
        }
    }

    /// First three and last four digits visible.
    pub fn masked(&self) -> String {
        let d = &self.digits;
        let hidden = d.len().saturating_sub(7);
        if hidden == 0 {
            return format!("{}{}", "*".repeat(d.len() - 2), &d[d.len() - 2..]);
        }
        format!("{}{}{}", &d[..3], "*".repeat(hidden), &d[d.len() - 4..])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneRepr {
    pub value: String,
    pub kind: PhoneKind,
    pub carrier: Option<Carrier>,
    pub e164: String,
}

impl ValueObject for PhoneNumber {
    type Repr = PhoneRepr;
    const KIND: PrimitiveKind = PrimitiveKind::PhoneNumber;

    fn validate(&self) -> Result<(), ValidationError> {
        check_charset(Self::KIND, &self.digits, |c| c.is_ascii_digit())?;
        let (kind, carrier) = classify(&self.digits)
            .map_err(|v| ValidationError::new(Self::KIND, self.digits.as_str(), v))?;
        if kind != self.kind || carrier != self.carrier {
            return Err(ValidationError::new(
                Self::KIND,
                self.digits.as_str(),
                Violation::Format("classification does not match the number".to_string()),
            ));
        }
        Ok(())
    }

    fn canonical_string(&self) -> String {
        self.digits.clone()
    }

    fn to_repr(&self) -> PhoneRepr {
        PhoneRepr {
            value: self.digits.clone(),
            kind: self.kind,
            carrier: self.carrier,
            e164: self.to_e164(),
        }
    }

    fn from_repr(repr: PhoneRepr) -> Result<Self, ValidationError> {
        let phone = Self::new(&repr.value)?;
        if phone.kind != repr.kind || phone.carrier != repr.carrier {
            return Err(ValidationError::new(
                Self::KIND,
                repr.value,
                Violation::Format(
                    "serialized classification does not match the number".to_string(),
                ),
            ));
        }
        Ok(phone)
    }
}

impl_value_object_serde!(PhoneNumber);

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_mobile() {
        let phone = PhoneNumber::new("13812345678").unwrap();
        assert_eq!(phone.kind(), PhoneKind::Mobile);
        assert_eq!(phone.carrier(), Some(Carrier::Mobile));
        assert!(phone.is_mobile());
        assert_eq!(phone.formatted(), "138 1234 5678");
    }

    #[test]
    fn test_phone_carriers() {
        let carrier = |n: &str| PhoneNumber::new(n).unwrap().carrier();
        assert_eq!(carrier("13012345678"), Some(Carrier::Unicom));
        assert_eq!(carrier("18912345678"), Some(Carrier::Telecom));
        assert_eq!(carrier("19212345678"), Some(Carrier::Broadnet));
        assert_eq!(carrier("17012345678"), Some(Carrier::Virtual));
    }

    #[test]
    fn test_phone_unknown_prefix() {
        let err = PhoneNumber::new("12012345678").unwrap_err();
        assert_eq!(
            err.violation(),
            &Violation::UnknownOperatorPrefix("120".to_string())
        );
    }

    #[test]
    fn test_phone_international_form() {
        let a = PhoneNumber::new("+86 138 1234 5678").unwrap();
        let b = PhoneNumber::new("8613812345678").unwrap();
        let c = PhoneNumber::new("(138) 1234-5678").unwrap();
        assert_eq!(a, c);
        assert_eq!(b, c);
        assert_eq!(a.national_number(), "13812345678");
        assert_eq!(a.to_e164(), "+8613812345678");
    }

    #[test]
    fn test_phone_landline() {
        let beijing = PhoneNumber::new("010-12345678").unwrap();
        assert_eq!(beijing.kind(), PhoneKind::Landline);
        assert_eq!(beijing.carrier(), None);
        assert_eq!(beijing.formatted(), "010-12345678");
        assert_eq!(beijing.to_e164(), "+861012345678");

        let shenzhen = PhoneNumber::new("0755 1234567").unwrap();
        assert_eq!(shenzhen.formatted(), "0755-1234567");
    }

    #[test]
    fn test_phone_unknown() {
        let phone = PhoneNumber::new("+44 (20) 7946-0958").unwrap();
        assert_eq!(phone.kind(), PhoneKind::Unknown);
        assert_eq!(phone.digits_only(), "442079460958");
        assert_eq!(phone.to_e164(), "+442079460958");
        assert_eq!(phone.formatted(), "442079460958");
    }

    #[test]
    fn test_phone_validates_format() {
        assert_eq!(PhoneNumber::new("").unwrap_err().violation(), &Violation::Empty);
        assert!(PhoneNumber::new("no digits").is_err());
        assert!(PhoneNumber::new("invalid@phone").is_err());
        assert!(PhoneNumber::new("12345").unwrap_err().is_length_violation());
        assert!(PhoneNumber::new("1234567890123456").unwrap_err().is_length_violation());
        assert!(PhoneNumber::new("555.123.4567").is_ok());
    }

    #[test]
    fn test_phone_masked() {
        assert_eq!(PhoneNumber::new("13812345678").unwrap().masked(), "138****5678");
        assert_eq!(PhoneNumber::new("5551234").unwrap().masked(), "*****34");
    }

    #[test]
    fn test_phone_serialization() {
        let phone = PhoneNumber::new("+86 138 1234 5678").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(
            json,
            r#"{"value":"13812345678","kind":"mobile","carrier":"mobile","e164":"+8613812345678"}"#
        );
        let back: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, phone);
    }

    #[test]
    fn test_phone_deserialization_rejects_wrong_kind() {
        let json = r#"{"value":"13812345678","kind":"landline","carrier":null,"e164":"+8613812345678"}"#;
        assert!(PhoneNumber::from_json(json).is_err());
    }
}
