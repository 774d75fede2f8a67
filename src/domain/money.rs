//! Fixed-point money value object.
//!
//! Amounts are held as an integer count of `10^-precision` units of a currency.
//! Floating-point input is read through its shortest decimal representation and
//! scaled with integer arithmetic, so the configured rounding mode is applied
//! exactly once, to the digits that do not fit.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::value_object::{impl_value_object_serde, ValueObject};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

static MONEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]{3})\s+([0-9]+\.?[0-9]*)$").expect("money pattern is valid")
});

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cny,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Hkd,
    Sgd,
    Aud,
    Cad,
    Chf,
}

impl Currency {
    pub const ALL: [Currency; 10] = [
        Self::Cny,
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Jpy,
        Self::Hkd,
        Self::Sgd,
        Self::Aud,
        Self::Cad,
        Self::Chf,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cny => "CNY",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Hkd => "HKD",
            Self::Sgd => "SGD",
            Self::Aud => "AUD",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Cny | Self::Jpy => "¥",
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Hkd => "HK$",
            Self::Sgd => "S$",
            Self::Aud => "A$",
            Self::Cad => "C$",
            Self::Chf => "CHF ",
        }
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| {
                ValidationError::new(PrimitiveKind::Money, s, Violation::UnknownCurrency(code))
            })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How digits beyond the precision are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Half-up.
    #[default]
    Round,
    Floor,
    Ceil,
}

impl FromStr for RoundingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round" => Ok(Self::Round),
            "floor" => Ok(Self::Floor),
            "ceil" => Ok(Self::Ceil),
            other => Err(ValidationError::new(
                PrimitiveKind::Money,
                s,
                Violation::Format(format!("unknown rounding mode {other:?}")),
            )),
        }
    }
}

/// Per-instance scaling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoneyOptions {
    pub precision: u32,
    pub rounding: RoundingMode,
}

impl MoneyOptions {
    pub fn new(precision: u32, rounding: RoundingMode) -> Self {
        Self {
            precision,
            rounding,
        }
    }

    pub fn with_precision(self, precision: u32) -> Self {
        Self { precision, ..self }
    }

    pub fn with_rounding(self, rounding: RoundingMode) -> Self {
        Self { rounding, ..self }
    }
}

impl Default for MoneyOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            rounding: RoundingMode::Round,
        }
    }
}

/// A non-negative amount of one currency.
///
/// Equality compares the currency and the amount; `100.5` at precision 1 equals
/// `100.50` at precision 2. Precision and rounding mode are policy, not value.
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::{Currency, Money, MoneyOptions, RoundingMode};
///
/// let options = MoneyOptions::new(2, RoundingMode::Floor);
/// let price = Money::new(100.567, Currency::Cny, options).unwrap();
/// assert_eq!(price.amount_string(), "100.56");
///
/// let total = price.add(&"CNY 0.44".parse().unwrap()).unwrap();
/// assert_eq!(total.to_string(), "CNY 101.00");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Money {
    minor: i64,
    currency: Currency,
    precision: u32,
    rounding: RoundingMode,
}

impl Money {
    pub const MAX_PRECISION: u32 = 8;

    /// Create from a floating-point amount.
    ///
    /// # Errors
    ///
    /// Fails for NaN or infinite amounts, negative amounts, a precision above
    /// [`Money::MAX_PRECISION`], or amounts that overflow the integer representation.
    pub fn new(
        amount: f64,
        currency: Currency,
        options: MoneyOptions,
    ) -> Result<Self, ValidationError> {
        let text = unsigned_decimal_text(amount)
            .map_err(|v| ValidationError::new(PrimitiveKind::Money, amount.to_string(), v))?;
        Self::scaled(&text, currency, options)
            .map_err(|v| ValidationError::new(PrimitiveKind::Money, amount.to_string(), v))?
            .checked()
    }

    /// Create from an unsigned decimal string such as `"19.999"`.
    pub fn from_decimal_str(
        amount: &str,
        currency: Currency,
        options: MoneyOptions,
    ) -> Result<Self, ValidationError> {
        Self::scaled(amount.trim(), currency, options)
            .map_err(|v| ValidationError::new(PrimitiveKind::Money, amount, v))?
            .checked()
    }

    /// Create from an already scaled integer amount.
    pub fn from_minor_units(
        minor: i64,
        currency: Currency,
        options: MoneyOptions,
    ) -> Result<Self, ValidationError> {
        Self {
            minor,
            currency,
            precision: options.precision,
            rounding: options.rounding,
        }
        .checked()
    }

    pub fn zero(currency: Currency) -> Self {
        let options = MoneyOptions::default();
        Self {
            minor: 0,
            currency,
            precision: options.precision,
            rounding: options.rounding,
        }
    }

    /// Parse `"CUR 123.45"` with default options.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        Self::parse_with(text, MoneyOptions::default())
    }

    pub fn parse_with(text: &str, options: MoneyOptions) -> Result<Self, ValidationError> {
        let caps = MONEY_PATTERN.captures(text.trim()).ok_or_else(|| {
            ValidationError::new(
                PrimitiveKind::Money,
                text,
                Violation::Format("expected \"CUR 123.45\"".to_string()),
            )
        })?;
        let currency: Currency = caps[1].parse()?;
        Self::scaled(&caps[2], currency, options)
            .map_err(|v| ValidationError::new(PrimitiveKind::Money, text, v))?
            .checked()
    }

    fn scaled(text: &str, currency: Currency, options: MoneyOptions) -> Result<Self, Violation> {
        check_precision(options.precision)?;
        let minor = scale_decimal(text, options.precision, options.rounding)?;
        Ok(Self {
            minor,
            currency,
            precision: options.precision,
            rounding: options.rounding,
        })
    }

    pub fn minor_units(&self) -> i64 {
        self.minor
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding
    }

    pub fn options(&self) -> MoneyOptions {
        MoneyOptions::new(self.precision, self.rounding)
    }

    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    /// Decimal amount with exactly `precision` fractional digits.
    pub fn amount_string(&self) -> String {
        let p = self.precision as usize;
        if p == 0 {
            return self.minor.to_string();
        }
        let digits = format!("{:0>width$}", self.minor, width = p + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - p);
        format!("{int_part}.{frac_part}")
    }

    /// Lossy conversion for display or charting.
    pub fn to_f64(&self) -> f64 {
        self.minor as f64 / 10f64.powi(self.precision as i32)
    }

    pub fn format_with_symbol(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.amount_string())
    }

    pub fn add(&self, other: &Money) -> Result<Money, ValidationError> {
        self.ensure_same_currency(other)?;
        let (a, b, precision) = self.aligned(other);
        let sum = a
            .checked_add(b)
            .ok_or_else(|| self.error(other.to_string(), Violation::Overflow))?;
        self.derive(sum, precision, other.to_string())
    }

    /// Fails rather than produce a negative amount.
    pub fn subtract(&self, other: &Money) -> Result<Money, ValidationError> {
        self.ensure_same_currency(other)?;
        let (a, b, precision) = self.aligned(other);
        if b > a {
            return Err(self.error(other.to_string(), Violation::Negative));
        }
        self.derive(a - b, precision, other.to_string())
    }

    pub fn multiply(&self, factor: f64) -> Result<Money, ValidationError> {
        let raw = factor.to_string();
        let (significand, exponent) =
            scalar_parts(factor).map_err(|v| self.error(raw.clone(), v))?;
        let product = i128::from(self.minor)
            .checked_mul(significand)
            .ok_or_else(|| self.error(raw.clone(), Violation::Overflow))?;
        let units = if product == 0 {
            0
        } else if exponent >= 0 {
            checked_pow10(exponent.unsigned_abs())
                .and_then(|scale| product.checked_mul(scale))
                .ok_or_else(|| self.error(raw.clone(), Violation::Overflow))?
        } else {
            div_round_by(product, checked_pow10(exponent.unsigned_abs()), self.rounding)
        };
        self.derive(units, self.precision, raw)
    }

    /// Fails with [`Violation::DivisionByZero`] only for a divisor that is exactly zero.
    pub fn divide(&self, divisor: f64) -> Result<Money, ValidationError> {
        let raw = divisor.to_string();
        let (significand, exponent) =
            scalar_parts(divisor).map_err(|v| self.error(raw.clone(), v))?;
        if significand == 0 {
            return Err(self.error(raw, Violation::DivisionByZero));
        }
        let minor = i128::from(self.minor);
        let units = if minor == 0 {
            0
        } else if exponent <= 0 {
            let numerator = checked_pow10(exponent.unsigned_abs())
                .and_then(|scale| minor.checked_mul(scale))
                .ok_or_else(|| self.error(raw.clone(), Violation::Overflow))?;
            div_round(numerator, significand, self.rounding)
        } else {
            let denominator = checked_pow10(exponent.unsigned_abs())
                .and_then(|scale| scale.checked_mul(significand));
            div_round_by(minor, denominator, self.rounding)
        };
        self.derive(units, self.precision, raw)
    }

    /// Split into parts proportional to `ratios`; the parts always sum to `self`.
    ///
    /// Leftover units go to the parts with the largest remainders, earliest first.
    pub fn allocate(&self, ratios: &[u32]) -> Result<Vec<Money>, ValidationError> {
        let total: i128 = ratios.iter().map(|r| i128::from(*r)).sum();
        if total == 0 {
            return Err(self.error(
                format!("{ratios:?}"),
                Violation::Format("ratios must have a positive total".to_string()),
            ));
        }
        let minor = i128::from(self.minor);
        let mut shares: Vec<i128> = Vec::with_capacity(ratios.len());
        let mut remainders: Vec<(usize, i128)> = Vec::with_capacity(ratios.len());
        for (idx, ratio) in ratios.iter().enumerate() {
            let scaled = minor * i128::from(*ratio);
            shares.push(scaled / total);
            remainders.push((idx, scaled % total));
        }
        let mut leftover = minor - shares.iter().sum::<i128>();
        remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (idx, _) in remainders {
            if leftover == 0 {
                break;
            }
            shares[idx] += 1;
            leftover -= 1;
        }
        shares
            .into_iter()
            .map(|units| self.derive(units, self.precision, format!("{ratios:?}")))
            .collect()
    }

    /// Order two amounts of the same currency.
    pub fn compare_to(&self, other: &Money) -> Result<Ordering, ValidationError> {
        self.ensure_same_currency(other)?;
        let (a, b, _) = self.aligned(other);
        Ok(a.cmp(&b))
    }

    pub fn is_greater_than(&self, other: &Money) -> Result<bool, ValidationError> {
        Ok(self.compare_to(other)? == Ordering::Greater)
    }

    pub fn is_less_than(&self, other: &Money) -> Result<bool, ValidationError> {
        Ok(self.compare_to(other)? == Ordering::Less)
    }

    /// Rescale to another precision using this instance's rounding mode.
    pub fn with_precision(&self, precision: u32) -> Result<Money, ValidationError> {
        check_precision(precision).map_err(|v| self.error(precision.to_string(), v))?;
        let current = i128::from(self.minor);
        let units = if precision >= self.precision {
            current
                .checked_mul(pow10(precision - self.precision))
                .ok_or_else(|| self.error(precision.to_string(), Violation::Overflow))?
        } else {
            div_round(current, pow10(self.precision - precision), self.rounding)
        };
        self.derive(units, precision, precision.to_string())
    }

    /// Same amount, different rounding policy for subsequent arithmetic.
    pub fn with_rounding(&self, rounding: RoundingMode) -> Money {
        Money { rounding, ..*self }
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), ValidationError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(self.error(
                other.to_string(),
                Violation::CurrencyMismatch {
                    left: self.currency,
                    right: other.currency,
                },
            ))
        }
    }

    /// Both amounts expressed at the larger of the two precisions.
    fn aligned(&self, other: &Money) -> (i128, i128, u32) {
        let precision = self.precision.max(other.precision);
        let a = i128::from(self.minor) * pow10(precision - self.precision);
        let b = i128::from(other.minor) * pow10(precision - other.precision);
        (a, b, precision)
    }

    fn derive(&self, units: i128, precision: u32, raw: String) -> Result<Money, ValidationError> {
        let minor = i64::try_from(units).map_err(|_| self.error(raw, Violation::Overflow))?;
        Money {
            minor,
            currency: self.currency,
            precision,
            rounding: self.rounding,
        }
        .checked()
    }

    fn error(&self, raw: String, violation: Violation) -> ValidationError {
        ValidationError::new(PrimitiveKind::Money, raw, violation)
    }

    /// Amount with trailing fractional zeros removed, for equality and hashing.
    fn reduced(&self) -> (i64, u32) {
        let (mut minor, mut precision) = (self.minor, self.precision);
        while precision > 0 && minor % 10 == 0 {
            minor /= 10;
            precision -= 1;
        }
        (minor, precision)
    }
}

fn check_precision(precision: u32) -> Result<(), Violation> {
    if precision > Money::MAX_PRECISION {
        return Err(Violation::Precision {
            precision,
            max: Money::MAX_PRECISION,
        });
    }
    Ok(())
}

fn pow10(exp: u32) -> i128 {
    10i128.pow(exp)
}

/// Shortest decimal text of a finite, non-negative float. Never uses exponent notation.
fn unsigned_decimal_text(amount: f64) -> Result<String, Violation> {
    if !amount.is_finite() {
        return Err(Violation::NotFinite);
    }
    if amount < 0.0 {
        return Err(Violation::Negative);
    }
    if amount == 0.0 {
        return Ok("0".to_string());
    }
    Ok(format!("{amount}"))
}

fn split_decimal(text: &str) -> Result<(&str, &str), Violation> {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    if text.starts_with('-') {
        return Err(Violation::Negative);
    }
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !digits_only(int_part) || !digits_only(frac_part) {
        return Err(Violation::Format(format!("{text:?} is not a decimal number")));
    }
    Ok((int_part, frac_part))
}

/// Convert decimal text to units of `10^-precision`, rounding the discarded digits.
fn scale_decimal(text: &str, precision: u32, mode: RoundingMode) -> Result<i64, Violation> {
    let (int_part, frac_part) = split_decimal(text)?;
    let p = precision as usize;
    let (kept, rest) = frac_part.split_at(frac_part.len().min(p));

    let mut digits = String::with_capacity(int_part.len() + p);
    digits.push_str(int_part);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(p - kept.len()));

    let significant = digits.trim_start_matches('0');
    if significant.len() > 19 {
        return Err(Violation::Overflow);
    }
    let mut units: i128 = if significant.is_empty() {
        0
    } else {
        significant.parse().map_err(|_| Violation::Overflow)?
    };

    let bump = match mode {
        RoundingMode::Round => rest.bytes().next().is_some_and(|d| d >= b'5'),
        RoundingMode::Floor => false,
        RoundingMode::Ceil => rest.bytes().any(|d| d != b'0'),
    };
    if bump {
        units += 1;
    }
    i64::try_from(units).map_err(|_| Violation::Overflow)
}

/// A non-negative scalar as `significand * 10^exponent`, with no digits dropped.
fn scalar_parts(value: f64) -> Result<(i128, i32), Violation> {
    let text = unsigned_decimal_text(value)?;
    let (int_part, frac_part) = split_decimal(&text)?;
    let digits = format!("{int_part}{frac_part}");
    let leading = digits.trim_start_matches('0');
    let significant = leading.trim_end_matches('0');
    if significant.is_empty() {
        return Ok((0, 0));
    }
    if significant.len() > 36 {
        return Err(Violation::Overflow);
    }
    let trailing_zeros = (leading.len() - significant.len()) as i64;
    let exponent = i32::try_from(trailing_zeros - frac_part.len() as i64)
        .map_err(|_| Violation::Overflow)?;
    let significand = significant.parse().map_err(|_| Violation::Overflow)?;
    Ok((significand, exponent))
}

fn checked_pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

/// Like [`div_round`], where `None` is a divisor beyond `i128`.
///
/// Callers only pass numerators far below such a divisor, so the quotient is
/// zero and only `Ceil` rounds a non-zero remainder up.
fn div_round_by(n: i128, d: Option<i128>, mode: RoundingMode) -> i128 {
    match d {
        Some(d) => div_round(n, d, mode),
        None => i128::from(mode == RoundingMode::Ceil && n > 0),
    }
}

/// `n / d` for `n >= 0`, `d > 0`, resolved by `mode`.
fn div_round(n: i128, d: i128, mode: RoundingMode) -> i128 {
    let (q, r) = (n / d, n % d);
    let bump = match mode {
        RoundingMode::Round => r * 2 >= d,
        RoundingMode::Floor => false,
        RoundingMode::Ceil => r > 0,
    };
    if bump {
        q + 1
    } else {
        q
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.reduced() == other.reduced()
    }
}

impl Eq for Money {}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.currency.hash(state);
        self.reduced().hash(state);
    }
}

/// Serialized form. `amount` is a decimal string so no float drift enters the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyRepr {
    pub amount: String,
    pub currency: Currency,
    pub precision: u32,
    pub rounding_mode: RoundingMode,
}

impl ValueObject for Money {
    type Repr = MoneyRepr;
    const KIND: PrimitiveKind = PrimitiveKind::Money;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.minor < 0 {
            return Err(self.error(self.minor.to_string(), Violation::Negative));
        }
        check_precision(self.precision).map_err(|v| self.error(self.precision.to_string(), v))
    }

    fn canonical_string(&self) -> String {
        self.to_string()
    }

    fn to_repr(&self) -> MoneyRepr {
        MoneyRepr {
            amount: self.amount_string(),
            currency: self.currency,
            precision: self.precision,
            rounding_mode: self.rounding,
        }
    }

    fn from_repr(repr: MoneyRepr) -> Result<Self, ValidationError> {
        Self::from_decimal_str(
            &repr.amount,
            repr.currency,
            MoneyOptions::new(repr.precision, repr.rounding_mode),
        )
    }
}

impl_value_object_serde!(Money);

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cny(amount: f64) -> Money {
        Money::new(amount, Currency::Cny, MoneyOptions::default()).unwrap()
    }

    #[test]
    fn test_rounding_modes_applied_once() {
        let floor = Money::new(100.567, Currency::Cny, MoneyOptions::new(2, RoundingMode::Floor));
        assert_eq!(floor.unwrap().amount_string(), "100.56");

        let round = Money::new(100.565, Currency::Cny, MoneyOptions::new(2, RoundingMode::Round));
        assert_eq!(round.unwrap().amount_string(), "100.57");

        let ceil = Money::new(100.561, Currency::Cny, MoneyOptions::new(2, RoundingMode::Ceil));
        assert_eq!(ceil.unwrap().amount_string(), "100.57");

        let exact = Money::new(1.15, Currency::Usd, MoneyOptions::new(2, RoundingMode::Floor));
        assert_eq!(exact.unwrap().amount_string(), "1.15");
    }

    #[test]
    fn test_invalid_amounts() {
        let opts = MoneyOptions::default();
        let err = Money::new(f64::NAN, Currency::Usd, opts).unwrap_err();
        assert_eq!(err.violation(), &Violation::NotFinite);
        assert_eq!(err.kind(), PrimitiveKind::Money);
        assert!(Money::new(f64::INFINITY, Currency::Usd, opts).is_err());
        assert_eq!(
            Money::new(-0.01, Currency::Usd, opts).unwrap_err().violation(),
            &Violation::Negative
        );
        assert_eq!(
            Money::new(1.0, Currency::Usd, opts.with_precision(9))
                .unwrap_err()
                .violation(),
            &Violation::Precision { precision: 9, max: 8 }
        );
        assert_eq!(
            Money::new(1e30, Currency::Usd, opts).unwrap_err().violation(),
            &Violation::Overflow
        );
        assert!(Money::new(-0.0, Currency::Usd, opts).unwrap().is_zero());
    }

    #[test]
    fn test_precision_zero_and_high() {
        let yen = Money::new(1234.5, Currency::Jpy, MoneyOptions::new(0, RoundingMode::Round)).unwrap();
        assert_eq!(yen.amount_string(), "1235");
        let fine = Money::from_decimal_str("0.00000001", Currency::Usd, MoneyOptions::new(8, RoundingMode::Round)).unwrap();
        assert_eq!(fine.minor_units(), 1);
        assert_eq!(fine.amount_string(), "0.00000001");
    }

    #[test]
    fn test_add_and_subtract() {
        let a = cny(10.25);
        let b = cny(0.75);
        assert_eq!(a.add(&b).unwrap().amount_string(), "11.00");
        assert_eq!(a.subtract(&b).unwrap().amount_string(), "9.50");
        assert_eq!(
            b.subtract(&a).unwrap_err().violation(),
            &Violation::Negative
        );
    }

    #[test]
    fn test_currency_mismatch() {
        let a = cny(1.0);
        let b = Money::new(1.0, Currency::Usd, MoneyOptions::default()).unwrap();
        for err in [
            a.add(&b).unwrap_err(),
            a.subtract(&b).unwrap_err(),
            a.compare_to(&b).unwrap_err(),
        ] {
            assert_eq!(
                err.violation(),
                &Violation::CurrencyMismatch {
                    left: Currency::Cny,
                    right: Currency::Usd
                }
            );
        }
        assert!(a.is_greater_than(&b).is_err());
        assert!(a.is_less_than(&b).is_err());
    }

    #[test]
    fn test_mixed_precision_add() {
        let a = Money::from_decimal_str("1.5", Currency::Eur, MoneyOptions::new(1, RoundingMode::Round)).unwrap();
        let b = Money::from_decimal_str("0.005", Currency::Eur, MoneyOptions::new(3, RoundingMode::Round)).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.precision(), 3);
        assert_eq!(sum.amount_string(), "1.505");
    }

    #[test]
    fn test_multiply_and_divide() {
        let price = cny(19.99);
        assert_eq!(price.multiply(3.0).unwrap().amount_string(), "59.97");
        assert_eq!(price.multiply(0.5).unwrap().amount_string(), "10.00");

        let floor = price.with_rounding(RoundingMode::Floor);
        assert_eq!(floor.multiply(0.5).unwrap().amount_string(), "9.99");

        assert_eq!(cny(10.0).divide(3.0).unwrap().amount_string(), "3.33");
        let ceil = cny(10.0).with_rounding(RoundingMode::Ceil);
        assert_eq!(ceil.divide(3.0).unwrap().amount_string(), "3.34");
        assert_eq!(cny(10.0).divide(0.5).unwrap().amount_string(), "20.00");
    }

    #[test]
    fn test_divide_by_zero() {
        let err = cny(10.0).divide(0.0).unwrap_err();
        assert_eq!(err.violation(), &Violation::DivisionByZero);
        assert_eq!(err.kind(), PrimitiveKind::Money);
    }

    #[test]
    fn test_tiny_scalars_round_exactly_once() {
        let ceil = cny(100.0).with_rounding(RoundingMode::Ceil);
        assert_eq!(ceil.multiply(1e-19).unwrap().amount_string(), "0.01");
        assert_eq!(ceil.multiply(1e-300).unwrap().amount_string(), "0.01");

        let floor = cny(100.0).with_rounding(RoundingMode::Floor);
        assert!(floor.multiply(1e-19).unwrap().is_zero());
        assert!(cny(100.0).multiply(1e-19).unwrap().is_zero());

        // 0.1 is the shortest form of its float, so the product stays exact
        assert_eq!(cny(0.3).multiply(0.1).unwrap().amount_string(), "0.03");
    }

    #[test]
    fn test_tiny_and_huge_divisors() {
        let zero = Money::zero(Currency::Cny);
        assert!(zero.divide(1e-300).unwrap().is_zero());

        let err = cny(1.0).divide(1e-300).unwrap_err();
        assert_eq!(err.violation(), &Violation::Overflow);

        let ceil = cny(5.0).with_rounding(RoundingMode::Ceil);
        assert_eq!(ceil.divide(1e300).unwrap().amount_string(), "0.01");
        assert!(cny(5.0).divide(1e300).unwrap().is_zero());
        assert_eq!(cny(5.0).divide(1e-2).unwrap().amount_string(), "500.00");
    }

    #[test]
    fn test_huge_factor_overflows() {
        let err = cny(1.0).multiply(1e300).unwrap_err();
        assert_eq!(err.violation(), &Violation::Overflow);
        assert!(Money::zero(Currency::Cny).multiply(1e300).unwrap().is_zero());
    }

    #[test]
    fn test_scalar_validation() {
        assert_eq!(
            cny(1.0).multiply(-2.0).unwrap_err().violation(),
            &Violation::Negative
        );
        assert_eq!(
            cny(1.0).divide(f64::NAN).unwrap_err().violation(),
            &Violation::NotFinite
        );
    }

    #[test]
    fn test_allocate_sums_exactly() {
        let total = cny(100.0);
        let parts = total.allocate(&[1, 1, 1]).unwrap();
        let strings: Vec<String> = parts.iter().map(Money::amount_string).collect();
        assert_eq!(strings, vec!["33.34", "33.33", "33.33"]);

        let sum = parts
            .iter()
            .try_fold(Money::zero(Currency::Cny), |acc, m| acc.add(m))
            .unwrap();
        assert_eq!(sum, total);

        assert!(total.allocate(&[]).is_err());
        assert!(total.allocate(&[0, 0]).is_err());
    }

    #[test]
    fn test_compare() {
        let small = cny(1.0);
        let big = cny(2.0);
        assert_eq!(small.compare_to(&big).unwrap(), Ordering::Less);
        assert!(big.is_greater_than(&small).unwrap());
        assert!(small.is_less_than(&big).unwrap());
        assert!(!small.is_greater_than(&small).unwrap());
    }

    #[test]
    fn test_equality_ignores_scale() {
        let a = Money::from_decimal_str("100.5", Currency::Usd, MoneyOptions::new(1, RoundingMode::Round)).unwrap();
        let b = Money::from_decimal_str("100.50", Currency::Usd, MoneyOptions::new(2, RoundingMode::Floor)).unwrap();
        assert_eq!(a, b);
        let c = Money::from_decimal_str("100.50", Currency::Hkd, MoneyOptions::default()).unwrap();
        assert_ne!(b, c);
    }

    #[test]
    fn test_with_precision() {
        let m = cny(1.255);
        assert_eq!(m.amount_string(), "1.26");
        assert_eq!(m.with_precision(4).unwrap().amount_string(), "1.2600");
        assert_eq!(m.with_precision(1).unwrap().amount_string(), "1.3");
        assert!(m.with_precision(12).is_err());
    }

    #[test]
    fn test_parse() {
        let m: Money = "CNY 123.45".parse().unwrap();
        assert_eq!(m.currency(), Currency::Cny);
        assert_eq!(m.amount_string(), "123.45");
        assert_eq!(Money::parse("USD   7").unwrap().amount_string(), "7.00");
        assert_eq!(Money::parse("USD 7.").unwrap().amount_string(), "7.00");

        assert!(Money::parse("usd 7").is_err());
        assert!(Money::parse("USD -7").is_err());
        assert!(Money::parse("USD7").is_err());
        let err = Money::parse("XYZ 1.00").unwrap_err();
        assert_eq!(err.violation(), &Violation::UnknownCurrency("XYZ".to_string()));
    }

    #[test]
    fn test_display_forms() {
        let m = cny(8.5);
        assert_eq!(m.to_string(), "CNY 8.50");
        assert_eq!(m.format_with_symbol(), "¥8.50");
        assert_eq!(m.to_f64(), 8.5);
        assert_eq!(Money::zero(Currency::Gbp).to_string(), "GBP 0.00");
    }

    #[test]
    fn test_money_serialization() {
        let m = Money::new(100.567, Currency::Cny, MoneyOptions::new(2, RoundingMode::Floor)).unwrap();
        let json = m.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"amount":"100.56","currency":"CNY","precision":2,"rounding_mode":"floor"}"#
        );
        let back = Money::from_json(&json).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.rounding_mode(), RoundingMode::Floor);
    }

    #[test]
    fn test_money_deserialization_invalid_fails() {
        let err = Money::from_json(r#"{"amount":"-1","currency":"CNY","precision":2,"rounding_mode":"round"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), PrimitiveKind::Money);
        let err = Money::from_json(r#"{"amount":"1","currency":"XYZ","precision":2,"rounding_mode":"round"}"#)
            .unwrap_err();
        assert!(matches!(err.violation(), Violation::Malformed(_)));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("cny".parse::<Currency>().unwrap(), Currency::Cny);
        assert!("ABC".parse::<Currency>().is_err());
        assert_eq!("floor".parse::<RoundingMode>().unwrap(), RoundingMode::Floor);
    }
}
