//! Date range value object and interval algebra.
//!
//! All comparisons are made on UTC instants. The timezone tag travels with the
//! range for display only. Queries that depend on "now" take it as an argument.

use super::errors::{PrimitiveKind, ValidationError, Violation};
use super::value_object::{impl_value_object_serde, ValueObject};
use chrono::{
    DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Timelike,
    Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})\s+to\s+(\d{4}-\d{2}-\d{2})$")
        .expect("date range pattern is valid")
});

static TIMEZONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(UTC|[A-Za-z]+(/[A-Za-z0-9_+\-]+)+|[+-](0\d|1[0-4]):[0-5]\d)$")
        .expect("timezone pattern is valid")
});

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Inclusivity of the two ends of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bounds {
    /// `[start, end]`
    #[default]
    Closed,
    /// `(start, end)`
    Open,
    /// `[start, end)`
    ClosedOpen,
    /// `(start, end]`
    OpenClosed,
}

impl Bounds {
    pub fn from_flags(include_start: bool, include_end: bool) -> Self {
        match (include_start, include_end) {
            (true, true) => Self::Closed,
            (false, false) => Self::Open,
            (true, false) => Self::ClosedOpen,
            (false, true) => Self::OpenClosed,
        }
    }

    pub fn includes_start(self) -> bool {
        matches!(self, Self::Closed | Self::ClosedOpen)
    }

    pub fn includes_end(self) -> bool {
        matches!(self, Self::Closed | Self::OpenClosed)
    }
}

/// Calendar period a range falls within, relative to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    Other,
}

/// An interval between two instants with independently inclusive or exclusive ends.
///
/// # Example
///
/// ```
/// use tenant_primitives::domain::DateRange;
///
/// let q1: DateRange = "2024-01-01 to 2024-03-31".parse().unwrap();
/// let march: DateRange = "2024-03-01 to 2024-04-30".parse().unwrap();
/// assert!(q1.overlaps(&march));
/// assert_eq!(q1.intersection(&march).unwrap().to_date_string(), "2024-03-01 to 2024-03-31");
/// ```
#[derive(Debug, Clone)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bounds: Bounds,
    timezone: String,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn out_of_range(now: DateTime<Utc>) -> ValidationError {
    ValidationError::new(
        PrimitiveKind::DateRange,
        now.to_rfc3339(),
        Violation::Format("date is outside the supported calendar".to_string()),
    )
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

impl DateRange {
    /// Closed range `[start, end]` tagged UTC.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::with_bounds(start, end, Bounds::Closed)
    }

    /// # Errors
    ///
    /// Returns [`Violation::StartAfterEnd`] when `start > end`.
    pub fn with_bounds(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        bounds: Bounds,
    ) -> Result<Self, ValidationError> {
        Self {
            start,
            end,
            bounds,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
        .checked()
    }

    /// Parse `"YYYY-MM-DD to YYYY-MM-DD"` as a closed range from the first
    /// day's midnight to the last millisecond of the second day, in UTC.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: String| {
            ValidationError::new(PrimitiveKind::DateRange, text, Violation::Format(reason))
        };
        let caps = RANGE_PATTERN
            .captures(text.trim())
            .ok_or_else(|| invalid("expected \"YYYY-MM-DD to YYYY-MM-DD\"".to_string()))?;
        let first = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d")
            .map_err(|e| invalid(format!("{}: {e}", &caps[1])))?;
        let last = NaiveDate::parse_from_str(&caps[2], "%Y-%m-%d")
            .map_err(|e| invalid(format!("{}: {e}", &caps[2])))?;
        let end = last
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| invalid("end of day is not representable".to_string()))?;
        Self::new(start_of_day(first), end)
    }

    /// `[midnight, next midnight)` of the day containing `now`.
    pub fn today(now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let date = now.date_naive();
        let next = date.succ_opt().ok_or_else(|| out_of_range(now))?;
        Self::with_bounds(start_of_day(date), start_of_day(next), Bounds::ClosedOpen)
    }

    /// The ISO week (Monday start) containing `now`, half-open.
    pub fn this_week(now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let date = now.date_naive();
        let offset = u64::from(date.weekday().num_days_from_monday());
        let monday = date
            .checked_sub_days(Days::new(offset))
            .ok_or_else(|| out_of_range(now))?;
        let next = monday
            .checked_add_days(Days::new(7))
            .ok_or_else(|| out_of_range(now))?;
        Self::with_bounds(start_of_day(monday), start_of_day(next), Bounds::ClosedOpen)
    }

    pub fn this_month(now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let date = now.date_naive();
        let first = date.with_day(1).ok_or_else(|| out_of_range(now))?;
        let next = first_of_next_month(first).ok_or_else(|| out_of_range(now))?;
        Self::with_bounds(start_of_day(first), start_of_day(next), Bounds::ClosedOpen)
    }

    pub fn this_year(now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let year = now.year();
        let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| out_of_range(now))?;
        let next = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(|| out_of_range(now))?;
        Self::with_bounds(start_of_day(first), start_of_day(next), Bounds::ClosedOpen)
    }

    /// `[now - days, now]`.
    pub fn last_days(now: DateTime<Utc>, days: u32) -> Result<Self, ValidationError> {
        let start = now
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| out_of_range(now))?;
        Self::new(start, now)
    }

    /// Same instants, different display tag.
    pub fn with_timezone(&self, timezone: impl Into<String>) -> Result<Self, ValidationError> {
        Self {
            timezone: timezone.into(),
            ..self.clone()
        }
        .checked()
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn includes_start(&self) -> bool {
        self.bounds.includes_start()
    }

    pub fn includes_end(&self) -> bool {
        self.bounds.includes_end()
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        match self.bounds {
            Bounds::Closed => self.start <= instant && instant <= self.end,
            Bounds::Open => self.start < instant && instant < self.end,
            Bounds::ClosedOpen => self.start <= instant && instant < self.end,
            Bounds::OpenClosed => self.start < instant && instant <= self.end,
        }
    }

    /// True when every instant of `other` is also in `self`.
    pub fn contains_range(&self, other: &DateRange) -> bool {
        let lower_ok = match self.start.cmp(&other.start) {
            Ordering::Less => true,
            Ordering::Equal => self.includes_start() || !other.includes_start(),
            Ordering::Greater => false,
        };
        let upper_ok = match self.end.cmp(&other.end) {
            Ordering::Greater => true,
            Ordering::Equal => self.includes_end() || !other.includes_end(),
            Ordering::Less => false,
        };
        lower_ok && upper_ok
    }

    /// Closed-interval overlap test.
    ///
    /// Both ranges are treated as closed here regardless of their bounds, so
    /// ranges that merely touch at an excluded endpoint still overlap. This is
    /// looser than [`DateRange::contains`].
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// The tightest range contained in both, or `None` if they share no instant.
    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        if !self.overlaps(other) {
            return None;
        }
        let (start, include_start) = match self.start.cmp(&other.start) {
            Ordering::Greater => (self.start, self.includes_start()),
            Ordering::Less => (other.start, other.includes_start()),
            Ordering::Equal => (self.start, self.includes_start() && other.includes_start()),
        };
        let (end, include_end) = match self.end.cmp(&other.end) {
            Ordering::Less => (self.end, self.includes_end()),
            Ordering::Greater => (other.end, other.includes_end()),
            Ordering::Equal => (self.end, self.includes_end() && other.includes_end()),
        };
        if start == end && !(include_start && include_end) {
            return None;
        }
        DateRange {
            start,
            end,
            bounds: Bounds::from_flags(include_start, include_end),
            timezone: self.timezone.clone(),
        }
        .checked()
        .ok()
    }

    /// The range spanning both.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::NotMergeable`] when the ranges neither overlap nor touch.
    pub fn union(&self, other: &DateRange) -> Result<DateRange, ValidationError> {
        if !self.overlaps(other) {
            return Err(ValidationError::new(
                PrimitiveKind::DateRange,
                other.canonical_string(),
                Violation::NotMergeable,
            ));
        }
        let (start, include_start) = match self.start.cmp(&other.start) {
            Ordering::Less => (self.start, self.includes_start()),
            Ordering::Greater => (other.start, other.includes_start()),
            Ordering::Equal => (self.start, self.includes_start() || other.includes_start()),
        };
        let (end, include_end) = match self.end.cmp(&other.end) {
            Ordering::Greater => (self.end, self.includes_end()),
            Ordering::Less => (other.end, other.includes_end()),
            Ordering::Equal => (self.end, self.includes_end() || other.includes_end()),
        };
        DateRange {
            start,
            end,
            bounds: Bounds::from_flags(include_start, include_end),
            timezone: self.timezone.clone(),
        }
        .checked()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whole days.
    pub fn days(&self) -> i64 {
        self.duration().num_days()
    }

    pub fn weeks(&self) -> i64 {
        self.days() / 7
    }

    /// Whole calendar months from start to end.
    pub fn months(&self) -> i64 {
        let (s, e) = (self.start, self.end);
        let mut months = i64::from(e.year() - s.year()) * 12 + i64::from(e.month())
            - i64::from(s.month());
        let short_of_anniversary = (e.day(), e.num_seconds_from_midnight(), e.nanosecond())
            < (s.day(), s.num_seconds_from_midnight(), s.nanosecond());
        if months > 0 && short_of_anniversary {
            months -= 1;
        }
        months
    }

    pub fn years(&self) -> i64 {
        self.months() / 12
    }

    /// Monday-to-Friday calendar dates the range touches.
    ///
    /// An exclusive end falling exactly on midnight does not touch that date.
    pub fn working_days(&self) -> u32 {
        let first = self.start.date_naive();
        let mut last = self.end.date_naive();
        let ends_at_midnight =
            self.end.num_seconds_from_midnight() == 0 && self.end.nanosecond() == 0;
        if ends_at_midnight && !self.includes_end() && last > first {
            last = last.pred_opt().unwrap_or(last);
        }
        let mut count = 0;
        let mut day = Some(first);
        while let Some(date) = day.filter(|d| *d <= last) {
            if date.weekday().num_days_from_monday() < 5 {
                count += 1;
            }
            day = date.succ_opt();
        }
        count
    }

    fn within(&self, period: Result<DateRange, ValidationError>) -> bool {
        period.is_ok_and(|p| p.contains_range(self))
    }

    pub fn is_today(&self, now: DateTime<Utc>) -> bool {
        self.within(Self::today(now))
    }

    pub fn is_this_week(&self, now: DateTime<Utc>) -> bool {
        self.within(Self::this_week(now))
    }

    pub fn is_this_month(&self, now: DateTime<Utc>) -> bool {
        self.within(Self::this_month(now))
    }

    pub fn is_this_year(&self, now: DateTime<Utc>) -> bool {
        self.within(Self::this_year(now))
    }

    /// The tightest calendar period around `now` that fully contains this range.
    pub fn period(&self, now: DateTime<Utc>) -> Period {
        if self.is_today(now) {
            Period::Today
        } else if self.is_this_week(now) {
            Period::ThisWeek
        } else if self.is_this_month(now) {
            Period::ThisMonth
        } else if self.is_this_year(now) {
            Period::ThisYear
        } else {
            Period::Other
        }
    }

    /// Entirely before `now`.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.end < now || (self.end == now && !self.includes_end())
    }

    /// Entirely after `now`.
    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.start > now || (self.start == now && !self.includes_start())
    }

    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.contains(now)
    }

    /// `"YYYY-MM-DD to YYYY-MM-DD"` using the UTC dates of each end.
    pub fn to_date_string(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl PartialEq for DateRange {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.bounds == other.bounds
    }
}

impl Eq for DateRange {}

impl Hash for DateRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.bounds.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeRepr {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub include_start: bool,
    pub include_end: bool,
    pub timezone: String,
}

impl ValueObject for DateRange {
    type Repr = DateRangeRepr;
    const KIND: PrimitiveKind = PrimitiveKind::DateRange;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.start > self.end {
            let start = self.start.to_rfc3339_opts(SecondsFormat::AutoSi, true);
            let end = self.end.to_rfc3339_opts(SecondsFormat::AutoSi, true);
            return Err(ValidationError::new(
                Self::KIND,
                format!("{start} to {end}"),
                Violation::StartAfterEnd { start, end },
            ));
        }
        if !TIMEZONE_PATTERN.is_match(&self.timezone) {
            return Err(ValidationError::new(
                Self::KIND,
                self.timezone.as_str(),
                Violation::InvalidTimezone(self.timezone.clone()),
            ));
        }
        Ok(())
    }

    fn canonical_string(&self) -> String {
        let open = if self.includes_start() { '[' } else { '(' };
        let close = if self.includes_end() { ']' } else { ')' };
        format!(
            "{open}{}, {}{close} {}",
            self.start.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.end.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.timezone
        )
    }

    fn to_repr(&self) -> DateRangeRepr {
        DateRangeRepr {
            start: self.start,
            end: self.end,
            include_start: self.includes_start(),
            include_end: self.includes_end(),
            timezone: self.timezone.clone(),
        }
    }

    fn from_repr(repr: DateRangeRepr) -> Result<Self, ValidationError> {
        Self {
            start: repr.start,
            end: repr.end,
            bounds: Bounds::from_flags(repr.include_start, repr.include_end),
            timezone: repr.timezone,
        }
        .checked()
    }
}

impl_value_object_serde!(DateRange);

impl FromStr for DateRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}
