//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct for date/time handling in
//! feeds and sitemaps, plus `DateInput`, the tagged union callers hand to
//! the feed for item publication dates.
//!
//! # Features
//!
//! - Zero external dependencies for date parsing
//! - ISO 8601 / RFC 3339 input with `Z` or numeric offsets
//! - RFC 2822 input (`Sat, 15 Jun 2024 14:30:45 GMT`)
//! - Unix timestamps (seconds)
//! - RFC 2822 and RFC 3339 formatting for feeds
//!
//! # Examples
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("2024-06-15").unwrap();
//! let dt = DateTimeUtc::parse("2024-06-15T14:30:45+02:00").unwrap();
//! assert_eq!(dt.to_rfc2822(), "Sat, 15 Jun 2024 12:30:45 GMT");
//! ```

use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, time::SystemTime};
use thiserror::Error;

const SECS_PER_DAY: i64 = 86_400;

const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Date normalization errors. Each variant names the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("unparseable date string `{0}`")]
    InvalidString(String),

    #[error("timestamp `{0}` is out of range")]
    InvalidTimestamp(i64),

    #[error("invalid date value: {0}")]
    InvalidValue(String),
}

// ============================================================================
// DateTimeUtc
// ============================================================================

/// UTC datetime without timezone complexity.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Current instant, truncated to whole seconds.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let secs = i64::try_from(secs).unwrap_or(0);
        Self::from_unix(secs).unwrap_or(Self::from_ymd(1970, 1, 1))
    }

    /// Build from seconds since the Unix epoch.
    ///
    /// Returns `None` outside years 1..=9999.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix(secs: i64) -> Option<Self> {
        let days = secs.div_euclid(SECS_PER_DAY);
        let rem = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        if !(1..=9999).contains(&year) {
            return None;
        }
        Some(Self::new(
            year as u16,
            month as u8,
            day as u8,
            (rem / 3600) as u8,
            (rem % 3600 / 60) as u8,
            (rem % 60) as u8,
        ))
    }

    /// Seconds since the Unix epoch.
    pub fn to_unix(self) -> i64 {
        let days = days_from_civil(
            i64::from(self.year),
            i64::from(self.month),
            i64::from(self.day),
        );
        days * SECS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Parse a date-like string.
    ///
    /// Accepted shapes:
    /// - `YYYY-MM-DD`
    /// - `YYYY-MM-DDTHH:MM:SS[.fff][Z|±HH:MM]` (a space may replace `T`;
    ///   a missing zone is read as UTC)
    /// - RFC 2822: `[Ddd, ]DD Mon YYYY HH:MM[:SS] (GMT|UT|UTC|Z|±HHMM)`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();
        if bytes.first().is_some_and(u8::is_ascii_digit) && bytes.get(4) == Some(&b'-') {
            Self::parse_iso(s)
        } else {
            Self::parse_rfc2822(s)
        }
    }

    fn parse_iso(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[7] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;

        if bytes.len() == 10 {
            let dt = Self::from_ymd(year, month, day);
            return dt.validate().ok().map(|()| dt);
        }

        // Time part: "THH:MM:SS"
        if bytes.len() < 19 || !matches!(bytes[10], b'T' | b't' | b' ') {
            return None;
        }
        if bytes[13] != b':' || bytes[16] != b':' {
            return None;
        }
        let hour = parse_u8(&bytes[11..13])?;
        let minute = parse_u8(&bytes[14..16])?;
        let second = parse_u8(&bytes[17..19])?;

        let mut rest = &s[19..];
        if let Some(frac) = rest.strip_prefix('.') {
            let digits = frac.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return None;
            }
            rest = &frac[digits..];
        }

        let offset = match rest {
            "" | "Z" | "z" => 0,
            zone => parse_offset(zone)?,
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        dt.shifted(-offset)
    }

    fn parse_rfc2822(s: &str) -> Option<Self> {
        // Optional weekday: "Sat, 15 Jun ..."
        let (weekday, s) = match s.split_once(',') {
            Some((weekday, rest)) if WEEKDAYS.contains(&weekday.trim()) => {
                (Some(weekday.trim()), rest)
            }
            Some(_) => return None,
            None => (None, s),
        };

        let mut parts = s.split_whitespace();
        let day: u8 = parse_digits(parts.next()?)?;
        let month_name = parts.next()?;
        let month = MONTHS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(month_name))?;
        let year: u16 = parse_digits(parts.next()?)?;

        let mut clock = parts.next()?.split(':');
        let hour: u8 = parse_digits(clock.next()?)?;
        let minute: u8 = parse_digits(clock.next()?)?;
        let second: u8 = match clock.next() {
            Some(sec) => parse_digits(sec)?,
            None => 0,
        };
        if clock.next().is_some() {
            return None;
        }

        let offset = match parts.next()? {
            "GMT" | "UT" | "UTC" | "Z" => 0,
            zone => parse_offset(zone)?,
        };
        if parts.next().is_some() {
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let dt = Self::new(year, month as u8 + 1, day, hour, minute, second);
        dt.validate().ok()?;
        // The weekday names the local date, before the zone shift
        if weekday.is_some_and(|name| name != WEEKDAYS[dt.weekday_index()]) {
            return None;
        }
        dt.shifted(-offset)
    }

    /// Move by `secs` seconds, staying within years 1..=9999.
    fn shifted(self, secs: i64) -> Option<Self> {
        if secs == 0 {
            return Some(self);
        }
        Self::from_unix(self.to_unix() + secs)
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    pub fn validate(&self) -> Result<(), DateError> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if year == 0 {
            return Err(DateError::InvalidValue(format!("year is invalid: {year}")));
        }
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidValue(format!("month is invalid: {month}")));
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            return Err(DateError::InvalidValue(format!("day is invalid: {day}")));
        }
        if hour > 23 {
            return Err(DateError::InvalidValue(format!("hour is invalid: {hour}")));
        }
        if minute > 59 {
            return Err(DateError::InvalidValue(format!("minute is invalid: {minute}")));
        }
        if second > 59 {
            return Err(DateError::InvalidValue(format!("second is invalid: {second}")));
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Format as RFC 3339 (ISO 8601) for Atom feeds and sitemaps.
    ///
    /// Returns: `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// Format as RFC 2822 for RSS feeds.
    ///
    /// Returns: `Ddd, DD Mon YYYY HH:MM:SS GMT`
    pub fn to_rfc2822(self) -> String {
        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[self.weekday_index()],
            self.day,
            MONTHS[(self.month - 1) as usize],
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    /// Zeller's congruence, 0 = Saturday.
    #[inline]
    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    #[allow(clippy::cast_sign_loss)] // Result of % 7 is always 0-6
    fn weekday_index(&self) -> usize {
        let (y, m) = if self.month < 3 {
            (i32::from(self.year) - 1, i32::from(self.month) + 12)
        } else {
            (i32::from(self.year), i32::from(self.month))
        };
        let d = i32::from(self.day);
        ((d + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400) % 7) as usize
    }
}

impl fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for DateTimeUtc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

// ============================================================================
// DateInput
// ============================================================================

/// A publication date as supplied by the caller.
///
/// Normalized into a `DateTimeUtc` when the item is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// Any shape accepted by [`DateTimeUtc::parse`].
    Text(String),
    /// An already-built date value.
    #[serde(skip_deserializing)]
    Value(DateTimeUtc),
}

impl DateInput {
    /// Normalize into a canonical UTC instant.
    pub fn normalize(&self) -> Result<DateTimeUtc, DateError> {
        match self {
            Self::Timestamp(secs) => {
                DateTimeUtc::from_unix(*secs).ok_or(DateError::InvalidTimestamp(*secs))
            }
            Self::Text(text) => {
                DateTimeUtc::parse(text).ok_or_else(|| DateError::InvalidString(text.clone()))
            }
            Self::Value(dt) => dt.validate().map(|()| *dt),
        }
    }
}

impl From<i64> for DateInput {
    fn from(secs: i64) -> Self {
        Self::Timestamp(secs)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<DateTimeUtc> for DateInput {
    fn from(dt: DateTimeUtc) -> Self {
        Self::Value(dt)
    }
}

// ============================================================================
// DateFormat
// ============================================================================

/// Wire format for standalone date strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `Sat, 15 Jun 2024 14:30:45 GMT`
    #[default]
    Rfc2822,
    /// `2024-06-15T14:30:45Z`
    Rfc3339,
}

impl DateFormat {
    pub fn format(self, dt: DateTimeUtc) -> String {
        match self {
            Self::Rfc2822 => dt.to_rfc2822(),
            Self::Rfc3339 => dt.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `-HHMM` into seconds east of UTC.
fn parse_offset(zone: &str) -> Option<i64> {
    let bytes = zone.as_bytes();
    let sign = match bytes.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let (hours, minutes) = match bytes.len() {
        6 if bytes[3] == b':' => (&bytes[1..3], &bytes[4..6]),
        5 => (&bytes[1..3], &bytes[3..5]),
        _ => return None,
    };
    let hours = parse_u8(hours)?;
    let minutes = parse_u8(minutes)?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (i64::from(hours) * 3600 + i64::from(minutes) * 60))
}

/// Parse 2-digit ASCII number
#[inline]
/// Parse a run of ASCII digits; signs and whitespace are rejected.
fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}
