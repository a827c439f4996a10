//! Timestamp kind and the ordered layouts it is decoded from.
//!
//! Decoding tries [`Layout::ALL`] front to back and keeps the first layout
//! that parses. Encoding always writes RFC 3339, so the layout an input came
//! in does not survive a round trip; only the instant and its offset do.

use std::fmt;
use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// A point in time with nanosecond precision and an explicit UTC offset.
///
/// Equality and ordering compare instants, so `14:48:00+02:00` equals
/// `12:48:00Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    #[must_use]
    pub const fn new(datetime: DateTime<FixedOffset>) -> Self {
        Self(datetime)
    }

    /// The Unix epoch at UTC.
    #[must_use]
    pub fn zero() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Parse `text` against the accepted layouts, first match wins.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Layout::detect(text).map(|(_, timestamp)| timestamp)
    }

    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    #[must_use]
    pub const fn into_inner(self) -> DateTime<FixedOffset> {
        self.0
    }

    /// RFC 3339 with nanosecond precision and trailing fraction zeros
    /// dropped, `Z` for UTC. A whole second has no fraction at all.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        let text = self.0.to_rfc3339_opts(SecondsFormat::Nanos, true);
        let Some(dot) = text.find('.') else {
            return text;
        };
        let digits_end = text[dot + 1..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(text.len(), |offset| dot + 1 + offset);
        let fraction = text[dot + 1..digits_end].trim_end_matches('0');
        if fraction.is_empty() {
            format!("{}{}", &text[..dot], &text[digits_end..])
        } else {
            format!("{}.{fraction}{}", &text[..dot], &text[digits_end..])
        }
    }

    /// Render with a strftime-style pattern. An invalid pattern yields an
    /// empty string.
    #[must_use]
    pub fn format(&self, pattern: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.0.format(pattern)).is_err() {
            tracing::debug!(pattern, "invalid timestamp format pattern");
            out.clear();
        }
        out
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self(datetime)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime.fixed_offset())
    }
}

impl From<Timestamp> for DateTime<FixedOffset> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

/// A textual timestamp pattern accepted on input.
///
/// Every layout accepts an optional fractional-seconds part of any precision
/// right after the seconds field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// `2023-10-05T14:48:00Z`, `2023-10-05T14:48:00.5+02:00`
    Rfc3339,
    /// `2023-10-05T14:48:00 UTC`
    NamedZone,
    /// `2023-10-05 14:48:00`, read as UTC
    SpaceSeparated,
    /// `2023-10-05T14:48:00`, read as UTC
    Naive,
}

impl Layout {
    /// Decode priority. Order matters: the first layout that parses wins.
    pub const ALL: [Layout; 4] = [
        Layout::Rfc3339,
        Layout::NamedZone,
        Layout::SpaceSeparated,
        Layout::Naive,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rfc3339 => "rfc3339",
            Self::NamedZone => "named-zone",
            Self::SpaceSeparated => "space-separated",
            Self::Naive => "naive",
        }
    }

    /// Find the first layout in [`Layout::ALL`] that parses `text`.
    #[must_use]
    pub fn detect(text: &str) -> Option<(Layout, Timestamp)> {
        Self::ALL.into_iter().find_map(|layout| {
            let timestamp = layout.parse(text)?;
            tracing::trace!(layout = layout.name(), input = text, "timestamp layout matched");
            Some((layout, timestamp))
        })
    }

    /// Parse `text` with this layout only.
    #[must_use]
    pub fn parse(self, text: &str) -> Option<Timestamp> {
        let datetime = match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(text).ok()?,
            Self::NamedZone => {
                let (stamp, zone) = text.rsplit_once(' ')?;
                if !is_zone_abbreviation(zone) {
                    return None;
                }
                date_and_time(stamp, 'T')?.and_utc().fixed_offset()
            }
            Self::SpaceSeparated => date_and_time(text, ' ')?.and_utc().fixed_offset(),
            Self::Naive => date_and_time(text, 'T')?.and_utc().fixed_offset(),
        };
        Some(Timestamp(datetime))
    }
}

/// `YYYY-MM-DD`, `separator`, `hh:mm:ss[.fraction]` with nothing around it.
fn date_and_time(text: &str, separator: char) -> Option<NaiveDateTime> {
    let date = text.get(..10)?;
    let time = text.get(10..)?.strip_prefix(separator)?;
    if time.starts_with(char::is_whitespace) || time.ends_with(char::is_whitespace) {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f").ok()?;
    Some(date.and_time(time))
}

/// `Z`, or three to five upper-case letters such as `UTC` or `CEST`.
///
/// The zone is not resolved against a database: every abbreviation is taken
/// at zero offset.
fn is_zone_abbreviation(zone: &str) -> bool {
    if zone == "Z" {
        return true;
    }
    let valid = (3..=5).contains(&zone.len()) && zone.bytes().all(|b| b.is_ascii_uppercase());
    if valid && !matches!(zone, "UTC" | "GMT") {
        tracing::debug!(zone, "zone abbreviation recorded at zero offset");
    }
    valid
}
