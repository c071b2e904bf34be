use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::core::ValidationError;

const STORAGE_FORMAT: &str = "%d-%m-%Y %H:%M";
const INPUT_FORMATS: [&str; 5] = [
    STORAGE_FORMAT,
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];
const DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%Y-%m-%d"];

/// Wall-clock date and time of day, without a time zone, with minute precision.
///
/// Comparison is plain calendar ordering: nothing is ever converted through an epoch,
/// so a work order opened at 08:00 is at 08:00 regardless of daylight saving changes.
#[must_use]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct LocalTimestamp(NaiveDateTime);

impl LocalTimestamp {
    /// Build the timestamp from the calendar fields.
    pub fn from_fields(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|time| Self(date.and_time(time)))
    }

    /// Start of the given hour of the date.
    pub fn at_hour(date: NaiveDate, hour: u32) -> Option<Self> {
        Self::from_fields(date, hour, 0)
    }

    #[must_use]
    pub fn since(self, earlier: Self) -> TimeDelta {
        self.0 - earlier.0
    }
}

impl From<NaiveDateTime> for LocalTimestamp {
    /// Truncate to the minute.
    fn from(timestamp: NaiveDateTime) -> Self {
        Self(timestamp.with_second(0).and_then(|it| it.with_nanosecond(0)).unwrap_or(timestamp))
    }
}

impl From<LocalTimestamp> for NaiveDateTime {
    fn from(timestamp: LocalTimestamp) -> Self {
        timestamp.0
    }
}

impl FromStr for LocalTimestamp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(Self::from)
            .ok_or_else(|| ValidationError::MalformedTimestamp(s.to_string()))
    }
}

impl Display for LocalTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(STORAGE_FORMAT))
    }
}

impl Debug for LocalTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Parse an analysis date in either the day-first or the ISO format.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| ValidationError::MalformedDate(s.to_string()))
}
