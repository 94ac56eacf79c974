//! Time-of-day handling for class sessions.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Minutes in a day; valid clock times are strictly below this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day stored as minutes since midnight, always in `[0, 1440)`.
///
/// Serializes as a 24-hour `"HH:MM"` string.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a time from minutes since midnight, or `None` if out of range.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Creates a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Parses a 24-hour `"HH:MM"` string, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Self::from)
            .map_err(|_| ValidationError::MalformedTime {
                value: trimmed.to_string(),
            })
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Adds minutes, returning `None` past the end of the day.
    pub fn checked_add(self, minutes: u16) -> Option<Self> {
        self.0.checked_add(minutes).and_then(Self::from_minutes)
    }

    /// Formats as a 12-hour clock, e.g. `"9:05 AM"` or `"12:00 PM"`.
    pub fn to_12h(self) -> String {
        self.as_naive().format("%-I:%M %p").to_string()
    }

    fn as_naive(self) -> NaiveTime {
        // Always in range by construction.
        NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or_default()
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// Builds the selectable times from `first` through `last` inclusive, every
/// `step_minutes` minutes.
pub fn time_options(first: ClockTime, last: ClockTime, step_minutes: u16) -> Vec<ClockTime> {
    if step_minutes == 0 {
        return vec![first];
    }

    let mut options = Vec::new();
    let mut current = Some(first);
    while let Some(time) = current {
        if time > last {
            break;
        }
        options.push(time);
        current = time.checked_add(step_minutes);
    }
    options
}
