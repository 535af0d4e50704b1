//! Core value types shared by the store, the resolver and the wizard
//!
//! Days and rooms are kept as verbatim strings (they come from the schedule
//! data); only time-of-day gets a dedicated type, because ordering and
//! formatting of `HH:MM` values matter for the interval test.

use chrono::{NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// Teaching days in the schedule, in week order.
///
/// Stored labels are matched byte-for-byte against these names; anything else
/// is still a valid day label but sorts after Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, EnumString, EnumIter)]
pub enum Weekday {
    Senin,
    Selasa,
    Rabu,
    Kamis,
    Jumat,
    Sabtu,
}

impl Weekday {
    /// Sort key for a stored day label: 1..=6 for known days, 7 otherwise.
    pub fn sort_key(label: &str) -> u8 {
        Weekday::from_str(label)
            .ok()
            .and_then(|day| Weekday::iter().position(|d| d == day))
            .map(|idx| idx as u8 + 1)
            .unwrap_or(7)
    }
}

/// Errors produced while parsing a time-of-day value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockTimeError {
    #[error("invalid time '{0}' (expected HH:MM)")]
    Invalid(String),
}

/// Wall-clock time of day with minute resolution.
///
/// Always formats as zero-padded `HH:MM`, so the string form sorts the same
/// way the time does. The occupation table relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build a time from hours and minutes, `None` if out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Convert a spreadsheet day fraction (0.5 == 12:00) to a time,
    /// rounding to the nearest minute.
    pub fn from_day_fraction(fraction: f64) -> Option<Self> {
        if !fraction.is_finite() || fraction < 0.0 {
            return None;
        }
        let total_minutes = (fraction * 24.0 * 60.0).round() as u32;
        Self::from_hm(total_minutes / 60, total_minutes % 60)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Shift by a number of minutes, wrapping around midnight.
    pub fn add_minutes(self, minutes: i64) -> Self {
        let (shifted, _) = self.0.overflowing_add_signed(TimeDelta::minutes(minutes));
        Self(shifted)
    }
}

impl Default for ClockTime {
    /// 08:00, the first teaching slot of the day
    fn default() -> Self {
        Self(NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN))
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    /// Accepts `HH:MM` and `HH:MM:SS`; seconds are dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .ok()
            .and_then(|t| Self::from_hm(t.hour(), t.minute()))
            .ok_or_else(|| ClockTimeError::Invalid(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

/// A selection slot that starts out as "not yet chosen".
///
/// The placeholder is a separate variant, so it can never collide with a real
/// day or room label, even one spelled like the placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Choice {
    #[default]
    Unselected,
    Chosen(String),
}

impl Choice {
    /// Text shown for the placeholder entry in option lists
    pub const PLACEHOLDER_LABEL: &'static str = "-- not selected --";

    pub fn chosen(value: impl Into<String>) -> Self {
        Self::Chosen(value.into())
    }

    /// Map a label coming from a front end back to a choice.
    ///
    /// The placeholder label maps to `Unselected`; every other label is taken
    /// verbatim.
    pub fn from_label(label: &str) -> Self {
        if label == Self::PLACEHOLDER_LABEL {
            Self::Unselected
        } else {
            Self::Chosen(label.to_string())
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::Chosen(value) => Some(value.as_str()),
        }
    }
}

impl From<Option<String>> for Choice {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unselected, Self::Chosen)
    }
}

impl From<Choice> for Option<String> {
    fn from(value: Choice) -> Self {
        match value {
            Choice::Unselected => None,
            Choice::Chosen(v) => Some(v),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unselected => f.write_str(Self::PLACEHOLDER_LABEL),
            Self::Chosen(value) => f.write_str(value),
        }
    }
}

/// One scheduled use of a room: the row shape of the `jadwal` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupationRecord {
    pub day: String,
    pub room: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub course_name: String,
}

impl OccupationRecord {
    /// Half-open containment: `start <= time < end`.
    ///
    /// A record with `start >= end` contains no time at all.
    pub fn contains(&self, time: ClockTime) -> bool {
        self.start_time <= time && time < self.end_time
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }
}
