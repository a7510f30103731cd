//! Time-of-day and calendar-date arithmetic.
//!
//! Internally every time of day is a [`ClockTime`], a minute offset from
//! midnight. The `"HH:MM"` string form only exists at the boundary: the
//! string helpers in this module (`hhmm_to_minutes`, `minutes_to_hhmm`,
//! `minutes_diff`, `add_minutes`) parse leniently and wrap out-of-range values
//! modulo one day instead of failing.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlannerError, Result};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time of day as minutes since midnight.
///
/// Valid values are `0..=1440`. The value `1440` (`"24:00"`) is never produced
/// by arithmetic; it only appears as the synthetic end of the first fragment of
/// a split overnight event, see [`crate::overnight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u16);

impl ClockTime {
    /// `00:00`.
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    /// `24:00`, the terminator of a day's track.
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY as u16);

    /// Build from any minute offset, wrapping modulo one day (`-10` is `23:50`).
    pub fn from_minutes(minutes: i64) -> Self {
        ClockTime(minutes.rem_euclid(MINUTES_PER_DAY) as u16)
    }

    /// Build from hour and minute, rejecting anything outside `00:00..=23:59`.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(ClockTime((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Minutes since midnight (`0..=1440`).
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// True for the synthetic `24:00` terminator.
    pub fn is_end_of_day(self) -> bool {
        self == Self::END_OF_DAY
    }

    /// Parse `"HH:MM"` leniently.
    ///
    /// Missing or non-numeric components count as zero, surrounding whitespace
    /// is ignored, and the total wraps modulo one day. An exact `"24:00"` is kept
    /// as [`ClockTime::END_OF_DAY`] so split fragments survive a round trip.
    pub fn parse_lenient(s: &str) -> Self {
        let mut parts = s.split(':').map(|p| p.trim().parse::<i64>().unwrap_or(0));
        let hours = parts.next().unwrap_or(0);
        let minutes = parts.next().unwrap_or(0);
        let total = hours.saturating_mul(60).saturating_add(minutes);
        if total == MINUTES_PER_DAY {
            Self::END_OF_DAY
        } else {
            Self::from_minutes(total)
        }
    }

    /// Add (or subtract) minutes, wrapping around midnight.
    pub fn add_minutes(self, minutes: i64) -> Self {
        Self::from_minutes(self.0 as i64 + minutes)
    }

    /// Minutes from `self` to `end`, clamped at zero.
    ///
    /// This does not understand overnight spans; normalize first.
    pub fn minutes_until(self, end: ClockTime) -> u16 {
        end.0.saturating_sub(self.0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Strict parser: exactly `HH:MM` with `HH < 24` and `MM < 60`, or `24:00`.
impl FromStr for ClockTime {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PlannerError::InvalidTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || m.len() != 2 || h.len() > 2 {
            return Err(invalid());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        if hour == 24 && minute == 0 {
            return Ok(Self::END_OF_DAY);
        }
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ClockTime::parse_lenient(&raw))
    }
}

// ---------------------------------------------------------------------------
// String helpers
// ---------------------------------------------------------------------------

/// `"HH:MM"` to minutes since midnight, parsed leniently.
pub fn hhmm_to_minutes(hhmm: &str) -> i64 {
    ClockTime::parse_lenient(hhmm).minutes() as i64
}

/// Minutes to `"HH:MM"`, wrapping modulo one day.
pub fn minutes_to_hhmm(minutes: i64) -> String {
    ClockTime::from_minutes(minutes).to_string()
}

/// Non-negative minute count from `start` to `end`; zero if `end` is earlier.
pub fn minutes_diff(start: &str, end: &str) -> i64 {
    ClockTime::parse_lenient(start).minutes_until(ClockTime::parse_lenient(end)) as i64
}

/// Add minutes to an `"HH:MM"` value, wrapping modulo one day.
pub fn add_minutes(hhmm: &str, minutes: i64) -> String {
    ClockTime::parse_lenient(hhmm).add_minutes(minutes).to_string()
}

// ---------------------------------------------------------------------------
// Calendar dates
// ---------------------------------------------------------------------------

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| PlannerError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Shift a date by `days`, returning `None` past chrono's representable range.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// ISO weekday number: Monday = 1 … Sunday = 7.
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// The Monday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as i64;
    add_days(date, -back).unwrap_or(date)
}
