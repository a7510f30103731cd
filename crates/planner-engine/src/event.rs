//! The planner's single event record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::ClockTime;

/// Suffix appended to the id of the next-day fragment of an overnight event.
pub const SPILL_SUFFIX: &str = ":spill";

/// Category of an event. Only affects iconography, never scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// One-off appointment.
    #[default]
    #[serde(alias = "Termin", alias = "Appointment")]
    Appointment,
    /// Social event.
    #[serde(alias = "Event", alias = "Social")]
    Social,
    /// Occurrence of a weekly routine.
    #[serde(alias = "Routine")]
    Routine,
}

/// A geographic point attached to an event. Carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A scheduled event on one calendar day.
///
/// `end < start` means the event runs past midnight into the next day; see
/// [`crate::overnight::split_overnight`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Event {
    /// A bare event with no display tags.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date,
            start,
            end,
            kind: EventKind::default(),
            color: None,
            symbol: None,
            series_id: None,
            location_name: None,
            location: None,
            note: None,
        }
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_series(mut self, series_id: impl Into<String>) -> Self {
        self.series_id = Some(series_id.into());
        self
    }

    /// True when the event ends on the following day.
    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Length in minutes, clamped at zero for un-normalized overnight events.
    pub fn duration_minutes(&self) -> i64 {
        self.start.minutes_until(self.end) as i64
    }

    /// The id of the stored event this one was derived from.
    ///
    /// Strips the spill suffix of a next-day fragment; other ids are returned
    /// as-is.
    pub fn origin_id(&self) -> &str {
        self.id.strip_suffix(SPILL_SUFFIX).unwrap_or(&self.id)
    }

    /// Whether `[start, end)` of both events intersect on the same date.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}
