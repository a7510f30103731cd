//! Weekly routine materialization -- turns a recurrence template into concrete
//! dated events.
//!
//! The walk starts at the template's start date and advances one day at a
//! time. A day produces an occurrence when its weekday is active and the date
//! is not excluded. The walk stops once `cap` occurrences exist or the cursor
//! passes the inclusive `until` date, whichever comes first. A template with no
//! weekday picked repeats on its start date's weekday.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlannerError, Result};
use crate::event::{Event, EventKind, GeoPoint};
use crate::time::{iso_weekday, ClockTime};

/// Default bound on occurrences generated from one template.
pub const DEFAULT_OCCURRENCE_CAP: usize = 120;

/// A set of ISO weekdays (Monday = 1 … Sunday = 7), stored as a bitmask.
///
/// Serialized as a sorted array of ISO weekday numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Build from ISO weekday numbers, rejecting anything outside `1..=7`.
    pub fn from_iso(days: &[u8]) -> Result<Self> {
        let mut set = Self::EMPTY;
        for &day in days {
            if !(1..=7).contains(&day) {
                return Err(PlannerError::InvalidWeekday(day));
            }
            set.0 |= 1 << (day - 1);
        }
        Ok(set)
    }

    /// The set holding only `date`'s weekday.
    pub fn single(date: NaiveDate) -> Self {
        WeekdaySet(1 << (iso_weekday(date) - 1))
    }

    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= 1 << weekday.num_days_from_monday();
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// ISO weekday numbers in ascending order.
    pub fn iso_numbers(&self) -> Vec<u8> {
        (1..=7u8).filter(|d| self.0 & (1 << (d - 1)) != 0).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.iso_numbers().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let days = Vec::<u8>::deserialize(deserializer)?;
        WeekdaySet::from_iso(&days).map_err(serde::de::Error::custom)
    }
}

/// The shape shared by every occurrence of a routine: everything but id and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTemplate {
    #[serde(default)]
    pub title: String,
    pub start: ClockTime,
    pub end: ClockTime,
    #[serde(rename = "type", default = "routine_kind")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn routine_kind() -> EventKind {
    EventKind::Routine
}

impl EventTemplate {
    pub fn new(title: impl Into<String>, start: ClockTime, end: ClockTime) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            kind: EventKind::Routine,
            color: None,
            symbol: None,
            location_name: None,
            location: None,
            note: None,
        }
    }

    /// A template whose end is `duration_minutes` after `start`, wrapping past
    /// midnight. Durations below one minute are raised to one.
    pub fn with_duration(title: impl Into<String>, start: ClockTime, duration_minutes: i64) -> Self {
        let end = start.add_minutes(duration_minutes.max(1));
        Self::new(title, start, end)
    }

    /// Stamp the template onto a date.
    fn instantiate(&self, id: String, date: NaiveDate, series_id: &str) -> Event {
        Event {
            id,
            title: self.title.clone(),
            date,
            start: self.start,
            end: self.end,
            kind: self.kind,
            color: self.color.clone(),
            symbol: self.symbol.clone(),
            series_id: Some(series_id.to_string()),
            location_name: self.location_name.clone(),
            location: self.location,
            note: self.note.clone(),
        }
    }
}

fn default_cap() -> usize {
    DEFAULT_OCCURRENCE_CAP
}

/// Input to [`materialize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceTemplate {
    /// Shared by every generated occurrence and used to derive their ids.
    pub series_id: String,
    pub base: EventTemplate,
    pub weekdays: WeekdaySet,
    pub start_date: NaiveDate,
    /// Inclusive last date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    #[serde(default)]
    pub exclusions: BTreeSet<NaiveDate>,
    /// Hard bound on the number of occurrences.
    #[serde(default = "default_cap")]
    pub cap: usize,
}

impl RecurrenceTemplate {
    pub fn new(
        series_id: impl Into<String>,
        base: EventTemplate,
        weekdays: WeekdaySet,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            series_id: series_id.into(),
            base,
            weekdays,
            start_date,
            until: None,
            exclusions: BTreeSet::new(),
            cap: DEFAULT_OCCURRENCE_CAP,
        }
    }

    pub fn until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    pub fn excluding(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.exclusions.extend(dates);
        self
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// The weekdays the walk matches: the picked set, or the start date's
    /// weekday when none is picked.
    pub fn active_weekdays(&self) -> WeekdaySet {
        if self.weekdays.is_empty() {
            WeekdaySet::single(self.start_date)
        } else {
            self.weekdays
        }
    }

    /// The same template restarted at `start_date`, as done when a routine is
    /// edited from a given day onward.
    pub fn starting(&self, start_date: NaiveDate) -> Self {
        Self {
            start_date,
            ..self.clone()
        }
    }
}

/// Deterministic id of the `index`-th occurrence of a series.
pub fn occurrence_id(series_id: &str, date: NaiveDate, index: usize) -> String {
    format!("{}-{}-{}", series_id, date.format("%Y-%m-%d"), index)
}

/// Expand a template into concrete events in date order.
///
/// A zero cap yields nothing. Excluded dates are skipped outright, never
/// shifted.
pub fn materialize(template: &RecurrenceTemplate) -> Vec<Event> {
    if template.cap == 0 {
        log::debug!("series {}: zero cap, nothing to materialize", template.series_id);
        return Vec::new();
    }

    let weekdays = template.active_weekdays();
    if template.weekdays.is_empty() {
        log::debug!(
            "series {}: no weekday picked, repeating on {:?}",
            template.series_id,
            weekdays.iso_numbers()
        );
    }

    let mut out = Vec::new();
    let mut cursor = template.start_date;

    while out.len() < template.cap {
        if template.until.is_some_and(|until| cursor > until) {
            break;
        }
        if weekdays.contains(cursor.weekday())
            && !template.exclusions.contains(&cursor)
        {
            let id = occurrence_id(&template.series_id, cursor, out.len());
            out.push(template.base.instantiate(id, cursor, &template.series_id));
        }
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    if out.len() == template.cap {
        log::debug!(
            "series {}: stopped at occurrence cap {} (last date {})",
            template.series_id,
            template.cap,
            cursor
        );
    }

    out
}
