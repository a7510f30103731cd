//! Day, week and month groupings over the stored event list.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::layout::{layout_lanes, LaidOutEvent};
use crate::overnight::normalize_events;
use crate::time::{add_days, start_of_week};

/// Events of one date, sorted by start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySection {
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

/// The seven dates of `date`'s week, Monday first.
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = start_of_week(date);
    std::array::from_fn(|i| add_days(monday, i as i64).unwrap_or(monday))
}

/// Normalized fragments on `date`, laid out in lanes.
pub fn day_view(events: &[Event], date: NaiveDate) -> Vec<LaidOutEvent> {
    let day: Vec<Event> = normalize_events(events)
        .into_iter()
        .filter(|e| e.date == date)
        .collect();
    layout_lanes(&day)
}

/// Stored events of each day of `date`'s week, sorted by start.
///
/// Events are grouped by their stored date; overnight events are not split.
pub fn week_sections(events: &[Event], date: NaiveDate) -> Vec<DaySection> {
    week_of(date)
        .into_iter()
        .map(|day| {
            let mut list: Vec<Event> = events.iter().filter(|e| e.date == day).cloned().collect();
            list.sort_by(|a, b| a.start.cmp(&b.start));
            DaySection {
                date: day,
                events: list,
            }
        })
        .collect()
}

/// Stored events in the month of `month_ref`, grouped by date.
///
/// Sections are in date order and only days with events appear.
pub fn month_sections(events: &[Event], month_ref: NaiveDate) -> Vec<DaySection> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| e.date.year() == month_ref.year() && e.date.month() == month_ref.month())
    {
        by_date.entry(event.date).or_default().push(event.clone());
    }

    by_date
        .into_iter()
        .map(|(date, mut events)| {
            events.sort_by(|a, b| a.start.cmp(&b.start));
            DaySection { date, events }
        })
        .collect()
}

/// Dot colours per date for a month calendar widget.
///
/// Events without a colour use `default_color`.
pub fn date_marks(events: &[Event], default_color: &str) -> BTreeMap<NaiveDate, Vec<String>> {
    let mut marks: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for event in events {
        let color = event.color.as_deref().unwrap_or(default_color);
        marks.entry(event.date).or_default().push(color.to_string());
    }
    marks
}
