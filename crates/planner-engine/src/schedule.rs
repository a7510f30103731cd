//! An immutable snapshot of the stored event list.
//!
//! Every "mutating" method returns a new [`Schedule`]; the receiver is left
//! untouched, so an editor can build a candidate snapshot, [`review`] it
//! against the current one, and only then swap it in.
//!
//! [`review`]: Schedule::review

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conflict::{find_new_conflicts, Conflict, NewConflictPolicy};
use crate::event::Event;
use crate::overnight::split_overnight;
use crate::routine::{materialize, RecurrenceTemplate};

/// The full stored event list. Serializes as a plain JSON array of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    events: Vec<Event>,
}

/// Outcome of comparing a candidate snapshot against the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReview {
    /// Overlaps the candidate introduces. Advisory: the caller decides whether
    /// to save anyway.
    pub new_conflicts: Vec<Conflict>,
}

impl ChangeReview {
    pub fn is_clean(&self) -> bool {
        self.new_conflicts.is_empty()
    }
}

impl Schedule {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Insert `event`, replacing any stored event with the same id in place.
    pub fn with_event(&self, event: Event) -> Self {
        let mut events = self.events.clone();
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => *slot = event,
            None => events.push(event),
        }
        Self { events }
    }

    pub fn without_event(&self, id: &str) -> Self {
        self.retain(|e| e.id != id)
    }

    /// Drop every occurrence of a series.
    pub fn without_series(&self, series_id: &str) -> Self {
        self.retain(|e| e.series_id.as_deref() != Some(series_id))
    }

    /// Append a freshly materialized run of `template`.
    pub fn with_routine(&self, template: &RecurrenceTemplate) -> Self {
        let mut events = self.events.clone();
        events.extend(materialize(template));
        Self { events }
    }

    /// Replace the whole series of `template.series_id` with a fresh run.
    pub fn replace_series(&self, template: &RecurrenceTemplate) -> Self {
        self.without_series(&template.series_id)
            .with_routine(template)
    }

    /// Re-materialize a series from `from` onward after its template changed.
    ///
    /// Occurrences dated before `from` are kept; later ones are discarded and
    /// a fresh run starting at `from` is spliced in.
    pub fn rematerialize_series(&self, template: &RecurrenceTemplate, from: NaiveDate) -> Self {
        let sid = template.series_id.as_str();
        let kept = self.retain(|e| e.series_id.as_deref() != Some(sid) || e.date < from);
        let fresh = materialize(&template.starting(from));
        log::debug!(
            "series {}: re-materialized {} occurrences from {}",
            sid,
            fresh.len(),
            from
        );
        let mut events = kept.events;
        events.extend(fresh);
        Self { events }
    }

    /// Copy display details onto every occurrence of a series dated `from` or
    /// later. `color` and `symbol` are set as given, so `None` clears them.
    pub fn with_series_details(
        &self,
        series_id: &str,
        from: NaiveDate,
        title: &str,
        color: Option<&str>,
        symbol: Option<&str>,
    ) -> Self {
        let events = self
            .events
            .iter()
            .map(|e| {
                if e.series_id.as_deref() == Some(series_id) && e.date >= from {
                    Event {
                        title: title.to_string(),
                        color: color.map(str::to_string),
                        symbol: symbol.map(str::to_string),
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            })
            .collect();
        Self { events }
    }

    /// Occurrences of one series in date order.
    pub fn series(&self, series_id: &str) -> Vec<&Event> {
        let mut out: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.series_id.as_deref() == Some(series_id))
            .collect();
        out.sort_by(|a, b| a.date.cmp(&b.date).then(a.start.cmp(&b.start)));
        out
    }

    /// Normalized fragments visible on `date`, sorted by start.
    pub fn events_on(&self, date: NaiveDate) -> Vec<Event> {
        let mut day: Vec<Event> = self
            .events
            .iter()
            .flat_map(split_overnight)
            .filter(|e| e.date == date)
            .collect();
        day.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
        day
    }

    /// Conflicts `candidate` would introduce relative to this snapshot.
    pub fn review(&self, candidate: &Schedule, policy: NewConflictPolicy) -> ChangeReview {
        ChangeReview {
            new_conflicts: find_new_conflicts(&candidate.events, &self.events, policy),
        }
    }

    fn retain(&self, keep: impl Fn(&Event) -> bool) -> Self {
        Self {
            events: self.events.iter().filter(|e| keep(e)).cloned().collect(),
        }
    }
}

impl From<Vec<Event>> for Schedule {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}
