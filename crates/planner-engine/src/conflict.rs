//! Detect overlapping events within a day.
//!
//! Events are swept in start order; the inner scan stops at the first later
//! event that starts at or after the current one's end, since nothing after it
//! can overlap either. Adjacent events (one ends exactly when another starts)
//! are NOT conflicts.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::overnight::normalize_events;

/// A detected conflict between two events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub event_a: Event,
    pub event_b: Event,
    pub overlap_minutes: i64,
}

/// How a candidate overlap involving one stored event and one new event is
/// treated when reviewing a change.
///
/// Overlaps that already existed between the same two stored events are
/// always accepted, and overlaps between two stored events that did not
/// collide before (an edit moved one of them) are always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewConflictPolicy {
    /// Report it. A freshly added event or routine occurrence that lands on a
    /// stored event warns.
    #[default]
    BothPreExisting,
    /// Accept it: only overlaps among new events, and new overlaps among
    /// stored events, are reported.
    AnyPreExisting,
}

/// Find all conflicting pairs among one day's (already normalized) events.
///
/// Pairs are reported in sweep order: `event_a` starts no later than `event_b`.
/// The caller must pass events of a single date; see [`find_conflicts_by_day`]
/// for mixed input.
pub fn find_day_conflicts(day_events: &[Event]) -> Vec<Conflict> {
    let mut sorted: Vec<&Event> = day_events.iter().collect();
    sorted.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut conflicts = Vec::new();
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            if b.start >= a.end {
                break;
            }
            let overlap_start = a.start.max(b.start);
            let overlap_end = a.end.min(b.end);
            if overlap_start < overlap_end {
                conflicts.push(Conflict {
                    event_a: (*a).clone(),
                    event_b: (*b).clone(),
                    overlap_minutes: overlap_start.minutes_until(overlap_end) as i64,
                });
            }
        }
    }

    conflicts
}

/// Normalize overnight events, group by date and detect conflicts per day.
///
/// Days are visited in ascending date order.
pub fn find_conflicts_by_day(events: &[Event]) -> Vec<Conflict> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for fragment in normalize_events(events) {
        by_date.entry(fragment.date).or_default().push(fragment);
    }

    by_date
        .values()
        .flat_map(|day| find_day_conflicts(day))
        .collect()
}

/// Unordered pair of stored-event ids behind a conflict.
fn origin_pair(conflict: &Conflict) -> (&str, &str) {
    let a = conflict.event_a.origin_id();
    let b = conflict.event_b.origin_id();
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Conflicts in `candidate` that the change from `original` introduces.
///
/// Both lists hold stored (un-normalized) events. A candidate conflict is
/// accepted when the same two stored events already overlapped in `original`;
/// fragments are matched back to their stored event through
/// [`Event::origin_id`]. Two stored events that overlap only after the change
/// are reported. `policy` decides the pairs made of one stored event and one
/// new event.
pub fn find_new_conflicts(
    candidate: &[Event],
    original: &[Event],
    policy: NewConflictPolicy,
) -> Vec<Conflict> {
    let existing: HashSet<&str> = original.iter().map(|e| e.id.as_str()).collect();
    let before = find_conflicts_by_day(original);
    let accepted: HashSet<(&str, &str)> = before.iter().map(origin_pair).collect();

    find_conflicts_by_day(candidate)
        .into_iter()
        .filter(|c| {
            if accepted.contains(&origin_pair(c)) {
                return false;
            }
            let a_known = existing.contains(c.event_a.origin_id());
            let b_known = existing.contains(c.event_b.origin_id());
            match policy {
                NewConflictPolicy::BothPreExisting => true,
                NewConflictPolicy::AnyPreExisting => a_known == b_known,
            }
        })
        .collect()
}
