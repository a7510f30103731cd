//! Compute the free gaps of a day's timeline.
//!
//! Sorts the day's events, merges overlapping or adjacent busy spans, then
//! returns the gaps between them within the `[00:00, 24:00)` track.

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::time::ClockTime;

/// A free span of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeGap {
    pub start: ClockTime,
    pub end: ClockTime,
    pub duration_minutes: i64,
}

/// Merge overlapping or adjacent busy spans.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals. Empty
/// spans are dropped.
fn merge_busy_spans(day_events: &[Event]) -> Vec<(ClockTime, ClockTime)> {
    let mut spans: Vec<(ClockTime, ClockTime)> = day_events
        .iter()
        .filter(|e| e.start < e.end)
        .map(|e| (e.start, e.end))
        .collect();
    spans.sort();

    let mut merged: Vec<(ClockTime, ClockTime)> = Vec::new();
    for (start, end) in spans {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

fn gap(start: ClockTime, end: ClockTime) -> FreeGap {
    FreeGap {
        start,
        end,
        duration_minutes: start.minutes_until(end) as i64,
    }
}

/// Free gaps of one day, given its normalized events.
pub fn free_gaps(day_events: &[Event]) -> Vec<FreeGap> {
    let mut gaps = Vec::new();
    let mut cursor = ClockTime::MIDNIGHT;

    for (busy_start, busy_end) in merge_busy_spans(day_events) {
        if cursor < busy_start {
            gaps.push(gap(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < ClockTime::END_OF_DAY {
        gaps.push(gap(cursor, ClockTime::END_OF_DAY));
    }

    gaps
}

/// The first gap lasting at least `min_duration_minutes`.
pub fn first_free_gap(day_events: &[Event], min_duration_minutes: i64) -> Option<FreeGap> {
    free_gaps(day_events)
        .into_iter()
        .find(|g| g.duration_minutes >= min_duration_minutes)
}
