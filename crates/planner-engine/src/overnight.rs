//! Split events that cross midnight into same-day fragments.
//!
//! Conflict detection, lane layout and free-time computation all assume each
//! event's `end >= start`. Run [`normalize_events`] over the stored list before
//! handing a day's events to them.

use crate::event::{Event, SPILL_SUFFIX};
use crate::time::{add_days, ClockTime};

/// Split one event into one or two fragments.
///
/// Events with `end >= start` come back unchanged as a single element.
/// Otherwise the first fragment keeps the id, date and start with its end
/// forced to `24:00`, and the second (`<id>:spill`) runs `00:00..end` on the
/// next day.
pub fn split_overnight(event: &Event) -> Vec<Event> {
    if !event.is_overnight() {
        return vec![event.clone()];
    }

    let Some(next_day) = add_days(event.date, 1) else {
        // No representable next day; keep the part that fits.
        log::warn!("overnight event {} at the end of the calendar range", event.id);
        return vec![Event {
            end: ClockTime::END_OF_DAY,
            ..event.clone()
        }];
    };

    let first = Event {
        end: ClockTime::END_OF_DAY,
        ..event.clone()
    };
    let spill = Event {
        id: format!("{}{}", event.id, SPILL_SUFFIX),
        date: next_day,
        start: ClockTime::MIDNIGHT,
        ..event.clone()
    };
    vec![first, spill]
}

/// Flat-map [`split_overnight`] over a list, preserving input order.
pub fn normalize_events(events: &[Event]) -> Vec<Event> {
    events.iter().flat_map(split_overnight).collect()
}
