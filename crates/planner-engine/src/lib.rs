//! # planner-engine
//!
//! Scheduling and layout core of a personal day/week/month planner.
//!
//! The engine is a set of pure functions over plain [`Event`] records: it
//! expands weekly routines into dated occurrences, splits events that run past
//! midnight, reports overlapping events of a day, and assigns side-by-side
//! lanes so overlapping events can be drawn without collision. Nothing here
//! touches storage or UI.
//!
//! ## Modules
//!
//! - [`time`] -- `HH:MM` ⇄ minute-of-day, wraparound arithmetic, date helpers
//! - [`event`] -- The `Event` record
//! - [`overnight`] -- Split events that cross midnight
//! - [`conflict`] -- Detect overlapping events within a day
//! - [`layout`] -- Lane assignment for overlapping events
//! - [`routine`] -- Weekly routine template → concrete occurrences
//! - [`schedule`] -- Immutable event snapshot with functional updates
//! - [`freebusy`] -- Free gaps of a day's timeline
//! - [`calendar`] -- Day, week and month groupings
//! - [`config`] -- Shared tunables
//! - [`error`] -- Error types

pub mod calendar;
pub mod config;
pub mod conflict;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod layout;
pub mod overnight;
pub mod routine;
pub mod schedule;
pub mod time;

pub use calendar::{day_view, month_sections, week_of, DaySection};
pub use config::PlannerConfig;
pub use conflict::{
    find_conflicts_by_day, find_day_conflicts, find_new_conflicts, Conflict, NewConflictPolicy,
};
pub use error::PlannerError;
pub use event::{Event, EventKind};
pub use freebusy::{free_gaps, FreeGap};
pub use layout::{layout_lanes, LaidOutEvent};
pub use overnight::{normalize_events, split_overnight};
pub use routine::{materialize, EventTemplate, RecurrenceTemplate, WeekdaySet};
pub use schedule::{ChangeReview, Schedule};
pub use time::ClockTime;
