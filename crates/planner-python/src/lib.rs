//! # planner-python
//!
//! Python bindings for the planner engine, built with PyO3.
//!
//! Exposes the following functions to Python as the `planner._native` module.
//! Event lists travel as JSON strings in the stored shape.
//!
//! - `day_layout(events_json, date)` -- lanes for one day
//! - `find_conflicts(events_json, date=None)` -- overlapping pairs
//! - `review_change(current_json, candidate_json, any_pre_existing=False)` -- new conflicts
//! - `free_gaps(events_json, date, min_minutes=0)` -- free time of one day
//! - `materialize_routine(template_json)` -- routine occurrences
//! - `split_overnight(event_json)` -- same-day fragments of one event

use chrono::NaiveDate;
use planner_engine::{Event, NewConflictPolicy, RecurrenceTemplate, Schedule};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_events(json: &str) -> PyResult<Schedule> {
    serde_json::from_str(json).map_err(|e| value_error(format!("Invalid events JSON: {}", e)))
}

fn parse_date(s: &str) -> PyResult<NaiveDate> {
    planner_engine::time::parse_date(s).map_err(value_error)
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(value_error)
}

/// Lay out one day's events in side-by-side lanes.
///
/// Args:
///     events_json: JSON array of stored events.
///     date: Day to lay out (`YYYY-MM-DD`).
///
/// Returns:
///     A JSON string: array of `{event, lane, lane_count}`.
///
/// Raises:
///     ValueError: If the events JSON or the date is invalid.
#[pyfunction]
fn day_layout(events_json: &str, date: &str) -> PyResult<String> {
    let schedule = parse_events(events_json)?;
    to_json(&planner_engine::day_view(schedule.events(), parse_date(date)?))
}

/// Find overlapping events on one day, or on every day when `date` is None.
///
/// Returns:
///     A JSON string: array of `{event_a, event_b, overlap_minutes}`.
#[pyfunction]
#[pyo3(signature = (events_json, date=None))]
fn find_conflicts(events_json: &str, date: Option<&str>) -> PyResult<String> {
    let schedule = parse_events(events_json)?;
    let conflicts = match date {
        Some(d) => planner_engine::find_day_conflicts(&schedule.events_on(parse_date(d)?)),
        None => planner_engine::find_conflicts_by_day(schedule.events()),
    };
    to_json(&conflicts)
}

/// Conflicts a candidate event list introduces relative to the current one.
///
/// Args:
///     current_json: The stored event list.
///     candidate_json: The event list about to be saved.
///     any_pre_existing: Accept overlaps between a stored event and a new one.
///         Default: False (they are reported). Overlaps two stored events
///         already had are always accepted.
///
/// Returns:
///     A JSON string: `{new_conflicts: [...]}`.
#[pyfunction]
#[pyo3(signature = (current_json, candidate_json, any_pre_existing=false))]
fn review_change(
    current_json: &str,
    candidate_json: &str,
    any_pre_existing: bool,
) -> PyResult<String> {
    let current = parse_events(current_json)?;
    let candidate = parse_events(candidate_json)?;
    let policy = if any_pre_existing {
        NewConflictPolicy::AnyPreExisting
    } else {
        NewConflictPolicy::BothPreExisting
    };
    to_json(&current.review(&candidate, policy))
}

/// Free gaps of one day at least `min_minutes` long.
#[pyfunction]
#[pyo3(signature = (events_json, date, min_minutes=0))]
fn free_gaps(events_json: &str, date: &str, min_minutes: i64) -> PyResult<String> {
    let schedule = parse_events(events_json)?;
    let gaps: Vec<_> = planner_engine::free_gaps(&schedule.events_on(parse_date(date)?))
        .into_iter()
        .filter(|g| g.duration_minutes >= min_minutes)
        .collect();
    to_json(&gaps)
}

/// Expand a routine template into dated occurrences.
///
/// Raises:
///     ValueError: If the template is malformed (e.g. a weekday outside 1..=7).
#[pyfunction]
fn materialize_routine(template_json: &str) -> PyResult<String> {
    let template: RecurrenceTemplate = serde_json::from_str(template_json)
        .map_err(|e| value_error(format!("Invalid template JSON: {}", e)))?;
    to_json(&planner_engine::materialize(&template))
}

/// Split one event into same-day fragments.
#[pyfunction]
fn split_overnight(event_json: &str) -> PyResult<String> {
    let event: Event = serde_json::from_str(event_json)
        .map_err(|e| value_error(format!("Invalid event JSON: {}", e)))?;
    to_json(&planner_engine::split_overnight(&event))
}

#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(day_layout, m)?)?;
    m.add_function(wrap_pyfunction!(find_conflicts, m)?)?;
    m.add_function(wrap_pyfunction!(review_change, m)?)?;
    m.add_function(wrap_pyfunction!(free_gaps, m)?)?;
    m.add_function(wrap_pyfunction!(materialize_routine, m)?)?;
    m.add_function(wrap_pyfunction!(split_overnight, m)?)?;
    Ok(())
}
