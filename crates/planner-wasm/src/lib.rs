//! WASM bindings for planner-engine.
//!
//! Exposes day layout, conflict detection, change review, free gaps and routine
//! materialization to JavaScript via `wasm-bindgen`. All complex types are
//! passed as JSON strings: event lists are JSON arrays in the same shape the
//! app persists (`id`, `title`, `date`, `start`, `end`, `type`, `seriesId`, ...).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p planner-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/planner-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/planner_wasm.wasm
//! ```

use chrono::NaiveDate;
use planner_engine::{NewConflictPolicy, RecurrenceTemplate, Schedule};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

fn parse_events_json(json: &str) -> Result<Schedule, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    planner_engine::time::parse_date(s).map_err(|e| e.to_string())
}

fn parse_policy(any_pre_existing: bool) -> NewConflictPolicy {
    if any_pre_existing {
        NewConflictPolicy::AnyPreExisting
    } else {
        NewConflictPolicy::BothPreExisting
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// The `*_impl` functions hold the logic with plain `String` errors so they can
// be tested on the host; `JsValue` only exists on wasm32.

fn day_layout_impl(events_json: &str, date: &str) -> Result<String, String> {
    let schedule = parse_events_json(events_json)?;
    let date = parse_date(date)?;
    to_json(&planner_engine::day_view(schedule.events(), date))
}

fn find_conflicts_impl(events_json: &str, date: Option<String>) -> Result<String, String> {
    let schedule = parse_events_json(events_json)?;
    let conflicts = match date {
        Some(d) => planner_engine::find_day_conflicts(&schedule.events_on(parse_date(&d)?)),
        None => planner_engine::find_conflicts_by_day(schedule.events()),
    };
    to_json(&conflicts)
}

fn review_change_impl(
    current_json: &str,
    candidate_json: &str,
    any_pre_existing: bool,
) -> Result<String, String> {
    let current = parse_events_json(current_json)?;
    let candidate = parse_events_json(candidate_json)?;
    to_json(&current.review(&candidate, parse_policy(any_pre_existing)))
}

fn free_gaps_impl(events_json: &str, date: &str) -> Result<String, String> {
    let schedule = parse_events_json(events_json)?;
    let date = parse_date(date)?;
    to_json(&planner_engine::free_gaps(&schedule.events_on(date)))
}

fn materialize_impl(template_json: &str) -> Result<String, String> {
    let template: RecurrenceTemplate = serde_json::from_str(template_json)
        .map_err(|e| format!("Invalid template JSON: {}", e))?;
    to_json(&planner_engine::materialize(&template))
}

fn split_overnight_impl(event_json: &str) -> Result<String, String> {
    let event: planner_engine::Event =
        serde_json::from_str(event_json).map_err(|e| format!("Invalid event JSON: {}", e))?;
    to_json(&planner_engine::split_overnight(&event))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Lay out one day's events in lanes.
///
/// `events_json` is the full stored event list; overnight events are split and
/// only fragments on `date` (`YYYY-MM-DD`) are laid out. Returns a JSON array of
/// `{event, lane, lane_count}` objects.
#[wasm_bindgen(js_name = "dayLayout")]
pub fn day_layout(events_json: &str, date: &str) -> Result<String, JsValue> {
    day_layout_impl(events_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Find overlapping events, on one day when `date` is given, otherwise on
/// every day. Returns a JSON array of `{event_a, event_b, overlap_minutes}`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(events_json: &str, date: Option<String>) -> Result<String, JsValue> {
    find_conflicts_impl(events_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Conflicts the candidate event list introduces relative to the current one.
///
/// Overlaps the same two stored events already had are accepted;
/// `any_pre_existing` also accepts overlaps between a stored and a new event.
/// Returns `{new_conflicts: [...]}`.
#[wasm_bindgen(js_name = "reviewChange")]
pub fn review_change(
    current_json: &str,
    candidate_json: &str,
    any_pre_existing: bool,
) -> Result<String, JsValue> {
    review_change_impl(current_json, candidate_json, any_pre_existing)
        .map_err(|e| JsValue::from_str(&e))
}

/// Free gaps of one day as `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "freeGaps")]
pub fn free_gaps(events_json: &str, date: &str) -> Result<String, JsValue> {
    free_gaps_impl(events_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Expand a routine template into a JSON array of dated events.
#[wasm_bindgen(js_name = "materializeRoutine")]
pub fn materialize_routine(template_json: &str) -> Result<String, JsValue> {
    materialize_impl(template_json).map_err(|e| JsValue::from_str(&e))
}

/// Split a single event into its same-day fragments.
#[wasm_bindgen(js_name = "splitOvernight")]
pub fn split_overnight(event_json: &str) -> Result<String, JsValue> {
    split_overnight_impl(event_json).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: &str = r#"[
        {"id":"1","title":"a","date":"2026-03-02","start":"09:00","end":"10:00","type":"appointment"},
        {"id":"2","title":"b","date":"2026-03-02","start":"09:30","end":"11:00","type":"social"},
        {"id":"3","title":"c","date":"2026-03-02","start":"23:00","end":"00:30","type":"appointment"}
    ]"#;

    #[test]
    fn day_layout_returns_lanes() {
        let out: serde_json::Value =
            serde_json::from_str(&day_layout_impl(EVENTS, "2026-03-02").unwrap()).unwrap();
        assert_eq!(out[0]["lane_count"], 2);
        assert_eq!(out[1]["lane"], 1);
        assert_eq!(out[2]["event"]["end"], "24:00");
    }

    #[test]
    fn conflicts_for_all_days() {
        let out: serde_json::Value =
            serde_json::from_str(&find_conflicts_impl(EVENTS, None).unwrap()).unwrap();
        assert_eq!(out.as_array().unwrap().len(), 1);
        assert_eq!(out[0]["overlap_minutes"], 30);
    }

    #[test]
    fn free_gaps_on_spill_day() {
        let out: serde_json::Value =
            serde_json::from_str(&free_gaps_impl(EVENTS, "2026-03-03").unwrap()).unwrap();
        assert_eq!(out[0]["start"], "00:30");
        assert_eq!(out[0]["duration_minutes"], 1410);
    }

    #[test]
    fn review_flags_added_overlap() {
        let candidate = EVENTS.replacen(
            "[",
            r#"[{"id":"9","title":"z","date":"2026-03-02","start":"10:30","end":"10:45"},"#,
            1,
        );
        let out: serde_json::Value =
            serde_json::from_str(&review_change_impl(EVENTS, &candidate, false).unwrap()).unwrap();
        assert_eq!(out["new_conflicts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn materialize_from_json() {
        let template = r#"{"seriesId":"s","base":{"title":"t","start":"07:00","end":"08:00"},
            "weekdays":[1],"startDate":"2026-03-02","cap":2}"#;
        let out: serde_json::Value =
            serde_json::from_str(&materialize_impl(template).unwrap()).unwrap();
        assert_eq!(out[1]["id"], "s-2026-03-09-1");
    }

    #[test]
    fn split_overnight_from_json() {
        let event = r#"{"id":"n","date":"2026-03-02","start":"22:00","end":"02:00"}"#;
        let out: serde_json::Value =
            serde_json::from_str(&split_overnight_impl(event).unwrap()).unwrap();
        assert_eq!(out[1]["id"], "n:spill");
        assert_eq!(out[1]["date"], "2026-03-03");
    }

    #[test]
    fn invalid_input_is_reported() {
        assert!(day_layout_impl("nope", "2026-03-02")
            .unwrap_err()
            .starts_with("Invalid events JSON"));
        assert!(day_layout_impl("[]", "03/02/2026")
            .unwrap_err()
            .starts_with("Invalid date"));
    }
}
