//! Tests for day, week and month groupings.

use chrono::{Datelike, NaiveDate, Weekday};
use planner_engine::calendar::{date_marks, week_sections};
use planner_engine::config::DEFAULT_MARK_COLOR;
use planner_engine::{day_view, month_sections, week_of, ClockTime, Event};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn event(id: &str, on: NaiveDate, start: &str, end: &str) -> Event {
    Event::new(
        id,
        id,
        on,
        ClockTime::parse_lenient(start),
        ClockTime::parse_lenient(end),
    )
}

#[test]
fn week_starts_on_monday() {
    let week = week_of(date(2026, 3, 5));

    assert_eq!(week[0], date(2026, 3, 2));
    assert_eq!(week[0].weekday(), Weekday::Mon);
    assert_eq!(week[6], date(2026, 3, 8));
}

#[test]
fn week_of_sunday_looks_back() {
    let week = week_of(date(2026, 3, 8));
    assert_eq!(week[0], date(2026, 3, 2));
}

#[test]
fn week_crosses_month_boundary() {
    let week = week_of(date(2026, 4, 1));
    assert_eq!(week[0], date(2026, 3, 30));
    assert_eq!(week[6], date(2026, 4, 5));
}

#[test]
fn day_view_lays_out_spill_fragments() {
    let events = vec![
        event("night", date(2026, 3, 2), "22:30", "01:00"),
        event("early", date(2026, 3, 3), "00:30", "02:00"),
        event("other", date(2026, 3, 4), "00:30", "02:00"),
    ];

    let view = day_view(&events, date(2026, 3, 3));

    let got: Vec<(&str, usize, usize)> = view
        .iter()
        .map(|l| (l.event.id.as_str(), l.lane, l.lane_count))
        .collect();
    assert_eq!(got, vec![("night:spill", 0, 2), ("early", 1, 2)]);
}

#[test]
fn week_sections_hold_each_day_sorted() {
    let events = vec![
        event("b", date(2026, 3, 3), "12:00", "13:00"),
        event("a", date(2026, 3, 3), "08:00", "09:00"),
        event("z", date(2026, 3, 10), "08:00", "09:00"),
    ];

    let sections = week_sections(&events, date(2026, 3, 4));

    assert_eq!(sections.len(), 7);
    assert!(sections[0].events.is_empty());
    let ids: Vec<&str> = sections[1].events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(sections.iter().all(|s| s.events.iter().all(|e| e.id != "z")));
}

#[test]
fn month_sections_group_by_date_within_month() {
    let events = vec![
        event("late", date(2026, 3, 20), "18:00", "19:00"),
        event("feb", date(2026, 2, 28), "09:00", "10:00"),
        event("early2", date(2026, 3, 2), "09:00", "10:00"),
        event("early1", date(2026, 3, 2), "07:00", "08:00"),
        event("next-year", date(2027, 3, 2), "07:00", "08:00"),
    ];

    let sections = month_sections(&events, date(2026, 3, 15));

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].date, date(2026, 3, 2));
    let first_ids: Vec<&str> = sections[0].events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(first_ids, vec!["early1", "early2"]);
    assert_eq!(sections[1].date, date(2026, 3, 20));
}

#[test]
fn marks_collect_colors_per_date() {
    let events = vec![
        event("a", date(2026, 3, 2), "09:00", "10:00").with_color("#7aa874"),
        event("b", date(2026, 3, 2), "11:00", "12:00"),
        event("c", date(2026, 3, 5), "09:00", "10:00").with_color("#c4e3c0"),
    ];

    let marks = date_marks(&events, DEFAULT_MARK_COLOR);

    assert_eq!(marks.len(), 2);
    assert_eq!(
        marks[&date(2026, 3, 2)],
        vec!["#7aa874".to_string(), DEFAULT_MARK_COLOR.to_string()]
    );
    assert_eq!(marks[&date(2026, 3, 5)], vec!["#c4e3c0".to_string()]);
}
