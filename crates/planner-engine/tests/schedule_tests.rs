//! Tests for schedule snapshots and the pre-save review.

use chrono::NaiveDate;
use planner_engine::{
    ClockTime, Event, EventTemplate, NewConflictPolicy, RecurrenceTemplate, Schedule, WeekdaySet,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn event(id: &str, d: u32, start: &str, end: &str) -> Event {
    Event::new(
        id,
        id,
        date(d),
        ClockTime::parse_lenient(start),
        ClockTime::parse_lenient(end),
    )
}

fn routine(start: &str, end: &str) -> RecurrenceTemplate {
    RecurrenceTemplate::new(
        "series_focus",
        EventTemplate::new(
            "Focus",
            ClockTime::parse_lenient(start),
            ClockTime::parse_lenient(end),
        ),
        WeekdaySet::from_iso(&[1, 3]).unwrap(),
        date(2),
    )
    .until(date(18))
}

fn seed() -> Schedule {
    Schedule::new(vec![
        event("1", 2, "09:00", "11:00"),
        event("2", 2, "13:00", "14:00"),
        event("4", 2, "22:30", "01:00"),
    ])
}

#[test]
fn updates_return_new_snapshots() {
    let before = seed();

    let after = before.with_event(event("5", 3, "08:00", "09:00"));

    assert_eq!(before.len(), 3);
    assert_eq!(after.len(), 4);
}

#[test]
fn with_event_replaces_same_id_in_place() {
    let edited = seed().with_event(event("2", 2, "15:00", "16:00"));

    assert_eq!(edited.len(), 3);
    assert_eq!(edited.events()[1].id, "2");
    assert_eq!(edited.get("2").unwrap().start.to_string(), "15:00");
}

#[test]
fn without_event_removes_only_that_id() {
    let s = seed().without_event("1");
    assert_eq!(s.len(), 2);
    assert!(s.get("1").is_none());
    assert_eq!(seed().without_event("missing"), seed());
}

#[test]
fn routine_occurrences_are_added_and_removed_as_a_series() {
    let s = seed().with_routine(&routine("07:00", "08:00"));

    // Mon/Wed from the 2nd to the 18th: 2, 4, 9, 11, 16, 18.
    assert_eq!(s.series("series_focus").len(), 6);
    assert_eq!(s.len(), 9);

    let cleared = s.without_series("series_focus");
    assert_eq!(cleared, seed());
}

#[test]
fn replace_series_discards_old_run() {
    let s = seed()
        .with_routine(&routine("07:00", "08:00"))
        .replace_series(&routine("06:00", "06:30"));

    let run = s.series("series_focus");
    assert_eq!(run.len(), 6);
    assert!(run.iter().all(|e| e.start.to_string() == "06:00"));
}

#[test]
fn rematerialize_keeps_past_occurrences() {
    let s = seed().with_routine(&routine("07:00", "08:00"));

    let edited = s.rematerialize_series(&routine("18:00", "19:00"), date(10));

    let run = edited.series("series_focus");
    let starts: Vec<(NaiveDate, String)> = run
        .iter()
        .map(|e| (e.date, e.start.to_string()))
        .collect();
    assert_eq!(
        starts,
        vec![
            (date(2), "07:00".to_string()),
            (date(4), "07:00".to_string()),
            (date(11), "18:00".to_string()),
            (date(16), "18:00".to_string()),
            (date(18), "18:00".to_string()),
        ]
    );
}

#[test]
fn events_on_includes_spill_fragments_sorted() {
    let s = seed().with_event(event("6", 3, "07:00", "08:00"));

    let day2: Vec<String> = s.events_on(date(2)).into_iter().map(|e| e.id).collect();
    let day3: Vec<String> = s.events_on(date(3)).into_iter().map(|e| e.id).collect();

    assert_eq!(day2, vec!["1", "2", "4"]);
    assert_eq!(day3, vec!["4:spill", "6"]);
}

#[test]
fn review_flags_routine_colliding_with_existing_event() {
    let current = seed();
    // 10:00-10:30 on Mon/Wed hits event 1 (09:00-11:00) on Monday the 2nd.
    let candidate = current.with_routine(&routine("10:00", "10:30"));

    let review = current.review(&candidate, NewConflictPolicy::BothPreExisting);

    assert!(!review.is_clean());
    assert_eq!(review.new_conflicts.len(), 1);
    assert_eq!(review.new_conflicts[0].event_a.id, "1");
    assert_eq!(
        review.new_conflicts[0].event_b.id,
        "series_focus-2026-03-02-0"
    );
}

#[test]
fn review_of_rematerialized_series_accepts_stable_ids() {
    // Deterministic ids mean re-saving an unchanged routine reports nothing new,
    // even under the strict policy.
    let current = seed().with_routine(&routine("10:00", "10:30"));
    let candidate = current.replace_series(&routine("10:00", "10:30"));

    let review = current.review(&candidate, NewConflictPolicy::BothPreExisting);

    assert!(review.is_clean());
}

#[test]
fn review_flags_routine_time_edited_onto_existing_event() {
    let focus = |start: &str, end: &str| {
        RecurrenceTemplate::new(
            "focus",
            EventTemplate::new(
                "Focus",
                ClockTime::parse_lenient(start),
                ClockTime::parse_lenient(end),
            ),
            WeekdaySet::from_iso(&[1]).unwrap(),
            date(2),
        )
        .with_cap(2)
    };
    let current =
        Schedule::new(vec![event("1", 2, "09:00", "11:00")]).with_routine(&focus("07:00", "07:30"));

    // Same series, same occurrence ids, new time inside meeting 1.
    let candidate = current.replace_series(&focus("09:30", "10:00"));

    for policy in [NewConflictPolicy::BothPreExisting, NewConflictPolicy::AnyPreExisting] {
        let review = current.review(&candidate, policy);
        assert_eq!(review.new_conflicts.len(), 1, "{:?}", policy);
        assert_eq!(review.new_conflicts[0].event_a.id, "1");
        assert_eq!(review.new_conflicts[0].event_b.id, "focus-2026-03-02-0");
    }
}

#[test]
fn any_policy_accepts_new_routine_on_stored_event() {
    let current = seed();
    let candidate = current.with_routine(&routine("10:00", "10:30"));

    assert!(current
        .review(&candidate, NewConflictPolicy::AnyPreExisting)
        .is_clean());
}

#[test]
fn series_details_update_from_date_onward() {
    let s = seed().with_routine(&routine("07:00", "08:00"));

    let updated = s.with_series_details("series_focus", date(9), "Yoga", Some("#aabbcc"), None);

    let run = updated.series("series_focus");
    let details: Vec<(NaiveDate, &str, Option<&str>)> = run
        .iter()
        .map(|e| (e.date, e.title.as_str(), e.color.as_deref()))
        .collect();
    assert_eq!(
        details,
        vec![
            (date(2), "Focus", None),
            (date(4), "Focus", None),
            (date(9), "Yoga", Some("#aabbcc")),
            (date(11), "Yoga", Some("#aabbcc")),
            (date(16), "Yoga", Some("#aabbcc")),
            (date(18), "Yoga", Some("#aabbcc")),
        ]
    );
    // Times, ids and other events are untouched.
    assert!(run.iter().all(|e| e.start.to_string() == "07:00"));
    assert_eq!(updated.get("1"), s.get("1"));
    assert_eq!(s.series("series_focus")[3].title, "Focus");
}

#[test]
fn series_details_clear_symbol() {
    let mut template = routine("07:00", "08:00");
    template.base.symbol = Some("🧘".to_string());
    let s = seed().with_routine(&template);

    let updated = s.with_series_details("series_focus", date(2), "Focus", None, None);

    assert!(updated
        .series("series_focus")
        .iter()
        .all(|e| e.symbol.is_none() && e.color.is_none()));
}

#[test]
fn review_of_unrelated_change_is_clean() {
    let current = seed();
    let candidate = current.with_event(event("7", 5, "09:00", "10:00"));

    assert!(current
        .review(&candidate, NewConflictPolicy::default())
        .is_clean());
}

#[test]
fn schedule_serializes_as_plain_event_array() {
    let s = Schedule::new(vec![event("1", 2, "09:00", "10:00").with_series("s")]);

    let json = serde_json::to_value(&s).unwrap();

    assert!(json.is_array());
    assert_eq!(json[0]["id"], "1");
    assert_eq!(json[0]["date"], "2026-03-02");
    assert_eq!(json[0]["start"], "09:00");
    assert_eq!(json[0]["type"], "appointment");
    assert_eq!(json[0]["seriesId"], "s");
    assert!(json[0].get("color").is_none());

    let back: Schedule = serde_json::from_value(json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn schedule_accepts_original_type_labels_and_lenient_times() {
    let json = r#"[
        {"id":"1","title":"Deep Work","date":"2026-03-02","start":"9:00","end":"11","type":"Termin"},
        {"id":"2","title":"Matcha","date":"2026-03-02","start":"13:00","end":"14:00","type":"Event","locationName":"Matcha Café"}
    ]"#;

    let s: Schedule = serde_json::from_str(json).unwrap();

    assert_eq!(s.events()[0].start.to_string(), "09:00");
    assert_eq!(s.events()[0].end.to_string(), "11:00");
    assert_eq!(s.events()[1].kind, planner_engine::EventKind::Social);
    assert_eq!(s.events()[1].location_name.as_deref(), Some("Matcha Café"));
}
