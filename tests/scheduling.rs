use chrono::NaiveDate;
use chrono_tz::Tz;

use planning_board::model::{Board, Feature, Schedule, UpdateRecord};
use planning_board::timeline::calendar::{self, date_range_inclusive_months, format_date, parse_date};
use planning_board::timeline::{
    compute_move_updates, compute_resize_updates, BoardZone, DragController, DragMode, PositionMapper, SessionEvent,
};

fn d(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn year_2025() -> Vec<NaiveDate> {
    date_range_inclusive_months(d("2025-01-01"), d("2025-12-01"))
}

fn zones() -> Vec<BoardZone> {
    vec![
        BoardZone::Local,
        BoardZone::Named(Tz::UTC),
        BoardZone::Named(Tz::America__New_York),
        BoardZone::Named(Tz::Europe__Berlin),
        BoardZone::Named(Tz::Australia__Sydney),
    ]
}

#[test]
fn every_day_of_2025_round_trips_through_text() {
    let mut day = d("2025-01-01");
    while day <= d("2025-12-31") {
        let text = format_date(day);
        assert_eq!(parse_date(&text), Some(day));
        assert_eq!(format_date(parse_date(&text).unwrap()), text);
        day = calendar::add_days(day, 1);
    }
    // Both US and EU transition days are in there.
    assert_eq!(format_date(d("2025-03-09")), "2025-03-09");
    assert_eq!(format_date(d("2025-10-26")), "2025-10-26");
}

#[test]
fn twelve_month_markers_for_2025() {
    let months = year_2025();
    assert_eq!(months.len(), 12);
    for (i, month) in months.iter().enumerate() {
        assert_eq!(*month, NaiveDate::from_ymd_opt(2025, i as u32 + 1, 1).unwrap());
    }
}

#[test]
fn april_starts_at_the_fourth_column_in_every_zone() {
    let april = Feature::feature("A", None, Schedule::planned(d("2025-04-01"), d("2025-04-30")));
    for zone in zones() {
        let mut mapper = PositionMapper::new(zone, 120.0, d("2025-01-01"));
        let geometry = mapper.compute_position(&april, &year_2025());
        assert_eq!(geometry.left, 360.0, "zone {zone:?}");
        assert_eq!(geometry.right(), 480.0, "zone {zone:?}");
    }
}

#[test]
fn month_starts_survive_the_inverse_mapping_in_every_zone() {
    let months = year_2025();
    for zone in zones() {
        let mut mapper = PositionMapper::new(zone, 120.0, d("2025-01-01"));
        for month in &months {
            let left = mapper.span_geometry(*month, *month, &months).left;
            assert_eq!(mapper.date_from_pixel(left, &months), Some(*month), "zone {zone:?}");
        }
    }
}

#[test]
fn epic_move_cascades_to_its_child() {
    let epic = Feature::epic("E", Schedule::planned(d("2025-01-01"), d("2025-01-10")));
    let child = Feature::feature("C", Some("E".into()), Schedule::planned(d("2025-01-02"), d("2025-01-05")));
    let all = vec![epic.clone(), child];

    let updates = compute_move_updates(&epic, d("2025-01-03"), d("2025-01-12"), &all);
    assert_eq!(
        updates,
        vec![
            UpdateRecord::new("E".into(), d("2025-01-03"), d("2025-01-12")),
            UpdateRecord {
                id: "C".into(),
                start: d("2025-01-04"),
                end: d("2025-01-07"),
                from_epic_move: true,
            },
            UpdateRecord::new("E".into(), d("2025-01-03"), d("2025-01-12")),
        ]
    );
}

#[test]
fn epic_resize_is_clamped_to_its_latest_child() {
    let epic = Feature::epic("E2", Schedule::planned(d("2025-01-01"), d("2025-01-10")));
    let child = Feature::feature("C2", Some("E2".into()), Schedule::planned(d("2025-01-05"), d("2025-01-20")));
    let all = vec![epic.clone(), child];

    let updates = compute_resize_updates(&epic, d("2025-01-15"), &all);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].end, d("2025-01-20"));
    assert_eq!(updates[0].start, d("2025-01-01"));
}

#[test]
fn resizing_to_the_current_end_changes_nothing() {
    let leaf = Feature::feature("F", None, Schedule::planned(d("2025-02-01"), d("2025-02-14")));
    assert!(compute_resize_updates(&leaf, d("2025-02-14"), std::slice::from_ref(&leaf)).is_empty());
}

#[test]
fn repeated_mapping_is_stable() {
    let months = year_2025();
    let feature = Feature::feature("F", None, Schedule::planned(d("2025-03-10"), d("2025-05-20")));
    let mut mapper = PositionMapper::new(BoardZone::Named(Tz::Europe__Berlin), 120.0, d("2025-01-01"));

    let first = mapper.compute_position(&feature, &months);
    for _ in 0..10 {
        assert_eq!(mapper.compute_position(&feature, &months), first);
    }
    // A fresh copy of the same markers behaves the same.
    let copy = months.clone();
    assert_eq!(mapper.compute_position(&feature, &copy), first);
}

#[test]
fn dragging_an_epic_updates_the_board() {
    let mut board = Board::new("Roadmap");
    board.features = vec![
        Feature::epic("E", Schedule::planned(d("2025-01-01"), d("2025-01-10"))),
        Feature::feature("C", Some("E".into()), Schedule::planned(d("2025-01-02"), d("2025-01-05"))),
    ];
    let months = year_2025();
    // 310px per month keeps January's days 10px apart.
    let mut mapper = PositionMapper::new(BoardZone::Named(Tz::UTC), 310.0, d("2025-01-01"));
    let mut controller = DragController::new();

    let epic = board.features[0].clone();
    controller.begin(&epic, DragMode::Move, 0.0, d("2025-06-01")).unwrap();
    let moved = controller.pointer_move(20.0, &mut mapper, &months, &board.features);
    assert!(matches!(moved, Some(SessionEvent::Moved { start, .. }) if start == d("2025-01-03")));

    let features = board.features.clone();
    let ended = controller.pointer_up(20.0, &mut mapper, &months, &features, &mut board);
    assert_eq!(
        ended,
        Some(SessionEvent::Ended {
            id: "E".into(),
            start: d("2025-01-03"),
            end: d("2025-01-12"),
        })
    );
    assert_eq!(board.features[0].schedule, Schedule::planned(d("2025-01-03"), d("2025-01-12")));
    assert_eq!(board.features[1].schedule, Schedule::planned(d("2025-01-04"), d("2025-01-07")));
}

#[test]
fn wire_records_feed_the_engine() {
    let json = r#"[
        {"id": "E", "type": "epic", "start": "2025-01-01", "end": "2025-01-10", "originalRank": 1},
        {"id": "C", "type": "feature", "parentEpic": "E", "start": "2025-01-02", "end": "2025-01-20", "originalRank": 2},
        {"id": "U", "type": "feature", "start": "not a date", "end": null, "originalRank": 3}
    ]"#;
    let features: Vec<Feature> = serde_json::from_str(json).unwrap();
    assert_eq!(features[2].schedule, Schedule::Unplanned);

    let updates = compute_resize_updates(&features[0], d("2025-01-12"), &features);
    assert_eq!(updates[0].end, d("2025-01-20"));
    let wire = serde_json::to_value(&updates[0]).unwrap();
    assert_eq!(wire, serde_json::json!({"id": "E", "start": "2025-01-01", "end": "2025-01-20"}));
}
