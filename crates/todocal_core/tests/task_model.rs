use chrono::NaiveDate;
use serde_json::json;
use todocal_core::{Priority, Task, UNTITLED_TASK};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[test]
fn create_sets_defaults_and_trims_input() {
    let task = Task::create("  write report  ", today(), Priority::P1, "  draft first ");

    assert!(!task.id.is_empty());
    assert_eq!(task.title, "write report");
    assert_eq!(task.notes, "draft first");
    assert_eq!(task.date, today());
    assert_eq!(task.priority, Priority::P1);
    assert!(!task.done);
}

#[test]
fn create_generates_distinct_ids() {
    let first = Task::create("a", today(), Priority::P2, "");
    let second = Task::create("a", today(), Priority::P2, "");
    assert_ne!(first.id, second.id);
}

#[test]
fn normalize_keeps_well_formed_records() {
    let raw = json!({
        "id": "abc",
        "title": "Pay rent",
        "date": "2024-02-01",
        "priority": "P0",
        "notes": "bank",
        "done": true
    });

    let task = Task::normalize(&raw, today()).unwrap();
    assert_eq!(task.id, "abc");
    assert_eq!(task.title, "Pay rent");
    assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(task.priority, Priority::P0);
    assert_eq!(task.notes, "bank");
    assert!(task.done);
}

#[test]
fn normalize_maps_every_malformed_priority_to_p2() {
    for priority in [
        json!("P4"),
        json!("p1"),
        json!(""),
        json!(1),
        json!(null),
        json!(["P0"]),
        json!({"P": 0}),
    ] {
        let raw = json!({ "id": "x", "title": "t", "priority": priority });
        let task = Task::normalize(&raw, today()).unwrap();
        assert_eq!(task.priority, Priority::P2, "priority input: {priority}");
    }

    let missing = Task::normalize(&json!({ "title": "t" }), today()).unwrap();
    assert_eq!(missing.priority, Priority::P2);
}

#[test]
fn normalize_maps_malformed_or_missing_dates_to_today() {
    for date in [
        json!("2024-13-01"),
        json!("2024-02-30"),
        json!("yesterday"),
        json!(""),
        json!("2024-1-5"),
        json!("2024-01-5"),
        json!("+2024-01-05"),
        json!(" 2024-01-05"),
        json!("2024-01-05 "),
        json!("24-01-05"),
        json!("2024/01/05"),
        json!(20240101),
        json!(null),
    ] {
        let raw = json!({ "id": "x", "title": "t", "date": date });
        let task = Task::normalize(&raw, today()).unwrap();
        assert_eq!(task.date, today(), "date input: {date}");
    }

    let missing = Task::normalize(&json!({ "title": "t" }), today()).unwrap();
    assert_eq!(missing.date, today());
}

#[test]
fn normalize_substitutes_placeholder_title_and_fresh_id() {
    let raw = json!({ "id": "", "title": "   ", "notes": null, "done": "" });
    let task = Task::normalize(&raw, today()).unwrap();

    assert_eq!(task.title, UNTITLED_TASK);
    assert!(!task.id.is_empty());
    assert_eq!(task.notes, "");
    assert!(!task.done);
}

#[test]
fn normalize_stringifies_scalar_fields() {
    let raw = json!({ "id": 17, "title": 42, "done": 1 });
    let task = Task::normalize(&raw, today()).unwrap();

    assert_eq!(task.id, "17");
    assert_eq!(task.title, "42");
    assert!(task.done);
}

#[test]
fn normalize_returns_none_for_non_objects() {
    assert!(Task::normalize(&json!("task"), today()).is_none());
    assert!(Task::normalize(&json!([1, 2]), today()).is_none());
    assert!(Task::normalize(&json!(null), today()).is_none());
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let mut task = Task::create("Ship", today(), Priority::P3, "n");
    task.id = "t-1".to_string();

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "t-1",
            "title": "Ship",
            "date": "2024-06-15",
            "priority": "P3",
            "notes": "n",
            "done": false
        })
    );

    let decoded: Task = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn priority_ranks_follow_urgency() {
    let ranks: Vec<u8> = Priority::ALL.iter().map(|p| p.rank()).collect();
    assert_eq!(ranks, vec![0, 1, 2, 3]);
    assert!(Priority::P0 < Priority::P3);
    assert_eq!(Priority::default(), Priority::P2);
}
