use chrono::NaiveDate;
use std::fs;
use todocal_core::{JsonFileStore, MemoryTaskStore, Priority, StoreError, Task, TaskStore};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_tasks() -> Vec<Task> {
    let mut done = Task::create("Renew passport", day(2024, 3, 2), Priority::P0, "office");
    done.done = true;
    vec![
        Task::create("Buy milk", day(2024, 3, 1), Priority::P2, ""),
        done,
        Task::create("Café visit", day(2025, 1, 9), Priority::P3, "with Zoë"),
    ]
}

#[test]
fn load_missing_file_returns_empty_and_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo_data.json");
    let store = JsonFileStore::new(&path);

    assert!(store.load(day(2024, 1, 1)).is_empty());
    assert!(!path.exists());
}

#[test]
fn load_invalid_syntax_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo_data.json");
    fs::write(&path, "[{\"id\": \"a\",").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.load(day(2024, 1, 1)).is_empty());
}

#[test]
fn load_non_array_root_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo_data.json");
    fs::write(&path, r#"{"tasks": []}"#).unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.load(day(2024, 1, 1)).is_empty());
}

#[test]
fn save_then_load_roundtrips_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("todo_data.json"));
    let tasks = sample_tasks();

    store.save(&tasks).unwrap();
    let loaded = store.load(day(2030, 1, 1));

    assert_eq!(loaded, tasks);
}

#[test]
fn save_overwrites_prior_content_and_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("todo_data.json");
    let store = JsonFileStore::new(&path);

    store.save(&sample_tasks()).unwrap();
    let single = vec![Task::create("Only one", day(2024, 5, 5), Priority::P1, "")];
    store.save(&single).unwrap();

    assert_eq!(store.load(day(2024, 1, 1)), single);
    assert!(!dir.path().join("nested").join("todo_data.json.tmp").exists());
}

#[test]
fn save_under_regular_file_fails_with_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "plain file").unwrap();
    let path = blocker.join("todo_data.json");
    let store = JsonFileStore::new(&path);

    let err = store.save(&sample_tasks()).unwrap_err();

    match err {
        StoreError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("expected io error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "plain file");
}

#[test]
fn failed_rename_removes_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo_data.json");
    fs::create_dir(&path).unwrap();
    fs::write(path.join("occupied"), "x").unwrap();
    let store = JsonFileStore::new(&path);

    assert!(matches!(
        store.save(&sample_tasks()),
        Err(StoreError::Io { .. })
    ));
    assert!(!dir.path().join("todo_data.json.tmp").exists());
    assert!(path.is_dir());
}

#[test]
fn saved_file_is_indented_and_keeps_non_ascii() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo_data.json");
    let store = JsonFileStore::new(&path);

    store.save(&sample_tasks()).unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.starts_with("[\n  {\n    \"id\": "));
    assert!(text.contains("\"title\": \"Café visit\""));
    assert!(text.contains("\"notes\": \"with Zoë\""));
    let id_at = text.find("\"id\"").unwrap();
    let done_at = text.find("\"done\"").unwrap();
    assert!(id_at < done_at);
}

#[test]
fn empty_collection_saves_as_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo_data.json");
    let store = JsonFileStore::new(&path);

    store.save(&[]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    assert!(store.load(day(2024, 1, 1)).is_empty());
}

#[test]
fn load_normalizes_loose_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo_data.json");
    fs::write(
        &path,
        r#"[
            {"id": "a", "title": "", "date": "bad", "priority": "urgent"},
            42,
            {"id": "a", "title": "dup", "date": "2024-01-05", "priority": "P1", "done": true}
        ]"#,
    )
    .unwrap();

    let today = day(2024, 2, 2);
    let tasks = JsonFileStore::new(&path).load(today);

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, "a");
    assert_eq!(tasks[0].title, "Untitled task");
    assert_eq!(tasks[0].date, today);
    assert_eq!(tasks[0].priority, Priority::P2);
    assert_ne!(tasks[1].id, "a");
    assert_eq!(tasks[1].title, "dup");
    assert!(tasks[1].done);
}

#[test]
fn memory_store_uses_same_encoding_and_counts_saves() {
    let store = MemoryTaskStore::new();
    assert!(store.load(day(2024, 1, 1)).is_empty());
    assert_eq!(store.raw(), None);

    let tasks = sample_tasks();
    store.save(&tasks).unwrap();

    assert_eq!(store.save_count(), 1);
    assert_eq!(store.load(day(2024, 1, 1)), tasks);
    assert!(store.raw().unwrap().starts_with("[\n  {"));
}

#[test]
fn memory_store_seeded_with_garbage_loads_empty() {
    let store = MemoryTaskStore::with_raw("not json at all");
    assert!(store.load(day(2024, 1, 1)).is_empty());
    assert_eq!(store.save_count(), 0);
}
