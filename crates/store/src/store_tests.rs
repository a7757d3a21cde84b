// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use curfew_core::Task;

fn store_in(dir: &tempfile::TempDir) -> TaskStore {
    TaskStore::new(dir.path().join("schedule.json"))
}

fn sample_state() -> ScheduleState {
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).single().unwrap();
    let mut state = ScheduleState::default();
    state.tasks.push(Task::test("morning", "09:00", now));
    state.tasks.push(Task::test("evening", "21:00", now));
    state.auto_cash.amount = 5_000;
    state.messages.opening = "Good morning!".into();
    state
}

#[test]
fn missing_document_loads_as_default() {
    let dir = tempfile::tempdir().unwrap();
    let state = store_in(&dir).load().unwrap();
    assert_eq!(state, ScheduleState::default());
}

#[test]
fn save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let state = sample_state();
    store.save(&state).unwrap();
    assert_eq!(store.load().unwrap(), state);
}

#[test]
fn corrupt_document_is_an_error_not_a_reset() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "{ not json").unwrap();
    assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
}

#[test]
fn truncated_document_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&sample_state()).unwrap();
    let text = std::fs::read_to_string(store.path()).unwrap();
    std::fs::write(store.path(), &text[..text.len() / 2]).unwrap();
    assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
}

#[test]
fn save_leaves_no_tmp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&sample_state()).unwrap();
    assert!(!store.path().with_extension("tmp").exists());
}

#[test]
fn save_rotates_backups_of_previous_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    for i in 0..5 {
        let mut state = sample_state();
        state.auto_cash.amount = i;
        store.save(&state).unwrap();
    }
    let base = store.path();
    assert!(base.with_extension("bak").exists());
    assert!(base.with_extension("bak.2").exists());
    assert!(base.with_extension("bak.3").exists());
    assert!(!base.with_extension("bak.4").exists());
    // Most recent backup holds the previous save
    let bak: ScheduleState =
        serde_json::from_str(&std::fs::read_to_string(base.with_extension("bak")).unwrap())
            .unwrap();
    assert_eq!(bak.auto_cash.amount, 3);
}

#[test]
fn unknown_fields_are_ignored_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save(&sample_state()).unwrap();
    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    value["added_in_v2"] = serde_json::json!({ "nested": true });
    std::fs::write(store.path(), serde_json::to_string(&value).unwrap()).unwrap();
    assert_eq!(store.load().unwrap(), sample_state());
}

#[test]
fn missing_fields_default_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "{\"tasks\": []}").unwrap();
    let state = store.load().unwrap();
    assert_eq!(state.version, CURRENT_SCHEMA_VERSION);
    assert_eq!(state.auto_cash, curfew_core::AutoCashConfig::default());
}

#[test]
fn find_task_by_id_name_and_prefix() {
    let state = sample_state();
    let id = state.tasks[0].id.clone();

    assert_eq!(state.find_task(id.as_str()), Ok(0));
    assert_eq!(state.find_task("evening"), Ok(1));
    // Unique prefix of the random suffix
    let prefix = id.short(8).to_string();
    assert_eq!(state.find_task(&prefix), Ok(0));

    assert_eq!(state.find_task("no-such-task"), Err(TaskLookup::NotFound));
}

#[test]
fn find_task_rejects_ambiguous_prefix() {
    let mut state = sample_state();
    state.tasks[0].id = curfew_core::TaskId::from_string("task-aaaa1111");
    state.tasks[1].id = curfew_core::TaskId::from_string("task-aaaa2222");
    assert_eq!(state.find_task("aaaa"), Err(TaskLookup::Ambiguous));
    assert_eq!(state.find_task("aaaa1111"), Ok(0));
}

#[test]
fn task_name_uniqueness_check() {
    let state = sample_state();
    assert!(state.task_name_taken("morning"));
    assert!(!state.task_name_taken("midnight"));
}
