// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{DateTime, TimeZone, Utc};
use curfew_core::{ChannelRef, FakeClock, FireState, GatewayCall, RecordingGateway, Task};
use curfew_store::ScheduleState;
use tempfile::TempDir;

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
}

fn no_offset() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

struct Harness {
    _dir: TempDir,
    store: TaskStore,
    gateway: RecordingGateway,
    clock: FakeClock,
    scheduler: Scheduler<FakeClock, RecordingGateway>,
}

fn harness(start: DateTime<Utc>, state: &ScheduleState) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = TaskStore::new(dir.path().join("schedule.json"));
    store.save(state).unwrap();
    let gateway = RecordingGateway::new();
    let clock = FakeClock::at(start);
    let scheduler = Scheduler::new(
        store.clone(),
        gateway.clone(),
        clock.clone(),
        no_offset(),
        3,
    )
    .with_alert_path(dir.path().join("alerts.log"));
    Harness { _dir: dir, store, gateway, clock, scheduler }
}

fn state_with_task(task: Task) -> ScheduleState {
    let mut state = ScheduleState::default();
    state.tasks.push(task);
    state
}

#[tokio::test]
async fn task_fires_once_then_not_again_same_occurrence() {
    // The spec scenario: unlock "general" daily at 09:00
    let created = utc(2026, 3, 2, 8, 0);
    let mut h = harness(utc(2026, 3, 2, 9, 1), &state_with_task(Task::test(
        "open-general",
        "09:00",
        created,
    )));

    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 1);
    assert!(report.saved);
    assert_eq!(
        h.gateway.calls()[0],
        GatewayCall::Unlock { channel: "general".into() }
    );

    // Second tick, no time change: nothing due
    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 0);
    assert!(!report.saved);

    // Still nothing at 23:59; fire_time has rolled to tomorrow 09:00
    h.clock.set(utc(2026, 3, 2, 23, 59));
    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 0);
    let persisted = h.store.load().unwrap();
    assert_eq!(persisted.tasks[0].due_at, utc(2026, 3, 3, 9, 0));
    assert_eq!(persisted.tasks[0].state, FireState::Pending);
}

#[tokio::test]
async fn overdue_task_catches_up_exactly_once() {
    let created = utc(2026, 3, 2, 8, 0);
    // Daemon starts hours after the fire time was missed
    let mut h = harness(
        utc(2026, 3, 2, 15, 30),
        &state_with_task(Task::test("open-general", "09:00", created)),
    );

    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 1);
    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 0);
    // Unlock + transition message, exactly one of each
    let unlocks = h
        .gateway
        .calls()
        .into_iter()
        .filter(|c| matches!(c, GatewayCall::Unlock { .. }))
        .count();
    assert_eq!(unlocks, 1);
}

#[tokio::test]
async fn gateway_failure_leaves_task_pending_and_retries() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut h = harness(
        utc(2026, 3, 2, 9, 1),
        &state_with_task(Task::test("open-general", "09:00", created)),
    );
    h.gateway.fail("unlock");

    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 0);
    assert_eq!(report.failed, 1);
    let persisted = h.store.load().unwrap();
    assert_eq!(persisted.tasks[0].state, FireState::Pending);
    assert_eq!(persisted.tasks[0].failures, 1);

    // Gateway recovers: next tick fires without operator intervention
    h.gateway.succeed("unlock");
    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 1);
    assert_eq!(h.store.load().unwrap().tasks[0].failures, 0);
}

#[tokio::test]
async fn repeated_failures_stall_the_task_and_alert() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut h = harness(
        utc(2026, 3, 2, 9, 1),
        &state_with_task(Task::test("open-general", "09:00", created)),
    );
    h.gateway.fail("unlock");

    for _ in 0..3 {
        h.scheduler.tick().await;
    }
    let persisted = h.store.load().unwrap();
    assert_eq!(persisted.tasks[0].state, FireState::Stalled { attempts: 3 });

    // Stalled: no more attempts even though the gateway recovered
    h.gateway.succeed("unlock");
    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 0);
    assert_eq!(h.gateway.call_count(), 0);

    let alerts = std::fs::read_to_string(h._dir.path().join("alerts.log")).unwrap();
    assert!(alerts.contains("stalled after 3 failed attempts"));
}

#[tokio::test]
async fn transition_message_uses_configured_openings() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut state = state_with_task(Task::test("open-general", "09:00", created));
    state.messages.opening = "Rise and shine".into();
    let mut h = harness(utc(2026, 3, 2, 9, 1), &state);

    h.scheduler.tick().await;
    assert_eq!(
        h.gateway.calls()[1],
        GatewayCall::Message { channel: "general".into(), text: "Rise and shine".into() }
    );
}

#[tokio::test]
async fn lock_task_sends_closing_message() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut task = Task::test("close-general", "21:00", created);
    task.kind = curfew_core::TaskKind::Lock;
    let mut h = harness(utc(2026, 3, 2, 21, 5), &state_with_task(task));

    h.scheduler.tick().await;
    let calls = h.gateway.calls();
    assert_eq!(calls[0], GatewayCall::Lock { channel: "general".into() });
    assert_eq!(
        calls[1],
        GatewayCall::Message {
            channel: "general".into(),
            text: curfew_core::DEFAULT_CLOSING_MESSAGE.into()
        }
    );
}

#[tokio::test]
async fn per_task_message_overrides_config() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut task = Task::test("open-general", "09:00", created);
    task.message = Some("Custom greeting".into());
    let mut state = state_with_task(task);
    state.messages.opening = "Ignored".into();
    let mut h = harness(utc(2026, 3, 2, 9, 1), &state);

    h.scheduler.tick().await;
    assert_eq!(
        h.gateway.calls()[1],
        GatewayCall::Message { channel: "general".into(), text: "Custom greeting".into() }
    );
}

#[tokio::test]
async fn lost_message_does_not_unfire_the_task() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut h = harness(
        utc(2026, 3, 2, 9, 1),
        &state_with_task(Task::test("open-general", "09:00", created)),
    );
    h.gateway.fail("send_message");

    let report = h.scheduler.tick().await;
    assert_eq!(report.fired, 1);
    assert_eq!(h.store.load().unwrap().tasks[0].due_at, utc(2026, 3, 3, 9, 0));
}

#[tokio::test]
async fn one_failing_task_does_not_block_others() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut locker = Task::test("close-general", "09:00", created);
    locker.kind = curfew_core::TaskKind::Lock;
    let mut state = state_with_task(locker);
    state.tasks.push(Task::test("open-general", "09:00", created));
    let mut h = harness(utc(2026, 3, 2, 9, 1), &state);
    h.gateway.fail("lock");

    let report = h.scheduler.tick().await;
    assert_eq!(report.failed, 1);
    assert_eq!(report.fired, 1);
    assert!(h
        .gateway
        .calls()
        .contains(&GatewayCall::Unlock { channel: "general".into() }));
}

#[tokio::test]
async fn auto_cash_distributes_at_most_once_per_day() {
    let mut state = ScheduleState::default();
    state.auto_cash.enabled = true;
    state.auto_cash.amount = 5_000;
    state.auto_cash.time = "09:00".parse().unwrap();
    state.auto_cash.channel =
        Some(ChannelRef { channel_id: "cash".into(), guild_id: "g1".into() });
    let mut h = harness(utc(2026, 3, 2, 9, 1), &state);

    let report = h.scheduler.tick().await;
    assert!(report.distributed);
    assert_eq!(
        h.gateway.calls(),
        vec![GatewayCall::Distribute { channel: "cash".into(), amount: 5_000 }]
    );

    // More ticks the same day: nothing
    h.clock.set(utc(2026, 3, 2, 18, 0));
    let report = h.scheduler.tick().await;
    assert!(!report.distributed);
    assert_eq!(h.gateway.call_count(), 1);

    // Next day: distributes again
    h.clock.set(utc(2026, 3, 3, 9, 1));
    let report = h.scheduler.tick().await;
    assert!(report.distributed);
    assert_eq!(h.gateway.call_count(), 2);
}

#[tokio::test]
async fn disabling_auto_cash_mid_day_stops_distribution() {
    let mut state = ScheduleState::default();
    state.auto_cash.enabled = true;
    state.auto_cash.amount = 5_000;
    state.auto_cash.time = "09:00".parse().unwrap();
    state.auto_cash.channel =
        Some(ChannelRef { channel_id: "cash".into(), guild_id: "g1".into() });
    let mut h = harness(utc(2026, 3, 2, 8, 0), &state);

    // Operator disables before the distribution time arrives
    let mut current = h.store.load().unwrap();
    current.auto_cash.enabled = false;
    h.store.save(&current).unwrap();

    h.clock.set(utc(2026, 3, 2, 12, 0));
    let report = h.scheduler.tick().await;
    assert!(!report.distributed);
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test]
async fn auto_cash_uses_weekday_override() {
    let mut state = ScheduleState::default();
    state.auto_cash.enabled = true;
    state.auto_cash.amount = 5_000;
    state.auto_cash.weekday_amounts.insert("monday".into(), 10_000_000_000);
    state.auto_cash.time = "09:00".parse().unwrap();
    state.auto_cash.channel =
        Some(ChannelRef { channel_id: "cash".into(), guild_id: "g1".into() });
    // 2026-03-02 is a Monday
    let mut h = harness(utc(2026, 3, 2, 9, 1), &state);

    h.scheduler.tick().await;
    assert_eq!(
        h.gateway.calls(),
        vec![GatewayCall::Distribute { channel: "cash".into(), amount: 10_000_000_000 }]
    );
}

#[tokio::test]
async fn auto_cash_failure_retries_next_tick() {
    let mut state = ScheduleState::default();
    state.auto_cash.enabled = true;
    state.auto_cash.amount = 5_000;
    state.auto_cash.time = "09:00".parse().unwrap();
    state.auto_cash.channel =
        Some(ChannelRef { channel_id: "cash".into(), guild_id: "g1".into() });
    let mut h = harness(utc(2026, 3, 2, 9, 1), &state);
    h.gateway.fail("distribute");

    let report = h.scheduler.tick().await;
    assert!(!report.distributed);
    assert_eq!(h.store.load().unwrap().auto_cash.failures, 1);

    h.gateway.succeed("distribute");
    let report = h.scheduler.tick().await;
    assert!(report.distributed);
}

#[tokio::test]
async fn corrupt_document_skips_tick_and_alerts_after_threshold() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut h = harness(
        utc(2026, 3, 2, 9, 1),
        &state_with_task(Task::test("open-general", "09:00", created)),
    );
    std::fs::write(h.store.path(), "{ corrupted").unwrap();

    for _ in 0..3 {
        let report = h.scheduler.tick().await;
        assert!(report.skipped_corrupt);
        assert_eq!(report.fired, 0);
    }
    assert_eq!(h.gateway.call_count(), 0);
    let alerts = std::fs::read_to_string(h._dir.path().join("alerts.log")).unwrap();
    assert!(alerts.contains("still corrupt"));

    // Operator repairs the document; the loop recovers on its own
    h.store.save(&state_with_task(Task::test("open-general", "09:00", created))).unwrap();
    let report = h.scheduler.tick().await;
    assert!(!report.skipped_corrupt);
    assert_eq!(report.fired, 1);
}

#[tokio::test]
async fn unchanged_state_is_not_rewritten() {
    let created = utc(2026, 3, 2, 8, 0);
    let mut h = harness(
        utc(2026, 3, 2, 8, 30),
        &state_with_task(Task::test("open-general", "09:00", created)),
    );

    let report = h.scheduler.tick().await;
    assert_eq!(report, TickReport::default());
}
