// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polling scheduler loop.
//!
//! One tick: load the schedule, fire due tasks through the gateway,
//! run the auto-cash check, save if anything changed. Firing is
//! idempotent per occurrence, so restarts and missed ticks are safe:
//! an overdue task fires once on catch-up, and a fired occurrence is
//! never re-fired. A failed gateway call leaves the occurrence pending
//! for the next tick; failure is never conflated with "already fired".

use crate::alert;
use chrono::FixedOffset;
use curfew_core::{format_amount, ActionGateway, AutoCashConfig, Clock, TaskKind};
use curfew_store::{StoreError, TaskStore};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// What one tick did. Returned for observability and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub fired: u32,
    pub failed: u32,
    pub distributed: bool,
    pub saved: bool,
    pub skipped_corrupt: bool,
}

/// The scheduler loop. Sole writer of firing state and distribution
/// dates; sole caller of the gateway for scheduled effects.
pub struct Scheduler<C, G> {
    store: TaskStore,
    gateway: G,
    clock: C,
    offset: FixedOffset,
    failure_threshold: u32,
    alert_path: Option<PathBuf>,
    corrupt_ticks: u32,
}

impl<C: Clock, G: ActionGateway> Scheduler<C, G> {
    pub fn new(
        store: TaskStore,
        gateway: G,
        clock: C,
        offset: FixedOffset,
        failure_threshold: u32,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            offset,
            failure_threshold,
            alert_path: None,
            corrupt_ticks: 0,
        }
    }

    pub fn with_alert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.alert_path = Some(path.into());
        self
    }

    /// Run ticks forever at the given interval. Ticks never overlap;
    /// a slow tick delays the next one rather than stacking.
    pub async fn run(&mut self, tick_interval: Duration) {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// Execute one scheduling tick.
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        let mut state = match self.store.load() {
            Ok(state) => {
                self.corrupt_ticks = 0;
                state
            }
            Err(e @ StoreError::Corrupt { .. }) => {
                // Never reset a corrupt document; skip and retry next tick
                self.corrupt_ticks = self.corrupt_ticks.saturating_add(1);
                warn!(corrupt_ticks = self.corrupt_ticks, "skipping tick: {e}");
                if self.corrupt_ticks == self.failure_threshold {
                    alert::raise(
                        self.alert_path.as_deref(),
                        &format!(
                            "schedule document still corrupt after {} ticks: {e}",
                            self.corrupt_ticks
                        ),
                    );
                }
                report.skipped_corrupt = true;
                return report;
            }
            Err(e) => {
                warn!("skipping tick, schedule load failed: {e}");
                return report;
            }
        };
        let before = state.clone();
        let now = self.clock.now_utc();

        let due: Vec<usize> = (0..state.tasks.len())
            .filter(|&i| state.tasks[i].is_due(now))
            .collect();

        for idx in due {
            let Some(task) = state.tasks.get(idx) else { continue };
            let kind = task.kind;
            let target = task.target.clone();
            let reason = task
                .reason
                .clone()
                .unwrap_or_else(|| format!("Scheduled {kind}"));
            let text = task.message.clone().unwrap_or_else(|| match kind {
                TaskKind::Lock => state.messages.closing_or_default().to_string(),
                TaskKind::Unlock => state.messages.opening_or_default().to_string(),
            });

            let result = match kind {
                TaskKind::Lock => self.gateway.lock(&target, &reason).await,
                TaskKind::Unlock => self.gateway.unlock(&target, &reason).await,
            };

            let Some(task) = state.tasks.get_mut(idx) else { continue };
            match result {
                Ok(()) => {
                    task.record_fired(now, self.offset);
                    report.fired += 1;
                    info!(
                        task = %task.name,
                        kind = %kind,
                        channel = %target.channel_id,
                        "task fired"
                    );
                    // Transition message is best effort; the action already
                    // happened and must not be retried over a lost message
                    if let Err(e) = self.gateway.send_message(&target, &text).await {
                        warn!(task = %task.name, "transition message failed: {e}");
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(task = %task.name, failures = task.failures + 1, "task failed: {e}");
                    if task.record_failure(self.failure_threshold) {
                        alert::raise(
                            self.alert_path.as_deref(),
                            &format!(
                                "task '{}' stalled after {} failed attempts: {e}",
                                task.name, task.failures
                            ),
                        );
                    }
                }
            }
        }

        self.check_auto_cash(&mut state, &mut report).await;

        if state != before {
            match self.store.save(&state) {
                Ok(()) => report.saved = true,
                Err(e) => warn!("failed to persist schedule: {e}"),
            }
        }
        report
    }

    async fn check_auto_cash(
        &mut self,
        state: &mut curfew_store::ScheduleState,
        report: &mut TickReport,
    ) {
        let now = self.clock.now_utc();
        if !state.auto_cash.is_due(now, self.offset) {
            return;
        }
        let weekday = AutoCashConfig::local_weekday(now, self.offset);
        let amount = state.auto_cash.amount_for(weekday);
        if amount == 0 {
            warn!(weekday = ?weekday, "auto-cash due but no amount configured");
            return;
        }
        let Some(channel) = state.auto_cash.channel.clone() else { return };

        match self.gateway.distribute(&channel, amount).await {
            Ok(()) => {
                state.auto_cash.record_distributed(now, self.offset);
                report.distributed = true;
                info!(
                    amount = %format_amount(amount),
                    channel = %channel.channel_id,
                    "auto-cash distributed"
                );
            }
            Err(e) => {
                warn!(failures = state.auto_cash.failures + 1, "auto-cash failed: {e}");
                if state.auto_cash.record_failure(self.failure_threshold, now, self.offset) {
                    alert::raise(
                        self.alert_path.as_deref(),
                        &format!("auto-cash written off for today after repeated failures: {e}"),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
