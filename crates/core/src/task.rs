// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled tasks and the per-occurrence firing state machine.

use crate::firetime::FireTime;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a scheduled task, assigned at creation.
    pub struct TaskId("task-");
}

/// The moderation action a task performs on its target channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Lock,
    Unlock,
}

crate::simple_display! {
    TaskKind {
        Lock => "lock",
        Unlock => "unlock",
    }
}

/// How a task's fire time advances after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Once,
    Daily,
    Weekly,
}

crate::simple_display! {
    Recurrence {
        Once => "once",
        Daily => "daily",
        Weekly => "weekly",
    }
}

impl Recurrence {
    /// Recurrence implied by a fire time: weekday-qualified times repeat
    /// weekly, plain times daily. `once` overrides both.
    pub fn for_fire_time(fire_time: &FireTime, once: bool) -> Self {
        if once {
            Recurrence::Once
        } else if fire_time.weekday().is_some() {
            Recurrence::Weekly
        } else {
            Recurrence::Daily
        }
    }
}

/// Per-occurrence firing state.
///
/// `Pending → Fired` happens only for `once` tasks; recurring tasks stay
/// `Pending` with `due_at` advanced one period. `Stalled` means the
/// gateway failed repeatedly and the task waits for operator attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireState {
    #[default]
    Pending,
    Fired {
        at: DateTime<Utc>,
    },
    Stalled {
        attempts: u32,
    },
}

crate::simple_display! {
    FireState {
        Pending => "pending",
        Fired { .. } => "fired",
        Stalled { .. } => "stalled",
    }
}

/// The channel a task acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub channel_id: String,
    pub guild_id: String,
}

/// A scheduled lock/unlock action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Unique human label for the task.
    pub name: String,
    pub kind: TaskKind,
    pub target: ChannelRef,
    pub fire_time: FireTime,
    pub recurrence: Recurrence,
    /// Instant of the next occurrence.
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub state: FireState,
    /// Consecutive gateway failures for the current occurrence.
    #[serde(default)]
    pub failures: u32,
    /// Per-task override for the transition message.
    #[serde(default)]
    pub message: Option<String>,
    /// Audit string passed through to the gateway.
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        kind: TaskKind,
        target: ChannelRef,
        fire_time: FireTime,
        recurrence: Recurrence,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            kind,
            target,
            fire_time,
            recurrence,
            due_at: fire_time.next_after(now, offset),
            state: FireState::Pending,
            failures: 0,
            message: None,
            reason: None,
            created_at: now,
        }
    }

    /// Whether this task's current occurrence should fire at `now`.
    ///
    /// Overdue occurrences stay due until fired, so a task missed while
    /// the loop was down still fires on the next tick.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.state == FireState::Pending && now >= self.due_at
    }

    /// Record a successful firing at `now`.
    ///
    /// Recurring tasks advance `due_at` to the next occurrence after
    /// `now` (collapsing any occurrences missed while down) and remain
    /// pending; `once` tasks transition to fired.
    pub fn record_fired(&mut self, now: DateTime<Utc>, offset: FixedOffset) {
        self.failures = 0;
        match self.recurrence {
            Recurrence::Once => self.state = FireState::Fired { at: now },
            Recurrence::Daily | Recurrence::Weekly => {
                self.due_at = self.fire_time.next_after(now, offset);
                self.state = FireState::Pending;
            }
        }
    }

    /// Record a failed gateway call. Returns true if the task just
    /// crossed the failure threshold and stalled.
    pub fn record_failure(&mut self, threshold: u32) -> bool {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= threshold {
            self.state = FireState::Stalled { attempts: self.failures };
            true
        } else {
            false
        }
    }

    /// Re-anchor the task on a new fire time.
    ///
    /// Clears stalled state and failure counts; the next occurrence is
    /// computed from `now`.
    pub fn reschedule(&mut self, fire_time: FireTime, now: DateTime<Utc>, offset: FixedOffset) {
        self.fire_time = fire_time;
        if self.recurrence != Recurrence::Once {
            self.recurrence = Recurrence::for_fire_time(&fire_time, false);
        }
        self.due_at = fire_time.next_after(now, offset);
        self.state = FireState::Pending;
        self.failures = 0;
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Task {
    /// Task with test defaults: daily unlock of channel "general" at the
    /// given fire time.
    pub fn test(name: &str, fire_time: &str, now: DateTime<Utc>) -> Self {
        #[allow(clippy::unwrap_used)]
        let fire_time: FireTime = fire_time.parse().unwrap();
        #[allow(clippy::unwrap_used)]
        let offset = FixedOffset::east_opt(0).unwrap();
        Self::new(
            name,
            TaskKind::Unlock,
            ChannelRef { channel_id: "general".into(), guild_id: "g1".into() },
            fire_time,
            Recurrence::for_fire_time(&fire_time, false),
            now,
            offset,
        )
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
