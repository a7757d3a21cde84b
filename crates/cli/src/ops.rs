// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The configuration surface: operator commands over the task store.
//!
//! Every mutation is one authorize → load → mutate → save cycle over
//! the full document (last writer wins; the store's atomic replace
//! protects against torn writes, not lost updates — acceptable for a
//! single-operator setup). Rejected requests never mutate state.

use curfew_core::{
    parse_amount, parse_weekday, AutoCashConfig, ChannelRef, Clock, FireTime, MessagesConfig,
    Recurrence, Settings, Task, TaskKind,
};
use curfew_store::{ScheduleState, StoreError, TaskLookup, TaskStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("operator '{0}' is not authorized")]
    Unauthorized(String),
    #[error("no task matching '{0}'")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn invalid(msg: impl Into<String>) -> OpError {
    OpError::InvalidInput(msg.into())
}

/// Parameters for creating a lock/unlock task.
pub struct AddTask<'a> {
    pub name: &'a str,
    pub kind: TaskKind,
    pub time: &'a str,
    pub channel_id: &'a str,
    pub guild_id: &'a str,
    pub reason: Option<&'a str>,
    pub message: Option<&'a str>,
    pub once: bool,
}

/// Field updates for the auto-cash config. `None` leaves a field alone.
#[derive(Default)]
pub struct AutoCashUpdate<'a> {
    pub time: Option<&'a str>,
    pub channel_id: Option<&'a str>,
    pub guild_id: Option<&'a str>,
    pub amount: Option<&'a str>,
    pub weekday_amounts: Vec<(&'a str, &'a str)>,
}

/// Operator command surface over the task store.
pub struct ConfigSurface<C> {
    store: TaskStore,
    settings: Settings,
    clock: C,
}

impl<C: Clock> ConfigSurface<C> {
    pub fn new(store: TaskStore, settings: Settings, clock: C) -> Self {
        Self { store, settings, clock }
    }

    fn authorize(&self, operator: &str) -> Result<(), OpError> {
        if self.settings.is_operator(operator) {
            Ok(())
        } else {
            Err(OpError::Unauthorized(operator.to_string()))
        }
    }

    fn find(&self, state: &ScheduleState, key: &str) -> Result<usize, OpError> {
        if key.trim().is_empty() {
            return Err(invalid("task id or name required"));
        }
        state.find_task(key).map_err(|e| match e {
            TaskLookup::NotFound => OpError::NotFound(key.to_string()),
            TaskLookup::Ambiguous => {
                invalid(format!("'{key}' matches more than one task, use the full id"))
            }
        })
    }

    pub fn list_tasks(&self, operator: &str) -> Result<Vec<Task>, OpError> {
        self.authorize(operator)?;
        Ok(self.store.load()?.tasks)
    }

    pub fn show_task(&self, operator: &str, key: &str) -> Result<Task, OpError> {
        self.authorize(operator)?;
        let state = self.store.load()?;
        let idx = self.find(&state, key)?;
        Ok(state.tasks[idx].clone())
    }

    pub fn add_task(&self, operator: &str, params: AddTask<'_>) -> Result<Task, OpError> {
        self.authorize(operator)?;
        let name = params.name.trim();
        if name.is_empty() {
            return Err(invalid("task name cannot be empty"));
        }
        let fire_time: FireTime =
            params.time.parse().map_err(|e| invalid(format!("{e}")))?;

        let mut state = self.store.load()?;
        if state.task_name_taken(name) {
            return Err(invalid(format!("a task named '{name}' already exists")));
        }

        let mut task = Task::new(
            name,
            params.kind,
            ChannelRef {
                channel_id: params.channel_id.to_string(),
                guild_id: params.guild_id.to_string(),
            },
            fire_time,
            Recurrence::for_fire_time(&fire_time, params.once),
            self.clock.now_utc(),
            self.settings.offset(),
        );
        task.reason = params.reason.map(str::to_string);
        task.message = params.message.map(str::to_string);

        state.tasks.push(task.clone());
        self.store.save(&state)?;
        Ok(task)
    }

    /// Update a task's fire time, re-anchoring its next occurrence and
    /// reviving it if stalled.
    pub fn set_task_time(&self, operator: &str, key: &str, time: &str) -> Result<Task, OpError> {
        self.authorize(operator)?;
        let fire_time: FireTime = time.parse().map_err(|e| invalid(format!("{e}")))?;
        let mut state = self.store.load()?;
        let idx = self.find(&state, key)?;
        state.tasks[idx].reschedule(fire_time, self.clock.now_utc(), self.settings.offset());
        let task = state.tasks[idx].clone();
        self.store.save(&state)?;
        Ok(task)
    }

    pub fn remove_task(&self, operator: &str, key: &str) -> Result<Task, OpError> {
        self.authorize(operator)?;
        let mut state = self.store.load()?;
        let idx = self.find(&state, key)?;
        let task = state.tasks.remove(idx);
        self.store.save(&state)?;
        Ok(task)
    }

    /// Remove every task. Returns how many were removed.
    pub fn clear_tasks(&self, operator: &str) -> Result<usize, OpError> {
        self.authorize(operator)?;
        let mut state = self.store.load()?;
        let removed = state.tasks.len();
        if removed > 0 {
            state.tasks.clear();
            self.store.save(&state)?;
        }
        Ok(removed)
    }

    pub fn view_auto_cash(&self, operator: &str) -> Result<AutoCashConfig, OpError> {
        self.authorize(operator)?;
        Ok(self.store.load()?.auto_cash)
    }

    pub fn configure_auto_cash(
        &self,
        operator: &str,
        update: AutoCashUpdate<'_>,
    ) -> Result<AutoCashConfig, OpError> {
        self.authorize(operator)?;
        let mut state = self.store.load()?;
        let cash = &mut state.auto_cash;

        if let Some(time) = update.time {
            let time: FireTime = time.parse().map_err(|e| invalid(format!("{e}")))?;
            if time.weekday().is_some() {
                return Err(invalid("auto-cash runs every day; the time cannot name a weekday"));
            }
            cash.time = time;
        }
        match (update.channel_id, update.guild_id) {
            (Some(channel), Some(guild)) => {
                cash.channel =
                    Some(ChannelRef { channel_id: channel.to_string(), guild_id: guild.to_string() });
            }
            (None, None) => {}
            _ => return Err(invalid("--channel and --guild must be given together")),
        }
        if let Some(amount) = update.amount {
            cash.amount = parse_amount(amount).map_err(|e| invalid(format!("{e}")))?;
        }
        for (day, amount) in update.weekday_amounts {
            let weekday = parse_weekday(day)
                .ok_or_else(|| invalid(format!("unknown weekday: '{day}'")))?;
            let amount = parse_amount(amount).map_err(|e| invalid(format!("{e}")))?;
            cash.weekday_amounts
                .insert(curfew_core::weekday_name(weekday).to_string(), amount);
        }

        let cash = state.auto_cash.clone();
        self.store.save(&state)?;
        Ok(cash)
    }

    pub fn enable_auto_cash(&self, operator: &str) -> Result<AutoCashConfig, OpError> {
        self.authorize(operator)?;
        let mut state = self.store.load()?;
        if state.auto_cash.channel.is_none() {
            return Err(invalid("configure an auto-cash channel before enabling"));
        }
        if state.auto_cash.amount == 0 && state.auto_cash.weekday_amounts.is_empty() {
            return Err(invalid("configure an auto-cash amount before enabling"));
        }
        state.auto_cash.enabled = true;
        let cash = state.auto_cash.clone();
        self.store.save(&state)?;
        Ok(cash)
    }

    pub fn disable_auto_cash(&self, operator: &str) -> Result<AutoCashConfig, OpError> {
        self.authorize(operator)?;
        let mut state = self.store.load()?;
        state.auto_cash.enabled = false;
        let cash = state.auto_cash.clone();
        self.store.save(&state)?;
        Ok(cash)
    }

    pub fn view_messages(&self, operator: &str) -> Result<MessagesConfig, OpError> {
        self.authorize(operator)?;
        Ok(self.store.load()?.messages)
    }

    pub fn set_opening_message(&self, operator: &str, text: &str) -> Result<(), OpError> {
        self.authorize(operator)?;
        let mut state = self.store.load()?;
        state.messages.opening = text.to_string();
        self.store.save(&state)?;
        Ok(())
    }

    pub fn set_closing_message(&self, operator: &str, text: &str) -> Result<(), OpError> {
        self.authorize(operator)?;
        let mut state = self.store.load()?;
        state.messages.closing = text.to_string();
        self.store.save(&state)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
