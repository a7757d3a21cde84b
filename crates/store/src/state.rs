// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted schedule document.

use curfew_core::{AutoCashConfig, MessagesConfig, Task};
use serde::{Deserialize, Serialize};

/// Current schema version of the schedule document.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Everything the scheduler and CLI share: the task list and the two
/// singleton configs.
///
/// Every field added after v1 carries `#[serde(default)]` so documents
/// written by older binaries keep loading; unknown fields from newer
/// binaries are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    #[serde(rename = "v", default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub auto_cash: AutoCashConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

fn default_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            tasks: Vec::new(),
            auto_cash: AutoCashConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

/// Why a task lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskLookup {
    NotFound,
    /// An ID prefix matched more than one task.
    Ambiguous,
}

impl ScheduleState {
    /// Find a task by full ID, exact name, or unique ID prefix (like
    /// git commit hashes).
    pub fn find_task(&self, key: &str) -> Result<usize, TaskLookup> {
        if let Some(i) = self.tasks.iter().position(|t| t.id == key || t.name == key) {
            return Ok(i);
        }
        let mut matches = self.tasks.iter().enumerate().filter(|(_, t)| {
            t.id.as_str().strip_prefix(curfew_core::TaskId::PREFIX)
                .unwrap_or(t.id.as_str())
                .starts_with(key)
                || t.id.as_str().starts_with(key)
        });
        match (matches.next(), matches.next()) {
            (Some((i, _)), None) => Ok(i),
            (Some(_), Some(_)) => Err(TaskLookup::Ambiguous),
            (None, _) => Err(TaskLookup::NotFound),
        }
    }

    pub fn task_name_taken(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name == name)
    }
}
