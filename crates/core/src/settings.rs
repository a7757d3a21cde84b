// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator-owned settings, read by both the daemon and the CLI.
//!
//! Settings live in `settings.toml` under the state directory and are
//! never written by either process. Missing file means defaults;
//! unknown keys are ignored so older binaries keep working.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Override for the state directory holding the schedule document,
    /// logs, and pid file.
    pub state_dir: Option<PathBuf>,
    /// Scheduler polling interval in seconds.
    pub tick_secs: u64,
    /// Offset of the schedule's local timezone from UTC, in minutes
    /// (IST is 330).
    pub utc_offset_minutes: i32,
    /// Consecutive gateway failures before a task stalls and is reported.
    pub failure_threshold: u32,
    /// Hook executable the daemon runs for each gateway action.
    pub hook_command: Option<String>,
    /// Operator identities allowed to edit the schedule.
    pub operators: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: None,
            tick_secs: 60,
            utc_offset_minutes: 0,
            failure_threshold: 5,
            hook_command: None,
            operators: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Schedule timezone as a fixed offset. Out-of-range values fall
    /// back to UTC.
    pub fn offset(&self) -> FixedOffset {
        let minutes = self.utc_offset_minutes.clamp(-14 * 60, 14 * 60);
        FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn is_operator(&self, identity: &str) -> bool {
        self.operators.iter().any(|o| o == identity)
    }
}
