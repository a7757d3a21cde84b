// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path conventions shared with the daemon: settings under the user
//! config dir, state under `$XDG_STATE_HOME/curfew`.

use crate::exit_error::ExitError;
use curfew_core::Settings;
use std::path::PathBuf;

pub fn settings_path() -> Result<PathBuf, ExitError> {
    let base = dirs::config_dir()
        .ok_or_else(|| ExitError::new(1, "could not determine config directory"))?;
    Ok(base.join("curfew").join("settings.toml"))
}

pub fn schedule_path(settings: &Settings) -> Result<PathBuf, ExitError> {
    let state_dir = match &settings.state_dir {
        Some(dir) => dir.clone(),
        None => default_state_dir()?,
    };
    Ok(state_dir.join("schedule.json"))
}

fn default_state_dir() -> Result<PathBuf, ExitError> {
    if let Ok(dir) = std::env::var("XDG_STATE_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join("curfew"));
        }
    }
    let home = dirs::home_dir()
        .ok_or_else(|| ExitError::new(1, "could not determine home directory"))?;
    Ok(home.join(".local").join("state").join("curfew"))
}
