// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: paths, settings, and the single-instance lock.

use curfew_core::{Settings, SettingsError};
use fs2::FileExt;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("could not determine home directory")]
    NoHome,
    /// Another daemon already holds the pid-file lock.
    #[error("another curfewd instance is already running: {0}")]
    LockFailed(std::io::Error),
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/curfew)
    pub state_dir: PathBuf,
    /// The shared schedule document
    pub schedule_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to the daemon log file
    pub log_path: PathBuf,
    /// Path to the operator alert log
    pub alert_path: PathBuf,
    pub settings: Settings,
}

impl Config {
    /// Load settings and resolve all state paths.
    ///
    /// Settings live at `~/.config/curfew/settings.toml`; state defaults
    /// to `$XDG_STATE_HOME/curfew` or `~/.local/state/curfew` unless the
    /// settings override it.
    pub fn load() -> Result<Self, LifecycleError> {
        let settings = Settings::load(&settings_path()?)?;
        let state_dir = match &settings.state_dir {
            Some(dir) => dir.clone(),
            None => default_state_dir()?,
        };
        Ok(Self {
            schedule_path: state_dir.join("schedule.json"),
            lock_path: state_dir.join("curfewd.pid"),
            log_path: state_dir.join("curfewd.log"),
            alert_path: state_dir.join("alerts.log"),
            state_dir,
            settings,
        })
    }

    /// Acquire the exclusive pid-file lock, guaranteeing a single
    /// scheduler instance acts on the store.
    ///
    /// The returned file must stay alive for the daemon's lifetime;
    /// dropping it releases the lock.
    pub fn acquire_lock(&self) -> Result<File, LifecycleError> {
        std::fs::create_dir_all(&self.state_dir)?;
        // Avoid truncating before we hold the lock, which would wipe
        // the running daemon's PID
        let mut lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;
        lock_file.set_len(0)?;
        writeln!(lock_file, "{}", std::process::id())?;
        Ok(lock_file)
    }
}

pub fn settings_path() -> Result<PathBuf, LifecycleError> {
    let base = dirs::config_dir().ok_or(LifecycleError::NoHome)?;
    Ok(base.join("curfew").join("settings.toml"))
}

fn default_state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("XDG_STATE_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join("curfew"));
        }
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoHome)?;
    Ok(home.join(".local").join("state").join("curfew"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> Config {
        let state_dir = dir.path().to_path_buf();
        Config {
            schedule_path: state_dir.join("schedule.json"),
            lock_path: state_dir.join("curfewd.pid"),
            log_path: state_dir.join("curfewd.log"),
            alert_path: state_dir.join("alerts.log"),
            state_dir,
            settings: Settings::default(),
        }
    }

    #[test]
    fn lock_writes_pid() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let _lock = config.acquire_lock().unwrap();
        let pid = std::fs::read_to_string(&config.lock_path).unwrap();
        assert_eq!(pid.trim(), std::process::id().to_string());
    }

    #[test]
    fn second_lock_fails_while_first_is_held() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let _lock = config.acquire_lock().unwrap();
        assert!(matches!(config.acquire_lock(), Err(LifecycleError::LockFailed(_))));
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        drop(config.acquire_lock().unwrap());
        assert!(config.acquire_lock().is_ok());
    }
}
