// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable task store: one JSON document, atomic-replace saves.
//!
//! Both the scheduler daemon and the CLI read and write the same
//! document. Every save writes to a temporary file and renames it over
//! the document, so a crash mid-write can never leave a torn document
//! visible to the next load. The previous document is kept as a
//! rotating set of `.bak` backups.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod state;

pub use state::{ScheduleState, TaskLookup, CURRENT_SCHEMA_VERSION};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from loading or saving the schedule document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted document exists but cannot be parsed. Callers must
    /// surface this rather than reset state: a silent reset would
    /// destroy operator-configured schedules.
    #[error("schedule document at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

const MAX_BAK_FILES: u32 = 3;

/// Handle to the persisted schedule document.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current schedule state.
    ///
    /// A missing document is a first run and yields the default state;
    /// an unparsable document is [`StoreError::Corrupt`].
    pub fn load(&self) -> Result<ScheduleState, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no schedule document, starting empty");
                return Ok(ScheduleState::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text)
            .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })
    }

    /// Persist the full state with atomic-replace semantics.
    pub fn save(&self, state: &ScheduleState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, state).map_err(std::io::Error::from)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }

        if self.path.exists() {
            let bak = rotate_bak_path(&self.path);
            let _ = fs::copy(&self.path, bak);
        }

        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), tasks = state.tasks.len(), "schedule saved");
        Ok(())
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
/// The oldest backup is removed when the limit is reached.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    // Remove the oldest if at capacity
    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    // Shift existing backups up by one
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
