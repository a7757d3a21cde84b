// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator alerts for conditions that need attention.
//!
//! Alerts are conditions retrying will not fix: a task stalled past the
//! failure threshold, or a schedule document that stays corrupt. They
//! go to the error log and to a flat `alerts.log` the operator can tail.

use std::io::Write;
use std::path::Path;
use tracing::error;

/// Record an operator alert.
pub fn raise(alert_path: Option<&Path>, message: &str) {
    error!(alert = true, "{message}");
    let Some(path) = alert_path else { return };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(path) {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let _ = writeln!(f, "[{ts}] {message}");
    }
}
