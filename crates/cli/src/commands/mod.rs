// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod autocash;
pub mod message;
pub mod task;

use clap::Subcommand;

use crate::exit_error::ExitError;
use crate::ops::ConfigSurface;
use crate::paths;
use curfew_core::{Settings, SystemClock};
use curfew_store::TaskStore;

#[derive(Subcommand)]
pub enum Command {
    /// Manage scheduled lock/unlock tasks
    Task(task::TaskArgs),
    /// Manage the daily auto-cash distribution
    Autocash(autocash::AutocashArgs),
    /// View or change the channel transition messages
    Message(message::MessageArgs),
}

/// Resolve the operator identity, build the command surface, and
/// dispatch.
pub fn run(operator: Option<String>, command: Command) -> Result<(), ExitError> {
    let operator = operator
        .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
        .ok_or_else(|| ExitError::new(2, "cannot determine operator, pass --operator"))?;

    let settings = Settings::load(&paths::settings_path()?)
        .map_err(|e| ExitError::new(1, e.to_string()))?;
    let offset = settings.offset();
    let store = TaskStore::new(paths::schedule_path(&settings)?);
    let surface = ConfigSurface::new(store, settings, SystemClock);

    match command {
        Command::Task(args) => task::handle(args.command, &surface, &operator, offset),
        Command::Autocash(args) => autocash::handle(args.command, &surface, &operator),
        Command::Message(args) => message::handle(args.command, &surface, &operator),
    }
}
