// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `curfew` — operator CLI for the curfew scheduler.
//!
//! Edits the shared schedule document directly; the daemon picks up
//! changes on its next tick.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod exit_error;
mod ops;
mod paths;

use clap::Parser;

#[derive(Parser)]
#[command(name = "curfew", version, about = "Schedule channel locks, unlocks, and payouts")]
struct Cli {
    /// Operator identity for authorization (defaults to $USER)
    #[arg(long, global = true)]
    operator: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = commands::run(cli.operator, cli.command) {
        eprintln!("curfew: {e}");
        std::process::exit(e.code);
    }
}
