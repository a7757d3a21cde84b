// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition message command handlers

use clap::{Args, Subcommand};

use crate::exit_error::ExitError;
use crate::ops::ConfigSurface;
use curfew_core::Clock;

#[derive(Args)]
pub struct MessageArgs {
    #[command(subcommand)]
    pub command: MessageCommand,
}

#[derive(Subcommand)]
pub enum MessageCommand {
    /// Show the transition messages
    Show {},
    /// Set the message sent after an unlock
    SetOpening {
        /// Message text; empty restores the built-in default
        text: String,
    },
    /// Set the message sent after a lock
    SetClosing {
        /// Message text; empty restores the built-in default
        text: String,
    },
}

pub fn handle<C: Clock>(
    command: MessageCommand,
    surface: &ConfigSurface<C>,
    operator: &str,
) -> Result<(), ExitError> {
    match command {
        MessageCommand::Show {} => {
            let messages = surface.view_messages(operator)?;
            println!("opening: {}", messages.opening_or_default());
            println!("closing: {}", messages.closing_or_default());
        }
        MessageCommand::SetOpening { text } => {
            surface.set_opening_message(operator, &text)?;
            println!("Opening message updated");
        }
        MessageCommand::SetClosing { text } => {
            surface.set_closing_message(operator, &text)?;
            println!("Closing message updated");
        }
    }
    Ok(())
}
