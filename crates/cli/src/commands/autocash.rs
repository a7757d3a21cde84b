// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Auto-cash command handlers

use clap::{Args, Subcommand};

use crate::exit_error::ExitError;
use crate::ops::{AutoCashUpdate, ConfigSurface};
use curfew_core::{format_amount, AutoCashConfig, Clock};

#[derive(Args)]
pub struct AutocashArgs {
    #[command(subcommand)]
    pub command: AutocashCommand,
}

#[derive(Subcommand)]
pub enum AutocashCommand {
    /// Show the auto-cash configuration
    Show {},
    /// Update auto-cash settings (only the fields given change)
    Set {
        /// Local time of day after which distribution runs, e.g. "12am"
        #[arg(long)]
        time: Option<String>,
        /// Channel to distribute in (requires --guild)
        #[arg(long)]
        channel: Option<String>,
        /// Guild the channel belongs to (requires --channel)
        #[arg(long)]
        guild: Option<String>,
        /// Default amount, plain or scientific ("5e9")
        #[arg(long)]
        amount: Option<String>,
        /// Per-weekday override as day=amount, e.g. "monday=1e10";
        /// repeatable
        #[arg(long = "weekday", value_name = "DAY=AMOUNT")]
        weekdays: Vec<String>,
    },
    /// Turn the daily distribution on
    Enable {},
    /// Turn the daily distribution off
    Disable {},
}

pub fn handle<C: Clock>(
    command: AutocashCommand,
    surface: &ConfigSurface<C>,
    operator: &str,
) -> Result<(), ExitError> {
    match command {
        AutocashCommand::Show {} => {
            let cash = surface.view_auto_cash(operator)?;
            print_config(&cash);
        }
        AutocashCommand::Set { time, channel, guild, amount, weekdays } => {
            let weekday_amounts = weekdays
                .iter()
                .map(|pair| {
                    pair.split_once('=').ok_or_else(|| {
                        ExitError::new(2, format!("expected DAY=AMOUNT, got '{pair}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let cash = surface.configure_auto_cash(
                operator,
                AutoCashUpdate {
                    time: time.as_deref(),
                    channel_id: channel.as_deref(),
                    guild_id: guild.as_deref(),
                    amount: amount.as_deref(),
                    weekday_amounts,
                },
            )?;
            print_config(&cash);
        }
        AutocashCommand::Enable {} => {
            surface.enable_auto_cash(operator)?;
            println!("Auto-cash enabled");
        }
        AutocashCommand::Disable {} => {
            surface.disable_auto_cash(operator)?;
            println!("Auto-cash disabled");
        }
    }
    Ok(())
}

fn print_config(cash: &AutoCashConfig) {
    println!("enabled:    {}", if cash.enabled { "yes" } else { "no" });
    println!("time:       {}", cash.time);
    match &cash.channel {
        Some(target) => {
            println!("channel:    {} (guild {})", target.channel_id, target.guild_id);
        }
        None => println!("channel:    (not set)"),
    }
    println!("amount:     {}", format_amount(cash.amount));
    for (day, amount) in &cash.weekday_amounts {
        println!("  {day:<11} {}", format_amount(*amount));
    }
    match cash.last_distributed {
        Some(date) => println!("last run:   {date}"),
        None => println!("last run:   never"),
    }
    if cash.failures > 0 {
        println!("failures:   {} today", cash.failures);
    }
}
