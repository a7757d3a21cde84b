// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task command handlers

use chrono::FixedOffset;
use clap::{Args, Subcommand};

use crate::exit_error::ExitError;
use crate::ops::{AddTask, ConfigSurface};
use curfew_core::{Clock, Task, TaskKind};

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List all scheduled tasks
    List {},
    /// Schedule a channel lock
    AddLock(AddArgs),
    /// Schedule a channel unlock
    AddUnlock(AddArgs),
    /// Change a task's fire time (also revives a stalled task)
    SetTime {
        /// Task name, id, or unique id prefix
        task: String,
        /// New fire time, e.g. "21:30", "9pm", "monday 10:30pm"
        time: String,
    },
    /// Show one task in full
    Show {
        /// Task name, id, or unique id prefix
        task: String,
    },
    /// Remove a task
    Remove {
        /// Task name, id, or unique id prefix
        task: String,
    },
    /// Remove every task
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Unique name for the task
    pub name: String,
    /// Fire time, e.g. "21:30", "9pm", "monday 10:30pm"
    pub time: String,
    /// Target channel id
    #[arg(long)]
    pub channel: String,
    /// Guild the channel belongs to
    #[arg(long)]
    pub guild: String,
    /// Audit reason passed through to the platform
    #[arg(long)]
    pub reason: Option<String>,
    /// Override the transition message for this task
    #[arg(long)]
    pub message: Option<String>,
    /// Fire once and stop instead of repeating
    #[arg(long)]
    pub once: bool,
}

impl AddArgs {
    fn params(&self, kind: TaskKind) -> AddTask<'_> {
        AddTask {
            name: &self.name,
            kind,
            time: &self.time,
            channel_id: &self.channel,
            guild_id: &self.guild,
            reason: self.reason.as_deref(),
            message: self.message.as_deref(),
            once: self.once,
        }
    }
}

pub fn handle<C: Clock>(
    command: TaskCommand,
    surface: &ConfigSurface<C>,
    operator: &str,
    offset: FixedOffset,
) -> Result<(), ExitError> {
    match command {
        TaskCommand::List {} => {
            let mut tasks = surface.list_tasks(operator)?;
            if tasks.is_empty() {
                println!("No tasks scheduled");
                return Ok(());
            }
            tasks.sort_by(|a, b| a.due_at.cmp(&b.due_at));
            println!(
                "{:<10} {:<20} {:<8} {:<18} {:<8} {:<18} {}",
                "ID", "NAME", "ACTION", "TIME", "REPEATS", "NEXT", "STATE"
            );
            for task in &tasks {
                println!(
                    "{:<10} {:<20} {:<8} {:<18} {:<8} {:<18} {}",
                    task.id.short(8),
                    task.name,
                    task.kind,
                    task.fire_time,
                    task.recurrence,
                    task.due_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
                    task.state,
                );
            }
        }
        TaskCommand::AddLock(args) => {
            let task = surface.add_task(operator, args.params(TaskKind::Lock))?;
            println!("Task '{}' scheduled ({})", task.name, task.id);
        }
        TaskCommand::AddUnlock(args) => {
            let task = surface.add_task(operator, args.params(TaskKind::Unlock))?;
            println!("Task '{}' scheduled ({})", task.name, task.id);
        }
        TaskCommand::SetTime { task, time } => {
            let task = surface.set_task_time(operator, &task, &time)?;
            println!(
                "Task '{}' now fires at {} (next: {})",
                task.name,
                task.fire_time,
                task.due_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            );
        }
        TaskCommand::Show { task } => {
            let task = surface.show_task(operator, &task)?;
            print_task(&task, offset);
        }
        TaskCommand::Remove { task } => {
            let task = surface.remove_task(operator, &task)?;
            println!("Task '{}' removed", task.name);
        }
        TaskCommand::Clear { yes } => {
            if !yes {
                return Err(ExitError::new(2, "this removes every task; pass --yes to confirm"));
            }
            let removed = surface.clear_tasks(operator)?;
            println!("Removed {removed} task(s)");
        }
    }
    Ok(())
}

fn print_task(task: &Task, offset: FixedOffset) {
    println!("id:         {}", task.id);
    println!("name:       {}", task.name);
    println!("action:     {}", task.kind);
    println!("channel:    {} (guild {})", task.target.channel_id, task.target.guild_id);
    println!("time:       {}", task.fire_time);
    println!("repeats:    {}", task.recurrence);
    println!("next:       {}", task.due_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"));
    println!("state:      {}", task.state);
    if task.failures > 0 {
        println!("failures:   {}", task.failures);
    }
    if let Some(reason) = &task.reason {
        println!("reason:     {reason}");
    }
    if let Some(message) = &task.message {
        println!("message:    {message}");
    }
    println!("created:    {}", task.created_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"));
}
