// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Curfew scheduler daemon.
//!
//! A single polling loop over the shared schedule document: each tick
//! loads the store, fires due tasks through the action gateway, runs
//! the daily auto-cash check, and persists any state changes.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod alert;
pub mod hook;
pub mod lifecycle;
pub mod scheduler;

pub use hook::HookGateway;
pub use lifecycle::{Config, LifecycleError};
pub use scheduler::{Scheduler, TickReport};
