// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Curfew core: domain types and pure scheduling logic.
//!
//! Tasks, fire times, occurrence state, the gateway boundary, and the
//! clock abstraction live here. No I/O beyond reading settings.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod amount;
pub mod clock;
pub mod config;
pub mod firetime;
pub mod gateway;
mod id;
pub mod settings;
pub mod task;

pub use amount::{format_amount, parse_amount, ParseAmountError};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    AutoCashConfig, MessagesConfig, DEFAULT_CLOSING_MESSAGE, DEFAULT_OPENING_MESSAGE,
};
pub use firetime::{parse_weekday, weekday_name, FireTime, ParseFireTimeError};
pub use gateway::{ActionFailed, ActionGateway};
pub use settings::{Settings, SettingsError};
pub use task::{ChannelRef, FireState, Recurrence, Task, TaskId, TaskKind};

#[cfg(any(test, feature = "test-support"))]
pub use gateway::{GatewayCall, RecordingGateway};
