// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Singleton configuration records: auto-cash and transition messages.

use crate::firetime::{weekday_name, FireTime};
use crate::task::ChannelRef;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_OPENING_MESSAGE: &str = "Channel has been unlocked.";
pub const DEFAULT_CLOSING_MESSAGE: &str = "Channel has been locked.";

/// Daily virtual-currency distribution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoCashConfig {
    pub enabled: bool,
    /// Default distribution amount.
    pub amount: u64,
    /// Per-weekday overrides, keyed by lowercase weekday name.
    pub weekday_amounts: BTreeMap<String, u64>,
    /// Local time of day after which distribution becomes due.
    pub time: FireTime,
    pub channel: Option<ChannelRef>,
    /// Calendar date (in the schedule's offset) of the last distribution.
    pub last_distributed: Option<NaiveDate>,
    /// Consecutive failed distribution attempts today.
    pub failures: u32,
}

impl Default for AutoCashConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 0,
            weekday_amounts: BTreeMap::new(),
            time: FireTime::midnight(),
            channel: None,
            last_distributed: None,
            failures: 0,
        }
    }
}

impl AutoCashConfig {
    /// Amount to distribute on the given weekday.
    pub fn amount_for(&self, weekday: Weekday) -> u64 {
        self.weekday_amounts
            .get(weekday_name(weekday))
            .copied()
            .unwrap_or(self.amount)
    }

    /// Local calendar date at `now` under the schedule's offset.
    pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
        now.with_timezone(&offset).date_naive()
    }

    /// Whether a distribution is due: enabled, a channel configured,
    /// not yet distributed today, and the configured time has passed.
    pub fn is_due(&self, now: DateTime<Utc>, offset: FixedOffset) -> bool {
        if !self.enabled || self.channel.is_none() {
            return false;
        }
        let today = Self::local_date(now, offset);
        self.last_distributed != Some(today) && self.time.passed_on(now, offset)
    }

    /// Weekday of the local date at `now`.
    pub fn local_weekday(now: DateTime<Utc>, offset: FixedOffset) -> Weekday {
        now.with_timezone(&offset).weekday()
    }

    /// Record a successful distribution for the local date at `now`.
    pub fn record_distributed(&mut self, now: DateTime<Utc>, offset: FixedOffset) {
        self.last_distributed = Some(Self::local_date(now, offset));
        self.failures = 0;
    }

    /// Record a failed distribution attempt. When the threshold is
    /// reached the day is written off (no distribution until tomorrow)
    /// and true is returned so the caller can alert.
    pub fn record_failure(
        &mut self,
        threshold: u32,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> bool {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= threshold {
            self.last_distributed = Some(Self::local_date(now, offset));
            self.failures = 0;
            true
        } else {
            false
        }
    }
}

/// Messages sent after lock/unlock transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub opening: String,
    pub closing: String,
}

impl MessagesConfig {
    /// Message sent after an unlock, falling back to the built-in default.
    pub fn opening_or_default(&self) -> &str {
        if self.opening.trim().is_empty() {
            DEFAULT_OPENING_MESSAGE
        } else {
            &self.opening
        }
    }

    /// Message sent after a lock, falling back to the built-in default.
    pub fn closing_or_default(&self) -> &str {
        if self.closing.trim().is_empty() {
            DEFAULT_CLOSING_MESSAGE
        } else {
            &self.closing
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
