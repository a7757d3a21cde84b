// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-time parsing and occurrence computation.
//!
//! A [`FireTime`] is a wall-clock time of day, optionally qualified by a
//! weekday (`"21:30"`, `"9:30pm"`, `"monday 10:30pm"`). Occurrence
//! instants are computed against a fixed UTC offset so the schedule
//! follows the operator's local clock, not the host's.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid time format: '{0}'")]
pub struct ParseFireTimeError(pub String);

/// A scheduled time of day with an optional weekday qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FireTime {
    weekday: Option<Weekday>,
    hour: u8,
    minute: u8,
}

impl FireTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ParseFireTimeError> {
        if hour > 23 || minute > 59 {
            return Err(ParseFireTimeError(format!("{hour}:{minute:02}")));
        }
        Ok(Self { weekday: None, hour, minute })
    }

    /// 00:00 with no weekday qualifier.
    pub const fn midnight() -> Self {
        Self { weekday: None, hour: 0, minute: 0 }
    }

    pub fn on_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Instant of the first occurrence strictly after `after`, evaluated
    /// in the schedule's local offset.
    pub fn next_after(&self, after: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
        let local = after.with_timezone(&offset).naive_local();
        let mut date = local.date();
        if let Some(wd) = self.weekday {
            for _ in 0..7 {
                if date.weekday() == wd {
                    break;
                }
                date = date.succ_opt().unwrap_or(date);
            }
        }
        let mut candidate = date.and_time(self.time());
        if candidate <= local {
            let step = if self.weekday.is_some() { 7 } else { 1 };
            candidate += Duration::days(step);
        }
        let utc = candidate - Duration::seconds(i64::from(offset.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc, Utc)
    }

    /// Whether the local clock at `now` has reached this time of day.
    ///
    /// Ignores the weekday qualifier; used for once-per-day checks where
    /// the calendar date is tracked separately.
    pub fn passed_on(&self, now: DateTime<Utc>, offset: FixedOffset) -> bool {
        now.with_timezone(&offset).time() >= self.time()
    }
}

impl fmt::Display for FireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(wd) = self.weekday {
            write!(f, "{} ", weekday_name(wd))?;
        }
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl From<FireTime> for String {
    fn from(t: FireTime) -> String {
        t.to_string()
    }
}

impl FromStr for FireTime {
    type Err = ParseFireTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let err = || ParseFireTimeError(s.trim().to_string());

        let (weekday, time_part) = split_weekday(&input);
        let time_part = time_part.trim();
        if time_part.is_empty() {
            return Err(err());
        }

        // Optional trailing am/pm, with or without a separating space
        let (digits, meridiem) = if let Some(rest) = time_part.strip_suffix("am") {
            (rest.trim(), Some(Meridiem::Am))
        } else if let Some(rest) = time_part.strip_suffix("pm") {
            (rest.trim(), Some(Meridiem::Pm))
        } else {
            (time_part, None)
        };

        let (hour_str, minute_str) = match digits.split_once(':') {
            Some((h, m)) => (h, m),
            // Bare hour ("9pm") only makes sense with a meridiem
            None if meridiem.is_some() => (digits, "0"),
            None => return Err(err()),
        };

        let hour: u8 = hour_str.trim().parse().map_err(|_| err())?;
        let minute: u8 = minute_str.trim().parse().map_err(|_| err())?;
        if minute > 59 {
            return Err(err());
        }

        let hour = match meridiem {
            Some(m) => {
                if hour < 1 || hour > 12 {
                    return Err(err());
                }
                match (m, hour) {
                    (Meridiem::Am, 12) => 0,
                    (Meridiem::Am, h) => h,
                    (Meridiem::Pm, 12) => 12,
                    (Meridiem::Pm, h) => h + 12,
                }
            }
            None => {
                if hour > 23 {
                    return Err(err());
                }
                hour
            }
        };

        Ok(Self { weekday, hour, minute })
    }
}

impl TryFrom<String> for FireTime {
    type Error = ParseFireTimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Strip a leading weekday name (full or common abbreviation) from a
/// lowercased time string.
fn split_weekday(s: &str) -> (Option<Weekday>, &str) {
    // Longest names first so "sunday" is not split as "sun" + "day"
    const NAMES: &[(&str, Weekday)] = &[
        ("wednesday", Weekday::Wed),
        ("thursday", Weekday::Thu),
        ("saturday", Weekday::Sat),
        ("tuesday", Weekday::Tue),
        ("thurs", Weekday::Thu),
        ("monday", Weekday::Mon),
        ("friday", Weekday::Fri),
        ("sunday", Weekday::Sun),
        ("tues", Weekday::Tue),
        ("thur", Weekday::Thu),
        ("mon", Weekday::Mon),
        ("tue", Weekday::Tue),
        ("wed", Weekday::Wed),
        ("thu", Weekday::Thu),
        ("fri", Weekday::Fri),
        ("sat", Weekday::Sat),
        ("sun", Weekday::Sun),
    ];
    for (name, wd) in NAMES {
        if let Some(rest) = s.strip_prefix(name) {
            if rest.is_empty() || rest.starts_with(' ') {
                return (Some(*wd), rest);
            }
        }
    }
    (None, s)
}

/// Canonical lowercase name used as the map key for weekday amounts.
pub fn weekday_name(wd: Weekday) -> &'static str {
    match wd {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parse a weekday name as accepted in fire-time strings.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match split_weekday(&s.trim().to_ascii_lowercase()) {
        (Some(wd), rest) if rest.is_empty() => Some(wd),
        _ => None,
    }
}

#[cfg(test)]
#[path = "firetime_tests.rs"]
mod tests;
