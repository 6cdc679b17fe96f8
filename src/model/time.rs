// File: ./src/model/time.rs
use crate::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Length of one academic block when a row gives no explicit end.
pub const BLOCK_MINUTES: u16 = 90;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time within a single day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    pub const LAST_MINUTE: ClockTime = ClockTime(MINUTES_PER_DAY - 1);
    /// `24:00`, the end of a lesson running until midnight.
    pub const END_OF_DAY: ClockTime = ClockTime(MINUTES_PER_DAY);

    /// Hours 0..=23 with minutes 0..=59, plus `24:00` exactly.
    pub fn new(hours: u16, minutes: u16) -> Option<Self> {
        if (hours < 24 && minutes < 60) || (hours == 24 && minutes == 0) {
            Some(Self(hours * 60 + minutes))
        } else {
            None
        }
    }

    /// Accepts `H:MM` or `HH:MM` after trimming.
    pub fn parse(input: &str) -> Result<Self> {
        let malformed = || ScheduleError::MalformedTime(input.to_string());
        let s = input.trim();
        let (h, m) = s.split_once(':').ok_or_else(malformed)?;

        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !(1..=2).contains(&h.len()) || m.len() != 2 || !all_digits(h) || !all_digits(m) {
            return Err(malformed());
        }

        let hours: u16 = h.parse().map_err(|_| malformed())?;
        let minutes: u16 = m.parse().map_err(|_| malformed())?;
        Self::new(hours, minutes).ok_or_else(malformed)
    }

    pub fn hours(&self) -> u16 {
        self.0 / 60
    }

    pub fn minutes(&self) -> u16 {
        self.0 % 60
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.0
    }

    /// Adds minutes, wrapping at midnight without carrying a day.
    pub fn add_minutes(&self, minutes: u16) -> Self {
        Self(((self.0 as u32 + minutes as u32) % MINUTES_PER_DAY as u32) as u16)
    }

    /// Signed distance from `self` to `later`. Negative when `later` is earlier.
    pub fn minutes_until(&self, later: &ClockTime) -> i32 {
        later.0 as i32 - self.0 as i32
    }

    pub fn abs_diff(&self, other: &ClockTime) -> u16 {
        self.0.abs_diff(other.0)
    }

    pub fn end_of_block(&self) -> Self {
        self.add_minutes(BLOCK_MINUTES)
    }

    /// Wall-clock moment on `date`; `24:00` lands on the following midnight.
    pub fn on_date(&self, date: chrono::NaiveDate) -> chrono::NaiveDateTime {
        date.and_time(chrono::NaiveTime::MIN) + chrono::Duration::minutes(self.0 as i64)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

// --- STRING HELPERS ---

pub fn compare(a: &str, b: &str) -> Result<Ordering> {
    Ok(ClockTime::parse(a)?.cmp(&ClockTime::parse(b)?))
}

pub fn minutes_between(a: &str, b: &str) -> Result<u16> {
    Ok(ClockTime::parse(a)?.abs_diff(&ClockTime::parse(b)?))
}

pub fn end_of_block(start: &str) -> Result<String> {
    Ok(ClockTime::parse(start)?.end_of_block().to_string())
}

/// Human readable length: `45 min`, `2 h`, `1 h 15 min`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;

    if hours == 0 {
        format!("{} min", rest)
    } else if rest == 0 {
        format!("{} h", hours)
    } else {
        format!("{} h {} min", hours, rest)
    }
}
