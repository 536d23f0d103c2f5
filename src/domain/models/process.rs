//! Process domain model.
//!
//! A Process is the declarative descriptor of a recurring job: the window in
//! which it may run (date range, daily time range, excluded weekdays) and its
//! current lifecycle status. It says nothing about the job's actual runtime.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Canonical encoding of [`ProcessDate`].
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Canonical encoding of [`ProcessTime`].
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Error returned when a value does not match its canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseValueError(pub String);

/// Checks a fixed-width `dd<sep>dd<sep>...` pattern: digits everywhere except
/// at the separator positions.
fn matches_pattern(s: &str, len: usize, sep: u8, sep_positions: &[usize]) -> bool {
    s.len() == len
        && s.bytes().enumerate().all(|(i, b)| {
            if sep_positions.contains(&i) {
                b == sep
            } else {
                b.is_ascii_digit()
            }
        })
}

/// Calendar date encoded as `DD-MM-YYYY`.
///
/// Ordering is chronological, so comparisons never depend on the width of
/// the string encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcessDate(NaiveDate);

impl ProcessDate {
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for ProcessDate {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !matches_pattern(s, 10, b'-', &[2, 5]) {
            return Err(ParseValueError(format!(
                "'{s}' does not match the date format DD-MM-YYYY"
            )));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ParseValueError(format!("'{s}' is not a valid calendar date")))
    }
}

impl fmt::Display for ProcessDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl TryFrom<String> for ProcessDate {
    type Error = ParseValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProcessDate> for String {
    fn from(value: ProcessDate) -> Self {
        value.to_string()
    }
}

impl From<NaiveDate> for ProcessDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

/// Time of day encoded as `HH:MM:SS` (24-hour clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcessTime(NaiveTime);

impl ProcessTime {
    pub const fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for ProcessTime {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !matches_pattern(s, 8, b':', &[2, 5]) {
            return Err(ParseValueError(format!(
                "'{s}' does not match the time format HH:MM:SS"
            )));
        }
        NaiveTime::parse_from_str(s, TIME_FORMAT)
            .map(Self)
            .map_err(|_| ParseValueError(format!("'{s}' is not a valid time of day")))
    }
}

impl fmt::Display for ProcessTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl TryFrom<String> for ProcessTime {
    type Error = ParseValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProcessTime> for String {
    fn from(value: ProcessTime) -> Self {
        value.to_string()
    }
}

impl From<NaiveTime> for ProcessTime {
    fn from(value: NaiveTime) -> Self {
        Self(value)
    }
}

/// A weekday name as used in `days_off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == lowered)
            .ok_or_else(|| {
                ParseValueError(format!(
                    "'{s}' is not a weekday (expected one of monday, tuesday, wednesday, thursday, friday, saturday, sunday)"
                ))
            })
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

/// Lifecycle status of a process.
///
/// A process without a status has never been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Stopped,
    Running,
}

impl ProcessStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
        }
    }

    /// Whether moving into this status starts the process and therefore
    /// needs an eligibility check first.
    pub const fn is_start(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl FromStr for ProcessStatus {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stopped" => Ok(Self::Stopped),
            "running" => Ok(Self::Running),
            _ => Err(ParseValueError(format!(
                "'{s}' is not a status (expected stopped or running)"
            ))),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted process descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    #[serde(rename = "type")]
    pub process_type: String,
    pub name: String,
    pub description: Option<String>,

    // -- Execution window --
    pub date_from: Option<ProcessDate>,
    pub date_to: Option<ProcessDate>,
    pub time_from: Option<ProcessTime>,
    pub time_to: Option<ProcessTime>,
    #[serde(default)]
    pub days_off: BTreeSet<DayOfWeek>,

    pub status: Option<ProcessStatus>,

    // -- Timestamps --
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Process {
    /// Create an unconstrained, never-started process.
    pub fn new(
        id: impl Into<String>,
        process_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            process_type: process_type.into(),
            name: name.into(),
            description: None,
            date_from: None,
            date_to: None,
            time_from: None,
            time_to: None,
            days_off: BTreeSet::new(),
            status: None,
            created_at: now,
            updated_at: now,
        }
    }

    // Builder methods
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dates(mut self, from: Option<ProcessDate>, to: Option<ProcessDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn with_times(mut self, from: Option<ProcessTime>, to: Option<ProcessTime>) -> Self {
        self.time_from = from;
        self.time_to = to;
        self
    }

    pub fn with_day_off(mut self, day: DayOfWeek) -> Self {
        self.days_off.insert(day);
        self
    }

    pub fn with_status(mut self, status: ProcessStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_running(&self) -> bool {
        self.status == Some(ProcessStatus::Running)
    }

    /// True when no date, time or weekday constraint is set.
    pub fn is_unconstrained(&self) -> bool {
        self.date_from.is_none()
            && self.date_to.is_none()
            && self.time_from.is_none()
            && self.time_to.is_none()
            && self.days_off.is_empty()
    }

    /// Human-readable summary of the execution window.
    pub fn window_description(&self) -> String {
        fn bound<T: fmt::Display>(from: Option<&T>, to: Option<&T>) -> Option<String> {
            match (from, to) {
                (None, None) => None,
                (Some(f), None) => Some(format!("from {f}")),
                (None, Some(t)) => Some(format!("until {t}")),
                (Some(f), Some(t)) => Some(format!("{f} to {t}")),
            }
        }

        let mut parts = Vec::new();
        if let Some(dates) = bound(self.date_from.as_ref(), self.date_to.as_ref()) {
            parts.push(dates);
        }
        if let Some(times) = bound(self.time_from.as_ref(), self.time_to.as_ref()) {
            parts.push(format!("daily {times}"));
        }
        if !self.days_off.is_empty() {
            let days: Vec<_> = self.days_off.iter().map(DayOfWeek::as_str).collect();
            parts.push(format!("except {}", days.join(", ")));
        }

        if parts.is_empty() {
            "always".to_string()
        } else {
            parts.join("; ")
        }
    }
}
