//! Inbound create/update requests and their static validation.
//!
//! Requests carry raw strings exactly as a caller supplied them. Validation
//! collects every field-level problem instead of stopping at the first one,
//! so a caller can fix all of them in one round.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::process::{DayOfWeek, ParseValueError, Process, ProcessDate, ProcessStatus, ProcessTime};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub process_type: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    #[serde(default)]
    pub days_off: Vec<String>,
    pub status: Option<String>,
}

/// Treat absent and blank optional inputs the same way.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_optional<T>(
    field: &str,
    value: Option<&String>,
    errors: &mut Vec<FieldError>,
) -> Option<T>
where
    T: FromStr<Err = ParseValueError>,
{
    match non_blank(value).map(str::parse::<T>) {
        Some(Ok(parsed)) => Some(parsed),
        Some(Err(e)) => {
            errors.push(FieldError::new(field, e.0));
            None
        }
        None => None,
    }
}

fn require(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}

impl ProcessRequest {
    /// Validate the request and build a process from it.
    ///
    /// `created_at` is carried over from an existing record on update; both
    /// timestamps default to `now` on create.
    pub fn into_process(
        self,
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Process, Vec<FieldError>> {
        let mut errors = Vec::new();

        require("id", &self.id, &mut errors);
        require("type", &self.process_type, &mut errors);
        require("name", &self.name, &mut errors);

        let date_from: Option<ProcessDate> =
            parse_optional("date_from", self.date_from.as_ref(), &mut errors);
        let date_to: Option<ProcessDate> =
            parse_optional("date_to", self.date_to.as_ref(), &mut errors);
        let time_from: Option<ProcessTime> =
            parse_optional("time_from", self.time_from.as_ref(), &mut errors);
        let time_to: Option<ProcessTime> =
            parse_optional("time_to", self.time_to.as_ref(), &mut errors);
        let status: Option<ProcessStatus> =
            parse_optional("status", self.status.as_ref(), &mut errors);

        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                errors.push(FieldError::new(
                    "date_to",
                    format!("{to} is before date_from {from}"),
                ));
            }
        }
        if let (Some(from), Some(to)) = (time_from, time_to) {
            if from > to {
                errors.push(FieldError::new(
                    "time_to",
                    format!("{to} is before time_from {from}"),
                ));
            }
        }

        let mut days_off = BTreeSet::new();
        for raw in self.days_off.iter().filter(|d| !d.trim().is_empty()) {
            match raw.parse::<DayOfWeek>() {
                Ok(day) => {
                    days_off.insert(day);
                }
                Err(e) => errors.push(FieldError::new("days_off", e.0)),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Process {
            id: self.id.trim().to_string(),
            process_type: self.process_type.trim().to_string(),
            name: self.name.trim().to_string(),
            description: non_blank(self.description.as_ref()).map(str::to_string),
            date_from,
            date_to,
            time_from,
            time_to,
            days_off,
            status,
            created_at: created_at.unwrap_or(now),
            updated_at: now,
        })
    }
}

impl From<&Process> for ProcessRequest {
    fn from(p: &Process) -> Self {
        Self {
            id: p.id.clone(),
            process_type: p.process_type.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            date_from: p.date_from.map(String::from),
            date_to: p.date_to.map(String::from),
            time_from: p.time_from.map(String::from),
            time_to: p.time_to.map(String::from),
            days_off: p.days_off.iter().map(ToString::to_string).collect(),
            status: p.status.map(|s| s.as_str().to_string()),
        }
    }
}
