//! Repository port for process persistence.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::process::{
    DayOfWeek, ParseValueError, Process, ProcessDate, ProcessStatus, ProcessTime,
};
use crate::domain::models::process_request::FieldError;

/// A field a process list can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Id,
    Type,
    Name,
    Description,
    DateFrom,
    DateTo,
    TimeFrom,
    TimeTo,
    Status,
    DayOff,
}

impl FilterField {
    pub const ALL: [Self; 10] = [
        Self::Id,
        Self::Type,
        Self::Name,
        Self::Description,
        Self::DateFrom,
        Self::DateTo,
        Self::TimeFrom,
        Self::TimeTo,
        Self::Status,
        Self::DayOff,
    ];

    /// External name, as used in query maps.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Type => "type",
            Self::Name => "name",
            Self::Description => "description",
            Self::DateFrom => "date_from",
            Self::DateTo => "date_to",
            Self::TimeFrom => "time_from",
            Self::TimeTo => "time_to",
            Self::Status => "status",
            Self::DayOff => "day_off",
        }
    }

    /// Bring a raw filter value to the encoding stored for this field.
    ///
    /// Weekdays and statuses are case-insensitive; dates and times must be
    /// well formed. Free-text fields are only trimmed.
    pub fn canonical_value(self, raw: &str) -> Result<String, FieldError> {
        let raw = raw.trim();
        let invalid = |e: ParseValueError| {
            FieldError::new(self.as_str(), e.0)
        };
        match self {
            Self::Id | Self::Type | Self::Name | Self::Description => Ok(raw.to_string()),
            Self::DateFrom | Self::DateTo => {
                raw.parse::<ProcessDate>().map(String::from).map_err(invalid)
            }
            Self::TimeFrom | Self::TimeTo => {
                raw.parse::<ProcessTime>().map(String::from).map_err(invalid)
            }
            Self::Status => raw.parse::<ProcessStatus>().map(|s| s.to_string()).map_err(invalid),
            Self::DayOff => raw.parse::<DayOfWeek>().map(|d| d.to_string()).map_err(invalid),
        }
    }

    /// Canonical string values this field takes on `process`.
    fn values_of(self, process: &Process) -> Vec<String> {
        match self {
            Self::Id => vec![process.id.clone()],
            Self::Type => vec![process.process_type.clone()],
            Self::Name => vec![process.name.clone()],
            Self::Description => process.description.iter().cloned().collect(),
            Self::DateFrom => process.date_from.iter().map(ToString::to_string).collect(),
            Self::DateTo => process.date_to.iter().map(ToString::to_string).collect(),
            Self::TimeFrom => process.time_from.iter().map(ToString::to_string).collect(),
            Self::TimeTo => process.time_to.iter().map(ToString::to_string).collect(),
            Self::Status => process.status.iter().map(ToString::to_string).collect(),
            Self::DayOff => process.days_off.iter().map(ToString::to_string).collect(),
        }
    }
}

impl FromStr for FilterField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| FieldError::new(s, "is not a filterable field"))
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact-match filter for listing processes.
///
/// Fields are combined with AND; the values listed for one field are
/// combined with OR. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessFilter {
    predicates: BTreeMap<FilterField, Vec<String>>,
}

impl ProcessFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate. Values for a field already present are appended.
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.predicates.entry(field).or_default().push(value.into());
        self
    }

    /// Build a filter from a raw query map (e.g. URL query parameters).
    ///
    /// Unknown field names and malformed values are rejected; fields with no
    /// values are ignored. Values are stored in their canonical encoding.
    pub fn from_query(query: &HashMap<String, Vec<String>>) -> DomainResult<Self> {
        let mut filter = Self::new();
        let mut errors = Vec::new();
        for (key, values) in query {
            match key.parse::<FilterField>() {
                Ok(field) => {
                    for value in values {
                        match field.canonical_value(value) {
                            Ok(value) => filter = filter.with(field, value),
                            Err(e) => errors.push(e),
                        }
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            Err(DomainError::Validation(errors))
        }
    }

    /// Parse `field=value` pairs, as given on a command line.
    pub fn from_pairs<I, S>(pairs: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut query: HashMap<String, Vec<String>> = HashMap::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                DomainError::validation("filter", format!("'{pair}' is not of the form field=value"))
            })?;
            query
                .entry(key.trim().to_string())
                .or_default()
                .push(value.trim().to_string());
        }
        Self::from_query(&query)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.values().all(Vec::is_empty)
    }

    /// Predicates with at least one value, in field order.
    pub fn predicates(&self) -> impl Iterator<Item = (FilterField, &[String])> {
        self.predicates
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| (*field, values.as_slice()))
    }

    /// Whether `process` satisfies every predicate.
    pub fn matches(&self, process: &Process) -> bool {
        self.predicates().all(|(field, wanted)| {
            field
                .values_of(process)
                .iter()
                .any(|actual| wanted.iter().any(|w| w == actual))
        })
    }
}

/// Persistence contract for processes.
///
/// Implementations store what they are given and never apply business
/// rules; `updated_at` is stamped by the caller. Calls are expected to be
/// bounded by the backend's own timeouts.
#[async_trait]
pub trait ProcessRepository: Send + Sync {
    /// Get a process by id.
    async fn get(&self, id: &str) -> DomainResult<Option<Process>>;

    /// List processes matching `filter`, ordered by id.
    async fn list(&self, filter: &ProcessFilter) -> DomainResult<Vec<Process>>;

    /// Insert a new process. Fails with `ProcessAlreadyExists` if the id is taken.
    async fn create(&self, process: &Process) -> DomainResult<()>;

    /// Replace every field except id and `created_at`. Returns false if no
    /// process has that id.
    async fn update(&self, process: &Process) -> DomainResult<bool>;

    /// Set only the status. Returns false if no process has that id.
    async fn update_status(
        &self,
        id: &str,
        status: ProcessStatus,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Delete a process. Returns false if no process has that id.
    async fn delete(&self, id: &str) -> DomainResult<bool>;

    /// Delete every process, returning how many were removed.
    async fn delete_all(&self) -> DomainResult<u64>;
}
