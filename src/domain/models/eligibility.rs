//! Eligibility outcome types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The rule a process broke when checked against an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    AlreadyRunning,
    ExcludedDay,
    TooEarlyDate,
    TooLateDate,
    TooEarlyTime,
    TooLateTime,
}

impl ViolationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "already running",
            Self::ExcludedDay => "excluded day",
            Self::TooEarlyDate => "too early (date)",
            Self::TooLateDate => "too late (date)",
            Self::TooEarlyTime => "too early (time)",
            Self::TooLateTime => "too late (time)",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured reason a process may not start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    /// The configured bound or excluded day that was hit.
    pub limit: Option<String>,
    /// The observed value from the instant being checked.
    pub actual: Option<String>,
}

impl Violation {
    pub fn new(kind: ViolationKind) -> Self {
        Self {
            kind,
            message: kind.as_str().to_string(),
            limit: None,
            actual: None,
        }
    }

    pub fn bounded(kind: ViolationKind, limit: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self {
            limit: Some(limit.to_string()),
            actual: Some(actual.to_string()),
            ..Self::new(kind)
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.limit, &self.actual) {
            (Some(limit), Some(actual)) => {
                write!(f, "{} (limit {limit}, got {actual})", self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}

/// Result of an eligibility evaluation: eligible iff there are no violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub violations: Vec<Violation>,
}

impl Eligibility {
    pub fn eligible() -> Self {
        Self::default()
    }

    pub fn is_eligible(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn kinds(&self) -> Vec<ViolationKind> {
        self.violations.iter().map(|v| v.kind).collect()
    }

    pub(crate) fn record(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

/// Render a violation list on one line.
pub fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
