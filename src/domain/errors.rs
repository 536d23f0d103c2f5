//! Domain errors for the process monitor.

use thiserror::Error;

use super::models::eligibility::{format_violations, Violation};
use super::models::process_request::FieldError;

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Domain-level errors surfaced by the process service.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Process already exists: {0}")]
    ProcessAlreadyExists(String),

    #[error("Process {id} is not eligible to run: {}", format_violations(.violations))]
    Ineligible { id: String, violations: Vec<Violation> },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Short category name, stable across backends.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::ProcessNotFound(_) => "not_found",
            Self::ProcessAlreadyExists(_) => "conflict",
            Self::Ineligible { .. } => "ineligible",
            Self::Persistence(_) => "persistence",
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
