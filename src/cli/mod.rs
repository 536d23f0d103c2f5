//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

use console::style;
use serde_json::json;

use crate::domain::errors::DomainError;

pub use types::{Cli, Commands};

/// Print `err` and exit with a non-zero status.
///
/// Domain errors are reported with their category; validation failures and
/// eligibility violations list every item.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let domain = err.downcast_ref::<DomainError>();
    let category = domain.map_or("error", DomainError::category);
    let details: Vec<String> = match domain {
        Some(DomainError::Validation(errors)) => errors.iter().map(ToString::to_string).collect(),
        Some(DomainError::Ineligible { violations, .. }) => {
            violations.iter().map(ToString::to_string).collect()
        }
        _ => Vec::new(),
    };

    if json_mode {
        let body = json!({
            "error": {
                "category": category,
                "message": format!("{err:#}"),
                "details": details,
            }
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        let headline = match domain {
            Some(DomainError::Validation(_)) => "Validation failed".to_string(),
            Some(DomainError::Ineligible { id, .. }) => format!("Process {id} is not eligible to run"),
            _ => format!("{err:#}"),
        };
        eprintln!("{} [{category}] {headline}", style("Error:").red().bold());
        for detail in &details {
            eprintln!("  - {detail}");
        }
    }

    std::process::exit(1)
}
