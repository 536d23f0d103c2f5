//! Process Monitor - execution-window tracking for recurring processes
//!
//! A process declares when it may run: a date range, a daily time range and
//! weekdays it is excluded from. The monitor stores processes, tracks whether
//! they are running, and refuses to start one outside its window.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Process models, errors and the persistence port
//! - **Service Layer** (`services`): Eligibility engine and process service
//! - **Adapter Layer** (`adapters`): SQLite and in-memory repositories
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use process_monitor::{InMemoryProcessRepository, ProcessRequest, ProcessService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = ProcessService::new(Arc::new(InMemoryProcessRepository::new()));
//!     let request = ProcessRequest {
//!         id: "nightly".into(),
//!         process_type: "etl".into(),
//!         name: "Nightly load".into(),
//!         ..Default::default()
//!     };
//!     service.create_process(request).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::memory::InMemoryProcessRepository;
pub use adapters::sqlite::SqliteProcessRepository;
pub use domain::models::{
    Config, DatabaseConfig, DayOfWeek, Eligibility, FieldError, LoggingConfig, Process,
    ProcessDate, ProcessRequest, ProcessStatus, ProcessTime, StorageBackend, Violation,
    ViolationKind,
};
pub use domain::ports::{FilterField, ProcessFilter, ProcessRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{can_execute, ProcessService};
