pub mod config;
pub mod eligibility;
pub mod process;
pub mod process_request;

pub use config::{Config, DatabaseConfig, LoggingConfig, StorageBackend};
pub use eligibility::{Eligibility, Violation, ViolationKind};
pub use process::{DayOfWeek, Process, ProcessDate, ProcessStatus, ProcessTime};
pub use process_request::{FieldError, ProcessRequest};
