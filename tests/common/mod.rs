//! Common test utilities for integration tests
//!
//! Shared fixtures used across the integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use process_monitor::adapters::sqlite::create_migrated_test_pool;
use process_monitor::{
    InMemoryProcessRepository, ProcessRepository, ProcessRequest, ProcessService,
    SqliteProcessRepository,
};

/// Local wall-clock instant built from calendar parts.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

/// 06-01-2025 is a Monday.
pub fn monday_noon() -> NaiveDateTime {
    at(2025, 1, 6, 12, 0)
}

/// Minimal valid request.
pub fn request(id: &str, process_type: &str) -> ProcessRequest {
    ProcessRequest {
        id: id.to_string(),
        process_type: process_type.to_string(),
        name: format!("Process {id}"),
        ..ProcessRequest::default()
    }
}

/// Fresh SQLite repository over a migrated in-memory database.
pub async fn sqlite_repository() -> Arc<SqliteProcessRepository> {
    let pool = create_migrated_test_pool()
        .await
        .expect("failed to create test pool");
    Arc::new(SqliteProcessRepository::new(pool))
}

/// Both backends, for tests that must hold for any adapter.
pub async fn all_repositories() -> Vec<(&'static str, Arc<dyn ProcessRepository>)> {
    vec![
        ("sqlite", sqlite_repository().await as Arc<dyn ProcessRepository>),
        ("memory", Arc::new(InMemoryProcessRepository::new()) as Arc<dyn ProcessRepository>),
    ]
}

pub fn service_over(repo: Arc<dyn ProcessRepository>) -> ProcessService<dyn ProcessRepository> {
    ProcessService::new(repo)
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
