//! Domain layer for the process monitor
//!
//! This module contains core business types, errors and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
