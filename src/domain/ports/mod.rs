//! Port trait definitions (Hexagonal Architecture)
//!
//! Infrastructure adapters implement these traits so the domain stays
//! independent of any particular storage backend.

pub mod process_repository;

pub use process_repository::{FilterField, ProcessFilter, ProcessRepository};
