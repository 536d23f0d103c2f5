//! In-memory adapters, for tests and throwaway sessions.

pub mod process_repository;

pub use process_repository::InMemoryProcessRepository;
