//! Service layer: the eligibility engine and the process service built on it.

pub mod eligibility_engine;
pub mod process_service;

pub use eligibility_engine::can_execute;
pub use process_service::ProcessService;
