//! Agent catalog management.

pub mod service;

pub use service::AgentService;
