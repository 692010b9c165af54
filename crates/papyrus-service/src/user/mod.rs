//! Account lookup, registration and onboarding.

pub mod service;

pub use service::UserService;
