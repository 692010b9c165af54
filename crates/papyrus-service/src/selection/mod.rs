//! Favorite agent selection.

pub mod service;

pub use service::SelectionService;
