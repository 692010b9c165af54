//! HTTP request handlers organized by domain.

pub mod agent;
pub mod folder;
pub mod health;
pub mod selection;
pub mod user;
