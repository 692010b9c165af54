//! # papyrus-entity
//!
//! Domain entity models for Papyrus. Every struct in this crate is either
//! a database row (deriving `sqlx::FromRow`) or a value object that travels
//! over the wire between the folder store and its clients.

pub mod favorite;
pub mod folder;
pub mod history;
pub mod onboarding;
pub mod user;
