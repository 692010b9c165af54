//! Core type definitions used across the Papyrus workspace.

pub mod id;

pub use id::*;
