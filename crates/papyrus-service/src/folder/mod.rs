//! Folder structure operations.

pub mod service;

pub use service::{CreateFolderRequest, FolderContext, FolderService};
