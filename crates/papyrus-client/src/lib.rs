//! # papyrus-client
//!
//! Client side of the Papyrus folder store.
//!
//! - [`remote`]: the `RemoteFolderStore` seam and its reqwest implementation
//! - [`state`]: the local mirror and its pure transitions
//! - [`favorites`]: favorites set, propagation and cascades
//! - [`controller`]: optimistic mutations with single-flight and rollback
//! - [`render`]: tree and grid views for a [`host::ClientHost`]
//! - [`onboarding`]: the company-profile decision tree

pub mod cache;
pub mod controller;
pub mod drag;
pub mod error;
pub mod favorites;
pub mod host;
pub mod onboarding;
pub mod remote;
pub mod render;
pub mod state;

pub use controller::{ControllerSettings, FolderController, Outcome};
pub use drag::DragPayload;
pub use error::{RemoteError, RemoteResult};
pub use host::{ClientHost, Toast, ToastKind};
pub use remote::{HttpFolderStore, RemoteFolderStore};
pub use state::ClientState;

#[cfg(test)]
mod testing;
