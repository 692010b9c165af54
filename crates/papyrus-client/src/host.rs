//! The seam between the controller and whatever displays its state.

use std::time::Duration;

use crate::render::{GridView, TreeView};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Confirmation.
    Success,
    /// Failure.
    Error,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Text shown to the user.
    pub message: String,
    /// Severity.
    pub kind: ToastKind,
    /// How long the toast stays visible.
    pub ttl: Duration,
}

/// Display surface driven by the controller.
pub trait ClientHost: Send + Sync {
    /// Show a transient notification.
    fn toast(&self, toast: Toast);

    /// Paint the folder tree.
    fn render_tree(&self, view: &TreeView);

    /// Paint the agent grid.
    fn render_agents_grid(&self, view: &GridView);

    /// Drop an agent card right away, ahead of the next grid paint.
    fn remove_agent_card(&self, agent: &str);

    /// Reload everything after `delay`.
    fn schedule_reload(&self, delay: Duration);
}
