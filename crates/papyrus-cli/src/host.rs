//! Terminal implementation of the client host.

use std::time::Duration;

use tracing::debug;

use papyrus_client::host::{ClientHost, Toast, ToastKind};
use papyrus_client::render::{GridView, TreeView};

use crate::output;

/// Prints toasts; views are printed by the commands that ask for them.
#[derive(Debug, Default)]
pub struct TerminalHost;

impl ClientHost for TerminalHost {
    fn toast(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => output::print_success(&toast.message),
            ToastKind::Error => output::print_error(&toast.message),
        }
    }

    fn render_tree(&self, view: &TreeView) {
        debug!(nodes = view.nodes.len(), root = view.root_count, "Tree repainted");
    }

    fn render_agents_grid(&self, view: &GridView) {
        debug!(cards = view.cards.len(), "Grid repainted");
    }

    fn remove_agent_card(&self, agent: &str) {
        debug!(agent, "Card removed");
    }

    fn schedule_reload(&self, delay: Duration) {
        output::print_warning(&format!(
            "La estructura ha cambiado; vuelve a ejecutar el comando en {} s",
            delay.as_secs().max(1)
        ));
    }
}
