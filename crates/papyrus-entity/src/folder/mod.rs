//! Folder entities: the folder node, the versioned workspace structure and
//! the derived per-folder agent counts.

pub mod counts;
pub mod model;
pub mod structure;

pub use counts::FolderCounts;
pub use model::{Folder, FolderId};
pub use structure::{AgentCatalog, FolderStructure};
