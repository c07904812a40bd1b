//! In-memory tree of named folders and files.
//!
//! A [`Folder`] owns its children and guards them with its own lock; a [`File`]
//! guards its content the same way. Children never point back at their parent.

mod file;
mod folder;
mod node;

pub use file::File;
pub use folder::{Folder, FolderError};
pub use node::Node;
