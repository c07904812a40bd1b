use std::sync::Arc;

use derive_more::{Display, From, IsVariant};

use super::{File, Folder};

/// A handle to an entry of the tree.
///
/// Cloning a node clones the handle, not the entry: both clones refer to the same
/// file or folder.
#[derive(Debug, Clone, Display, From, IsVariant)]
pub enum Node {
    File(Arc<File>),
    Folder(Arc<Folder>),
}

impl Node {
    pub fn file(name: impl Into<String>) -> Self {
        Node::File(Arc::new(File::new(name)))
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Node::Folder(Arc::new(Folder::new(name)))
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => file.name(),
            Node::Folder(folder) => folder.name(),
        }
    }

    pub fn as_file(&self) -> Option<&Arc<File>> {
        match self {
            Node::File(file) => Some(file),
            Node::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Arc<Folder>> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::File(_) => None,
        }
    }

    /// Identity comparison: true only if both handles point at the same entry.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::File(a), Node::File(b)) => Arc::ptr_eq(a, b),
            (Node::Folder(a), Node::Folder(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
