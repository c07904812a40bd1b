use derive_more::Display;
use hashlink::LinkedHashMap;
use snafu::Snafu;
use tracing::debug;

use super::Node;
use crate::sync::ReaderWriterLock;

/// A folder owning an ordered set of uniquely named children.
///
/// Children keep their insertion order. Every method takes this folder's own lock and
/// no other, so operations on unrelated folders never contend.
#[derive(Debug, Display)]
#[display("{name}")]
pub struct Folder {
    name: String,
    items: ReaderWriterLock<LinkedHashMap<String, Node>>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: ReaderWriterLock::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the children in insertion order.
    ///
    /// The returned vector is detached from the folder: later additions or removals do
    /// not show up in it.
    pub fn items(&self) -> Vec<Node> {
        self.items.read().values().cloned().collect()
    }

    /// Appends `node` unless a child with the same name already exists, in which case
    /// the folder is left untouched. Returns whether the node was inserted.
    pub fn add_item(&self, node: Node) -> bool {
        let mut items = self.items.write();
        if items.contains_key(node.name()) {
            debug!(
                "'{}' already contains '{}', keeping the existing entry",
                self.name,
                node.name()
            );
            return false;
        }
        items.insert(node.name().to_owned(), node);
        true
    }

    /// Removes exactly this node (by identity, not by name).
    pub fn remove_item(&self, node: &Node) -> Result<(), FolderError> {
        let mut items = self.items.write();
        match items.get(node.name()) {
            Some(existing) if existing.ptr_eq(node) => {
                items.remove(node.name());
                Ok(())
            }
            _ => ItemNotFoundSnafu {
                folder: self.name.as_str(),
                name: node.name(),
            }
            .fail(),
        }
    }

    pub fn get_item(&self, name: &str) -> Option<Node> {
        self.items.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[derive(Debug, Snafu)]
pub enum FolderError {
    #[snafu(display("'{}' is not a child of folder '{}'", name, folder))]
    ItemNotFound { folder: String, name: String },
}
