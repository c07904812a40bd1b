use crate::traversal::traverse;
use crate::tree::{File, Folder, Node};

/// A rule for matching file names below a folder.
///
/// Only files are candidates. Folders are walked into but never reported.
pub trait SearchStrategy {
    fn matches(&self, file: &File, criteria: &str) -> bool;

    /// Names of every matching file in breadth-first order.
    fn search(&self, folder: &Folder, criteria: &str) -> Vec<String> {
        let mut found = Vec::new();
        traverse(folder, |node| {
            if let Node::File(file) = node {
                if self.matches(file, criteria) {
                    found.push(file.name().to_string());
                }
            }
            None::<()>
        });
        found
    }
}
