use std::collections::VecDeque;
use std::sync::Arc;

use crate::tree::{Folder, Node};

/// Visits every node below `start` in breadth-first order and returns the first value
/// `predicate` produces.
///
/// `start` itself is not visited, only its descendants. Each folder's children come from
/// that folder's own snapshot and no lock is held while `predicate` runs, so the
/// predicate may freely call back into the tree. Folders changed after their snapshot
/// was taken may be seen in either state.
pub fn traverse<T>(start: &Folder, mut predicate: impl FnMut(&Node) -> Option<T>) -> Option<T> {
    let mut pending: VecDeque<Arc<Folder>> = VecDeque::new();
    let mut level = start.items();

    loop {
        for node in level {
            if let Some(found) = predicate(&node) {
                return Some(found);
            }
            if let Node::Folder(folder) = node {
                pending.push_back(folder);
            }
        }

        match pending.pop_front() {
            Some(folder) => level = folder.items(),
            None => return None,
        }
    }
}
