//! Breadth-first walks over a folder subtree.

mod traverser;

pub use traverser::traverse;
