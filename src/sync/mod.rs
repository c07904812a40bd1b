//! Synchronization primitives used by the folder tree.
//!
//! Every node of the tree carries its own [`ReaderWriterLock`], there is no lock
//! shared across the whole tree.

mod reader_writer_lock;

pub use reader_writer_lock::{ReadGuard, ReaderWriterLock, WriteGuard};
