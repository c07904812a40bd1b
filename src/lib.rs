//! An in-memory tree of named folders and files for exercising concurrent mutation,
//! traversal and search without touching real storage.
//!
//! Each folder guards its children with its own [`sync::ReaderWriterLock`]; no operation
//! ever holds two folder locks at once and there is no tree-wide lock. Entries are
//! looked up by bare name, never by path.
//!
//! ```
//! use vfolder::{FileSystemManager, TreeManager};
//!
//! let manager = TreeManager::new("root");
//! manager.add_file_or_folder("root", "folder1", true);
//! manager.add_file_or_folder("folder1", "file1.txt", false);
//!
//! assert_eq!(manager.list_contents("folder1"), vec!["file1.txt"]);
//! assert_eq!(
//!     manager.list_directory_structure(),
//!     vec!["+ root", "  + folder1", "    - file1.txt"]
//! );
//! ```

pub mod executor;
pub mod manager;
pub mod scenario;
pub mod search;
pub mod sync;
pub mod traversal;
pub mod tree;

pub use manager::{FileSystemManager, MoveError, TreeManager};
