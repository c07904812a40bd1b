mod file_system_manager;
mod tree_manager;

pub use file_system_manager::{FileSystemManager, MoveError};
pub use tree_manager::TreeManager;
