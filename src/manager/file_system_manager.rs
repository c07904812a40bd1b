use snafu::Snafu;

use crate::tree::FolderError;

/// The operations a virtual filesystem exposes to its embedder.
///
/// Every lookup is by bare name: folder names are resolved by walking the whole tree
/// breadth-first from the root, and the first folder with a matching name wins.
/// Lookups that find nothing report it through the return value (`false`, `None` or an
/// empty list), never through an error.
pub trait FileSystemManager {
    /// Creates a file or folder called `name` inside the folder `parent_name`.
    ///
    /// Returns `false` only when the parent cannot be found. Adding a name that already
    /// exists under the parent leaves the existing entry in place and still returns
    /// `true`.
    fn add_file_or_folder(&self, parent_name: &str, name: &str, is_folder: bool) -> bool;

    /// Moves the entry called `source_name` into the folder `destination_name`.
    ///
    /// Returns `Ok(false)` when the destination or the source cannot be found, or when
    /// the source is a folder and the destination is that folder or lies below it. The
    /// removal from the old parent and the insertion into the destination are two
    /// separate steps: concurrent observers may briefly see the entry in neither place,
    /// and a concurrent move of the same entry can make the removal fail, which is
    /// reported as [`MoveError::SourceVanished`].
    fn move_file_or_folder(
        &self,
        source_name: &str,
        destination_name: &str,
    ) -> Result<bool, MoveError>;

    /// Names of the direct children of `folder_name`, in insertion order.
    fn list_contents(&self, folder_name: &str) -> Vec<String>;

    /// Indented pre-order rendering of the whole tree.
    ///
    /// A folder at depth `d` renders as `2*d` spaces followed by `+ name`; a file inside
    /// it as `2*(d+1)` spaces followed by `- name`. The root sits at depth 0.
    fn list_directory_structure(&self) -> Vec<String>;

    /// First file called exactly `file_name` (case-sensitive) below `folder_name`.
    fn search_file_exact_match(&self, folder_name: &str, file_name: &str) -> Option<String>;

    /// Every file below `folder_name` whose name contains `pattern`, ignoring case.
    fn search_file_like_match(&self, folder_name: &str, pattern: &str) -> Vec<String>;

    /// Content of the first file called `file_name` in the tree.
    fn read_file_content(&self, file_name: &str) -> Option<Vec<u8>>;

    /// Replaces the content of the first file called `file_name` in the tree. Returns
    /// `false` if there is no such file.
    fn write_file_content(&self, file_name: &str, content: &[u8]) -> bool;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum MoveError {
    #[snafu(display("'{}' disappeared from its folder before it could be moved", name))]
    SourceVanished { name: String, source: FolderError },
}
