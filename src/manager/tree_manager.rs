use std::sync::Arc;

use snafu::ResultExt;
use tracing::{debug, warn};

use super::file_system_manager::SourceVanishedSnafu;
use super::{FileSystemManager, MoveError};
use crate::search::{ExactMatch, PatternMatch, SearchStrategy};
use crate::traversal::traverse;
use crate::tree::{File, Folder, Node};

/// [`FileSystemManager`] over a tree owned by this instance.
///
/// There is no global lock: each operation locks at most one folder at a time, so work
/// in unrelated subtrees proceeds in parallel.
#[derive(Debug)]
pub struct TreeManager {
    root: Arc<Folder>,
}

impl TreeManager {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: Arc::new(Folder::new(root_name)),
        }
    }

    pub fn root(&self) -> &Arc<Folder> {
        &self.root
    }

    fn find_folder(&self, name: &str) -> Option<Arc<Folder>> {
        if self.root.name() == name {
            return Some(self.root.clone());
        }
        traverse(&self.root, |node| {
            node.as_folder()
                .filter(|folder| folder.name() == name)
                .cloned()
        })
    }

    /// Breadth-first search for an entry called `name`, returned with the folder it was
    /// found in.
    fn find_with_parent(&self, name: &str) -> Option<(Arc<Folder>, Node)> {
        if let Some(item) = self.root.get_item(name) {
            return Some((self.root.clone(), item));
        }
        traverse(&self.root, |node| {
            let folder = node.as_folder()?;
            folder.get_item(name).map(|item| (folder.clone(), item))
        })
    }

    fn find_file(&self, name: &str) -> Option<Arc<File>> {
        traverse(&self.root, |node| {
            node.as_file().filter(|file| file.name() == name).cloned()
        })
    }

    fn render(folder: &Folder, depth: usize, lines: &mut Vec<String>) {
        lines.push(format!("{:indent$}+ {}", "", folder.name(), indent = depth * 2));
        for item in folder.items() {
            match item {
                Node::Folder(child) => Self::render(&child, depth + 1, lines),
                Node::File(file) => lines.push(format!(
                    "{:indent$}- {}",
                    "",
                    file.name(),
                    indent = (depth + 1) * 2
                )),
            }
        }
    }
}

/// Whether moving `item` into `destination` would place a folder inside itself.
///
/// The check and the move are not atomic: two concurrent moves that swap a pair of
/// folders into each other (P into Q while Q goes into P) can both pass it.
fn lands_in_own_subtree(item: &Node, destination: &Arc<Folder>) -> bool {
    let Node::Folder(moved) = item else {
        return false;
    };
    Arc::ptr_eq(moved, destination)
        || traverse(moved, |node| {
            node.as_folder()
                .filter(|folder| Arc::ptr_eq(folder, destination))
                .map(|_| ())
        })
        .is_some()
}

impl FileSystemManager for TreeManager {
    fn add_file_or_folder(&self, parent_name: &str, name: &str, is_folder: bool) -> bool {
        let Some(parent) = self.find_folder(parent_name) else {
            debug!("Cannot add '{}': folder '{}' not found", name, parent_name);
            return false;
        };

        let node = if is_folder {
            Node::folder(name)
        } else {
            Node::file(name)
        };
        if parent.add_item(node) {
            debug!("Added '{}' to '{}'", name, parent_name);
        }
        true
    }

    fn move_file_or_folder(
        &self,
        source_name: &str,
        destination_name: &str,
    ) -> Result<bool, MoveError> {
        let Some(destination) = self.find_folder(destination_name) else {
            debug!(
                "Cannot move '{}': destination '{}' not found",
                source_name, destination_name
            );
            return Ok(false);
        };
        let Some((parent, item)) = self.find_with_parent(source_name) else {
            debug!("Cannot move '{}': no such entry", source_name);
            return Ok(false);
        };

        if lands_in_own_subtree(&item, &destination) {
            warn!(
                "Cannot move folder '{}' into its own subtree ('{}')",
                source_name, destination_name
            );
            return Ok(false);
        }

        parent
            .remove_item(&item)
            .inspect_err(|_| {
                warn!(
                    "'{}' was removed from '{}' by a concurrent operation",
                    source_name,
                    parent.name()
                )
            })
            .context(SourceVanishedSnafu { name: source_name })?;

        if !destination.add_item(item) {
            // Same outcome as adding a duplicate: the destination keeps its entry.
            warn!(
                "'{}' already holds an entry named '{}', the moved entry was dropped",
                destination_name, source_name
            );
        }
        debug!(
            "Moved '{}' from '{}' to '{}'",
            source_name,
            parent.name(),
            destination_name
        );
        Ok(true)
    }

    fn list_contents(&self, folder_name: &str) -> Vec<String> {
        self.find_folder(folder_name)
            .map(|folder| {
                folder
                    .items()
                    .iter()
                    .map(|node| node.name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn list_directory_structure(&self) -> Vec<String> {
        let mut lines = Vec::new();
        Self::render(&self.root, 0, &mut lines);
        lines
    }

    fn search_file_exact_match(&self, folder_name: &str, file_name: &str) -> Option<String> {
        let folder = self.find_folder(folder_name)?;
        ExactMatch.search(&folder, file_name).into_iter().next()
    }

    fn search_file_like_match(&self, folder_name: &str, pattern: &str) -> Vec<String> {
        self.find_folder(folder_name)
            .map(|folder| PatternMatch.search(&folder, pattern))
            .unwrap_or_default()
    }

    fn read_file_content(&self, file_name: &str) -> Option<Vec<u8>> {
        self.find_file(file_name).map(|file| file.content())
    }

    fn write_file_content(&self, file_name: &str, content: &[u8]) -> bool {
        match self.find_file(file_name) {
            Some(file) => {
                file.set_content(content);
                true
            }
            None => {
                debug!("Cannot write '{}': no such file", file_name);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use rstest::*;

    use super::*;

    #[fixture]
    fn manager() -> TreeManager {
        TreeManager::new("root")
    }

    /// root -> folder1 -> {file1.txt, file2.jpg, subfolder -> file3.txt}
    #[fixture]
    fn populated(manager: TreeManager) -> TreeManager {
        assert!(manager.add_file_or_folder("root", "folder1", true));
        assert!(manager.add_file_or_folder("folder1", "file1.txt", false));
        assert!(manager.add_file_or_folder("folder1", "file2.jpg", false));
        assert!(manager.add_file_or_folder("folder1", "subfolder", true));
        assert!(manager.add_file_or_folder("subfolder", "file3.txt", false));
        manager
    }

    #[rstest]
    fn add_file_to_existing_folder(manager: TreeManager) {
        manager.add_file_or_folder("root", "folder1", true);
        manager.add_file_or_folder("folder1", "file1.txt", false);

        assert_eq!(manager.list_contents("folder1"), vec!["file1.txt"]);
    }

    #[rstest]
    fn add_to_missing_parent_fails(manager: TreeManager) {
        assert!(!manager.add_file_or_folder("nonExistentFolder", "file1.txt", false));
        assert!(manager.list_contents("root").is_empty());
    }

    #[rstest]
    fn duplicate_add_reports_success_but_keeps_one_entry(manager: TreeManager) {
        manager.add_file_or_folder("root", "folder1", true);
        assert!(manager.add_file_or_folder("folder1", "file1.txt", false));
        assert!(manager.add_file_or_folder("folder1", "file1.txt", false));
        assert!(manager.add_file_or_folder("folder1", "file1.txt", true));

        let contents = manager.list_contents("folder1");
        assert_eq!(contents.iter().filter(|name| *name == "file1.txt").count(), 1);
    }

    #[rstest]
    fn list_contents_keeps_insertion_order(manager: TreeManager) {
        for name in ["c", "a", "b"] {
            manager.add_file_or_folder("root", name, false);
        }
        assert_eq!(manager.list_contents("root"), vec!["c", "a", "b"]);
    }

    #[rstest]
    #[case("non_existent_folder")]
    #[case("")]
    #[case("ROOT")]
    fn list_contents_of_missing_folder_is_empty(manager: TreeManager, #[case] folder: &str) {
        manager.add_file_or_folder("root", "file.txt", false);
        assert!(manager.list_contents(folder).is_empty());
    }

    #[rstest]
    fn list_contents_of_a_file_is_empty(manager: TreeManager) {
        manager.add_file_or_folder("root", "file.txt", false);
        assert!(manager.list_contents("file.txt").is_empty());
    }

    #[rstest]
    fn special_characters_in_names(manager: TreeManager) {
        manager.add_file_or_folder("root", "folder$#@!", true);
        manager.add_file_or_folder("folder$#@!", "file%^&.txt", false);

        assert_eq!(manager.list_contents("folder$#@!"), vec!["file%^&.txt"]);
    }

    #[rstest]
    fn move_folder_up(manager: TreeManager) {
        manager.add_file_or_folder("root", "folder1", true);
        manager.add_file_or_folder("folder1", "folder2", true);

        assert!(manager.move_file_or_folder("folder2", "root").expect("move"));

        assert!(manager.list_contents("root").contains(&"folder2".to_string()));
        assert!(!manager.list_contents("folder1").contains(&"folder2".to_string()));
    }

    #[rstest]
    fn move_file_between_folders(manager: TreeManager) {
        manager.add_file_or_folder("root", "folder1", true);
        manager.add_file_or_folder("root", "folder2", true);
        manager.add_file_or_folder("folder1", "file1.txt", false);
        manager.write_file_content("file1.txt", b"payload");

        assert!(manager.move_file_or_folder("file1.txt", "folder2").expect("move"));

        assert!(manager.list_contents("folder1").is_empty());
        assert_eq!(manager.list_contents("folder2"), vec!["file1.txt"]);
        assert_eq!(
            manager.read_file_content("file1.txt").as_deref(),
            Some(&b"payload"[..])
        );
    }

    #[rstest]
    fn move_carries_the_whole_subtree(populated: TreeManager) {
        populated.add_file_or_folder("root", "archive", true);

        assert!(populated.move_file_or_folder("folder1", "archive").expect("move"));

        assert_eq!(populated.list_contents("archive"), vec!["folder1"]);
        assert_eq!(populated.list_contents("subfolder"), vec!["file3.txt"]);
    }

    #[rstest]
    fn move_to_missing_destination_fails(manager: TreeManager) {
        manager.add_file_or_folder("root", "file1.txt", false);

        assert!(!manager
            .move_file_or_folder("file1.txt", "nonExistentFolder")
            .expect("lookup failures are not errors"));
        assert_eq!(manager.list_contents("root"), vec!["file1.txt"]);
    }

    #[rstest]
    fn move_missing_source_fails(manager: TreeManager) {
        manager.add_file_or_folder("root", "folder1", true);

        assert!(!manager
            .move_file_or_folder("nonExistentFile", "folder1")
            .expect("lookup failures are not errors"));
        assert!(manager.list_contents("folder1").is_empty());
    }

    #[rstest]
    fn move_within_same_folder_goes_to_the_end(manager: TreeManager) {
        for name in ["a", "b", "c"] {
            manager.add_file_or_folder("root", name, false);
        }

        assert!(manager.move_file_or_folder("a", "root").expect("move"));
        assert_eq!(manager.list_contents("root"), vec!["b", "c", "a"]);
    }

    #[rstest]
    fn move_onto_existing_name_drops_the_moved_entry(manager: TreeManager) {
        manager.add_file_or_folder("root", "left", true);
        manager.add_file_or_folder("root", "right", true);
        manager.add_file_or_folder("left", "same.txt", false);
        manager.add_file_or_folder("right", "same.txt", false);
        manager.write_file_content("same.txt", b"left copy");

        assert!(manager.move_file_or_folder("same.txt", "right").expect("move"));

        assert!(manager.list_contents("left").is_empty());
        assert_eq!(manager.list_contents("right"), vec!["same.txt"]);
        assert_eq!(
            manager.read_file_content("same.txt").as_deref(),
            Some(&b""[..])
        );
    }

    #[rstest]
    #[case("outer", "outer")]
    #[case("outer", "inner")]
    #[case("outer", "innermost")]
    fn move_into_own_subtree_is_rejected(
        manager: TreeManager,
        #[case] source: &str,
        #[case] destination: &str,
    ) {
        manager.add_file_or_folder("root", "outer", true);
        manager.add_file_or_folder("outer", "inner", true);
        manager.add_file_or_folder("inner", "innermost", true);
        let before = manager.list_directory_structure();

        let result = manager.move_file_or_folder(source, destination);

        assert!(matches!(result, Ok(false)));
        assert_eq!(manager.list_directory_structure(), before);
    }

    #[rstest]
    fn directory_structure_of_small_tree(manager: TreeManager) {
        manager.add_file_or_folder("root", "folder1", true);
        manager.add_file_or_folder("folder1", "file1.txt", false);

        assert_eq!(
            manager.list_directory_structure(),
            vec!["+ root", "  + folder1", "    - file1.txt"]
        );
    }

    #[rstest]
    fn directory_structure_interleaves_in_stored_order(manager: TreeManager) {
        manager.add_file_or_folder("root", "f1", false);
        manager.add_file_or_folder("root", "A", true);
        manager.add_file_or_folder("A", "x", false);
        manager.add_file_or_folder("A", "B", true);
        manager.add_file_or_folder("B", "y", false);
        manager.add_file_or_folder("root", "f2", false);

        assert_eq!(
            manager.list_directory_structure(),
            vec![
                "+ root",
                "  - f1",
                "  + A",
                "    - x",
                "    + B",
                "      - y",
                "  - f2",
            ]
        );
    }

    #[rstest]
    fn directory_structure_of_empty_tree(manager: TreeManager) {
        assert_eq!(manager.list_directory_structure(), vec!["+ root"]);
    }

    #[rstest]
    fn exact_search(populated: TreeManager) {
        assert_eq!(
            populated.search_file_exact_match("folder1", "file1.txt"),
            Some("file1.txt".to_string())
        );
        assert_eq!(
            populated.search_file_exact_match("root", "file3.txt"),
            Some("file3.txt".to_string())
        );
        assert_eq!(populated.search_file_exact_match("root", "FILE1.TXT"), None);
        assert_eq!(populated.search_file_exact_match("root", "subfolder"), None);
        assert_eq!(
            populated.search_file_exact_match("non_existent_folder", "file1.txt"),
            None
        );
    }

    #[rstest]
    fn like_search_spans_the_subtree(populated: TreeManager) {
        let mut results = populated.search_file_like_match("root", ".txt");
        results.sort();
        assert_eq!(results, vec!["file1.txt", "file3.txt"]);
    }

    #[rstest]
    fn like_search_without_matches(populated: TreeManager) {
        assert!(populated.search_file_like_match("folder1", "pattern").is_empty());
        assert!(populated.search_file_like_match("missing", "txt").is_empty());
    }

    #[test]
    fn search_case_sensitivity() {
        let manager = TreeManager::new("Root");
        manager.add_file_or_folder("Root", "Folder1", true);
        manager.add_file_or_folder("Folder1", "file1.txt", false);
        manager.add_file_or_folder("Folder1", "File2.TXT", false);
        manager.add_file_or_folder("Folder1", "FOLDER2", true);

        assert_eq!(
            manager.search_file_exact_match("Folder1", "file1.txt"),
            Some("file1.txt".to_string())
        );
        let like = manager.search_file_like_match("Folder1", "file");
        assert!(like.contains(&"file1.txt".to_string()));
        assert!(like.contains(&"File2.TXT".to_string()));
        assert!(!like.contains(&"FOLDER2".to_string()));
    }

    #[rstest]
    fn file_content_round_trip(populated: TreeManager) {
        assert_eq!(populated.read_file_content("file3.txt"), Some(Vec::new()));
        assert!(populated.write_file_content("file3.txt", b"hello"));
        assert_eq!(populated.read_file_content("file3.txt"), Some(b"hello".to_vec()));

        assert!(!populated.write_file_content("subfolder", b"nope"));
        assert_eq!(populated.read_file_content("missing.txt"), None);
    }

    #[rstest]
    fn large_number_of_folders(manager: TreeManager) {
        for i in 0..1000 {
            manager.add_file_or_folder("root", &format!("folder{i}"), true);
            manager.add_file_or_folder(&format!("folder{i}"), &format!("file{i}.txt"), false);
        }

        assert_eq!(manager.list_contents("folder500"), vec!["file500.txt"]);
        assert_eq!(manager.list_contents("root").len(), 1000);
    }

    #[test]
    fn concurrent_distinct_adds_are_all_kept() {
        const THREADS: usize = 16;
        let manager = Arc::new(TreeManager::new("root"));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let manager = manager.clone();
                thread::spawn(move || {
                    let folder = format!("folder_{i}");
                    assert!(manager.add_file_or_folder("root", &folder, true));
                    assert!(manager.add_file_or_folder(&folder, "file.txt", false));
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread panicked");
        }

        let mut contents = manager.list_contents("root");
        contents.sort();
        contents.dedup();
        assert_eq!(contents.len(), THREADS);
        for i in 0..THREADS {
            assert_eq!(manager.list_contents(&format!("folder_{i}")), vec!["file.txt"]);
        }
    }

    #[test]
    fn concurrent_readers_see_stable_contents() {
        let manager = Arc::new(TreeManager::new("root"));
        manager.add_file_or_folder("root", "test_file.txt", false);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let manager = manager.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        assert_eq!(manager.list_contents("root"), vec!["test_file.txt"]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("reader thread panicked");
        }
    }

    #[test]
    fn readers_and_writers_interleave() {
        let manager = Arc::new(TreeManager::new("root"));

        let readers: Vec<_> = (0..5)
            .map(|_| {
                let manager = manager.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let contents = manager.list_contents("root");
                        let mut unique = contents.clone();
                        unique.sort();
                        unique.dedup();
                        assert_eq!(unique.len(), contents.len());
                    }
                })
            })
            .collect();
        let writers: Vec<_> = (0..3)
            .map(|_| {
                let manager = manager.clone();
                thread::spawn(move || {
                    for i in 0..5 {
                        manager.add_file_or_folder("root", &format!("file_{i}.txt"), false);
                    }
                })
            })
            .collect();

        for handle in readers.into_iter().chain(writers) {
            handle.join().expect("worker thread panicked");
        }

        let contents = manager.list_contents("root");
        assert_eq!(contents.len(), 5);
        for i in 0..5 {
            assert!(contents.contains(&format!("file_{i}.txt")));
        }
    }

    #[test]
    fn concurrent_moves_of_distinct_files() {
        let manager = Arc::new(TreeManager::new("root"));
        for i in 0..5 {
            manager.add_file_or_folder("root", &format!("source_folder_{i}"), true);
            manager.add_file_or_folder("root", &format!("dest_folder_{i}"), true);
            manager.add_file_or_folder(
                &format!("source_folder_{i}"),
                &format!("file_{i}.txt"),
                false,
            );
        }

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let manager = manager.clone();
                thread::spawn(move || {
                    manager.move_file_or_folder(
                        &format!("file_{i}.txt"),
                        &format!("dest_folder_{i}"),
                    )
                })
            })
            .collect();
        for handle in handles {
            let moved = handle.join().expect("mover thread panicked");
            assert!(matches!(moved, Ok(true)));
        }

        for i in 0..5 {
            assert!(manager.list_contents(&format!("source_folder_{i}")).is_empty());
            assert_eq!(
                manager.list_contents(&format!("dest_folder_{i}")),
                vec![format!("file_{i}.txt")]
            );
        }
    }

    #[test]
    fn racing_moves_of_one_entry_keep_exactly_one_copy() {
        const THREADS: usize = 8;
        let manager = Arc::new(TreeManager::new("root"));
        manager.add_file_or_folder("root", "origin", true);
        manager.add_file_or_folder("origin", "contested.txt", false);
        for i in 0..THREADS {
            manager.add_file_or_folder("root", &format!("dest_{i}"), true);
        }

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let manager = manager.clone();
                thread::spawn(move || {
                    manager.move_file_or_folder("contested.txt", &format!("dest_{i}"))
                })
            })
            .collect();
        for handle in handles {
            let outcome = handle.join().expect("mover thread panicked");
            assert!(matches!(
                outcome,
                Ok(_) | Err(MoveError::SourceVanished { .. })
            ));
        }

        assert_eq!(ExactMatch.search(manager.root(), "contested.txt").len(), 1);
        assert!(manager.list_contents("origin").is_empty());
    }

    #[test]
    fn random_mix_of_operations_never_panics() {
        let manager = Arc::new(TreeManager::new("root"));

        let handles: Vec<_> = (0..20)
            .map(|thread_idx| {
                let manager = manager.clone();
                thread::spawn(move || {
                    for step in 0..25usize {
                        match (thread_idx + step) % 3 {
                            0 => {
                                manager.list_contents("root");
                            }
                            1 => {
                                let name = format!("file_{}.txt", (thread_idx * 31 + step) % 40);
                                manager.add_file_or_folder("root", &name, false);
                            }
                            _ => {
                                let contents = manager.list_contents("root");
                                if let Some(name) = contents.get(step % contents.len().max(1)) {
                                    let _ = manager.move_file_or_folder(name, "root");
                                }
                            }
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        let mut contents = manager.list_contents("root");
        let total = contents.len();
        contents.sort();
        contents.dedup();
        assert_eq!(contents.len(), total);
    }
}
