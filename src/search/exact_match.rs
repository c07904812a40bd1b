use super::SearchStrategy;
use crate::tree::File;

/// Case-sensitive whole-name match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl SearchStrategy for ExactMatch {
    fn matches(&self, file: &File, criteria: &str) -> bool {
        file.name() == criteria
    }
}
