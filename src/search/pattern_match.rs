use super::SearchStrategy;
use crate::tree::File;

/// Case-insensitive substring match.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatch;

impl SearchStrategy for PatternMatch {
    fn matches(&self, file: &File, criteria: &str) -> bool {
        file.name()
            .to_lowercase()
            .contains(&criteria.to_lowercase())
    }
}
