mod exact_match;
mod pattern_match;
mod search_strategy;

pub use exact_match::ExactMatch;
pub use pattern_match::PatternMatch;
pub use search_strategy::SearchStrategy;
