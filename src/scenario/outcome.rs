use std::fmt;

/// What a [`Step`](super::Step) produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(bool),
    Moved(bool),
    MoveFailed(String),
    Listing(Vec<String>),
    Structure(Vec<String>),
    Found(Option<String>),
    Matches(Vec<String>),
    Content(Option<Vec<u8>>),
    Written(bool),
    Parallel(Vec<Outcome>),
}

impl Outcome {
    /// False when the operation could not find its target or failed outright.
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Added(done) | Outcome::Moved(done) | Outcome::Written(done) => *done,
            Outcome::MoveFailed(_) => false,
            Outcome::Found(found) => found.is_some(),
            Outcome::Content(content) => content.is_some(),
            Outcome::Listing(_) | Outcome::Structure(_) | Outcome::Matches(_) => true,
            Outcome::Parallel(outcomes) => outcomes.iter().all(Outcome::is_success),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Added(true) => write!(f, "added"),
            Outcome::Added(false) => write!(f, "parent not found"),
            Outcome::Moved(true) => write!(f, "moved"),
            Outcome::Moved(false) => write!(f, "source or destination not found"),
            Outcome::MoveFailed(reason) => write!(f, "failed: {reason}"),
            Outcome::Listing(names) | Outcome::Matches(names) => {
                write!(f, "[{}]", names.join(", "))
            }
            Outcome::Structure(lines) => {
                for line in lines {
                    write!(f, "\n{line}")?;
                }
                Ok(())
            }
            Outcome::Found(Some(name)) => write!(f, "{name}"),
            Outcome::Found(None) | Outcome::Content(None) => write!(f, "not found"),
            Outcome::Content(Some(bytes)) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Outcome::Written(true) => write!(f, "written"),
            Outcome::Written(false) => write!(f, "file not found"),
            Outcome::Parallel(outcomes) => write!(f, "{} steps", outcomes.len()),
        }
    }
}
