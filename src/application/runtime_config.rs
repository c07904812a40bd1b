use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub scenario: PathBuf,
    pub workers: Option<NonZeroUsize>,
    pub show_structure: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            scenario: cli.scenario,
            workers: cli.workers,
            show_structure: cli.structure,
        }
    }
}
