use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use super::LogLevel;

/// Runs a YAML scenario of folder and file operations against an in-memory tree.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Path to the scenario file
    pub scenario: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Worker threads for parallel blocks (defaults to the number of cores)
    #[clap(long, short)]
    pub workers: Option<NonZeroUsize>,

    /// Print the final directory structure after the scenario ran
    #[clap(long, short)]
    pub structure: bool,
}
