use derive_more::Display;
use hashlink::LinkedHashMap;
use saphyr::{Scalar, Yaml};
use snafu::prelude::*;
use tracing::warn;

use super::Outcome;
use super::scenario::{InvalidStepSnafu, NestedParallelSnafu, ScenarioError, key};
use crate::manager::FileSystemManager;

/// One operation of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Step {
    #[display("add {name} to {parent}")]
    Add {
        parent: String,
        name: String,
        is_folder: bool,
    },
    #[display("move {source} to {destination}")]
    Move { source: String, destination: String },
    #[display("list {folder}")]
    List { folder: String },
    #[display("structure")]
    Structure,
    #[display("find {name} in {folder}")]
    Find { folder: String, name: String },
    #[display("like {pattern} in {folder}")]
    Like { folder: String, pattern: String },
    #[display("write {file}")]
    Write { file: String, content: Vec<u8> },
    #[display("read {file}")]
    Read { file: String },
    #[display("parallel ({} steps)", _0.len())]
    Parallel(Vec<Step>),
}

impl Step {
    /// Parses the step at `index` of the scenario. Steps inside a parallel block are
    /// reported with the index of the block.
    pub(super) fn from_yaml(
        index: usize,
        yaml: &Yaml,
        nested: bool,
    ) -> Result<Self, ScenarioError> {
        if let Some("structure") = yaml.as_str() {
            return Ok(Step::Structure);
        }

        let mapping = yaml.as_mapping().context(InvalidStepSnafu {
            index,
            reason: "expected a map with a single operation",
        })?;
        let mut entries = mapping.iter();
        let (kind, args) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return InvalidStepSnafu {
                    index,
                    reason: "expected exactly one operation",
                }
                .fail();
            }
        };
        let kind = kind.as_str().context(InvalidStepSnafu {
            index,
            reason: "operation name should be a string",
        })?;

        let step = match kind {
            "add" => {
                let args = arguments(index, kind, args)?;
                Step::Add {
                    parent: required(index, args, "parent")?,
                    name: required(index, args, "name")?,
                    is_folder: flag(index, args, "folder")?,
                }
            }
            "move" => {
                let args = arguments(index, kind, args)?;
                Step::Move {
                    source: required(index, args, "source")?,
                    destination: required(index, args, "destination")?,
                }
            }
            "list" => Step::List {
                folder: scalar(index, kind, args)?,
            },
            "structure" => Step::Structure,
            "find" => {
                let args = arguments(index, kind, args)?;
                Step::Find {
                    folder: required(index, args, "folder")?,
                    name: required(index, args, "name")?,
                }
            }
            "like" => {
                let args = arguments(index, kind, args)?;
                Step::Like {
                    folder: required(index, args, "folder")?,
                    pattern: required(index, args, "pattern")?,
                }
            }
            "write" => {
                let args = arguments(index, kind, args)?;
                Step::Write {
                    file: required(index, args, "file")?,
                    content: required(index, args, "content")?.into_bytes(),
                }
            }
            "read" => Step::Read {
                file: scalar(index, kind, args)?,
            },
            "parallel" => {
                ensure!(!nested, NestedParallelSnafu { index });
                let children = args.as_sequence().context(InvalidStepSnafu {
                    index,
                    reason: "parallel expects a list of steps",
                })?;
                Step::Parallel(
                    children
                        .iter()
                        .map(|child| Step::from_yaml(index, child, true))
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
            other => {
                warn!("Unknown operation '{}' in step {}", other, index);
                return InvalidStepSnafu {
                    index,
                    reason: format!("unknown operation '{other}'"),
                }
                .fail();
            }
        };
        Ok(step)
    }

    /// Runs the step against `manager`. The children of a parallel block run one after
    /// the other here; concurrent execution is the executor's job.
    pub fn apply(&self, manager: &impl FileSystemManager) -> Outcome {
        match self {
            Step::Add {
                parent,
                name,
                is_folder,
            } => Outcome::Added(manager.add_file_or_folder(parent, name, *is_folder)),
            Step::Move {
                source,
                destination,
            } => match manager.move_file_or_folder(source, destination) {
                Ok(moved) => Outcome::Moved(moved),
                Err(error) => Outcome::MoveFailed(error.to_string()),
            },
            Step::List { folder } => Outcome::Listing(manager.list_contents(folder)),
            Step::Structure => Outcome::Structure(manager.list_directory_structure()),
            Step::Find { folder, name } => {
                Outcome::Found(manager.search_file_exact_match(folder, name))
            }
            Step::Like { folder, pattern } => {
                Outcome::Matches(manager.search_file_like_match(folder, pattern))
            }
            Step::Write { file, content } => {
                Outcome::Written(manager.write_file_content(file, content))
            }
            Step::Read { file } => Outcome::Content(manager.read_file_content(file)),
            Step::Parallel(steps) => {
                Outcome::Parallel(steps.iter().map(|step| step.apply(manager)).collect())
            }
        }
    }
}

fn text(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::Value(Scalar::String(value)) => Some(value.to_string()),
        Yaml::Value(Scalar::Integer(value)) => Some(value.to_string()),
        _ => None,
    }
}

fn scalar(index: usize, kind: &str, args: &Yaml) -> Result<String, ScenarioError> {
    text(args).context(InvalidStepSnafu {
        index,
        reason: format!("{kind} expects a name"),
    })
}

fn arguments<'a, 'y>(
    index: usize,
    kind: &str,
    args: &'a Yaml<'y>,
) -> Result<&'a LinkedHashMap<Yaml<'y>, Yaml<'y>>, ScenarioError> {
    args.as_mapping().context(InvalidStepSnafu {
        index,
        reason: format!("{kind} expects a map of arguments"),
    })
}

fn required(
    index: usize,
    args: &LinkedHashMap<Yaml, Yaml>,
    name: &'static str,
) -> Result<String, ScenarioError> {
    args.get(&key(name)).and_then(text).context(InvalidStepSnafu {
        index,
        reason: format!("missing or invalid '{name}'"),
    })
}

fn flag(
    index: usize,
    args: &LinkedHashMap<Yaml, Yaml>,
    name: &'static str,
) -> Result<bool, ScenarioError> {
    match args.get(&key(name)) {
        None => Ok(false),
        Some(Yaml::Value(Scalar::Boolean(value))) => Ok(*value),
        Some(_) => InvalidStepSnafu {
            index,
            reason: format!("'{name}' should be true or false"),
        }
        .fail(),
    }
}
