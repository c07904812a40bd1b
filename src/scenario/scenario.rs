use std::borrow::Cow;
use std::path::Path;

use compio::fs;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use super::Step;

const DEFAULT_ROOT_NAME: &str = "root";

pub(super) fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// A root folder name plus the steps to run against a tree with that root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    root: String,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(root: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            root: root.into(),
            steps,
        }
    }

    pub async fn read(path: &Path) -> Result<Self, ScenarioError> {
        let file_path = path.display().to_string();
        debug!("Reading scenario file: {}", file_path);

        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: file_path.as_str(),
        })?;
        debug!("Successfully read scenario file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu { file_path })?;
        contents.as_str().try_into()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl TryFrom<&str> for Scenario {
    type Error = ScenarioError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedScenarioSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let root = match top_level.get(&key("root")) {
            None => DEFAULT_ROOT_NAME.to_string(),
            Some(value) => value.as_str().context(RootNotStringSnafu)?.to_string(),
        };

        let steps = match top_level.get(&key("steps")) {
            None => Vec::new(),
            Some(value) => value
                .as_sequence()
                .context(StepsNotSequenceSnafu)?
                .iter()
                .enumerate()
                .map(|(index, step)| Step::from_yaml(index, step, false))
                .collect::<Result<Vec<_>, _>>()?,
        };

        debug!("Parsed scenario with root '{}' and {} steps", root, steps.len());
        Ok(Scenario { root, steps })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum ScenarioError {
    #[snafu(display("Failed to read the scenario file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Scenario file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the scenario file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted scenario file"))]
    MalformedScenario,
    #[snafu(display("Top level of the scenario should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Root name should be a string"))]
    RootNotString,
    #[snafu(display("Steps section should be a list"))]
    StepsNotSequence,
    #[snafu(display("Step {} is invalid: {}", index, reason))]
    InvalidStep { index: usize, reason: String },
    #[snafu(display("Step {} nests a parallel block inside another one", index))]
    NestedParallel { index: usize },
}
