use std::sync::Arc;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};
use vfolder::executor::{ExecutionError, ExecutorCreationError, ScenarioExecutor};
use vfolder::scenario::{Scenario, ScenarioError};
use vfolder::{FileSystemManager, TreeManager};

use super::report;
use crate::application::RuntimeConfig;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let scenario = Scenario::read(&app_config.scenario)
            .await
            .context(ScenarioSnafu)?;
        debug!("Loaded scenario: {:?}", scenario);

        let manager = Arc::new(TreeManager::new(scenario.root()));
        let outcomes = ScenarioExecutor::new(manager.clone(), app_config.workers)
            .context(ExecutorCreationSnafu)?
            .execute(scenario.steps())
            .await
            .context(ScenarioExecutionSnafu)?;
        info!("Scenario finished with {} step outcomes", outcomes.len());

        report::print_outcomes(scenario.steps(), &outcomes);
        if app_config.show_structure {
            report::print_structure(&manager.list_directory_structure());
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the scenario"))]
    ScenarioError { source: ScenarioError },
    #[snafu(display("Critical failure encountered during executor creation"))]
    ExecutorCreationError { source: ExecutorCreationError },
    #[snafu(display("Critical failure encountered during scenario execution"))]
    ScenarioExecutionError { source: ExecutionError },
}
