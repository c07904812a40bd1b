mod scenario_executor;

pub use scenario_executor::{ExecutionError, ExecutorCreationError, ScenarioExecutor};
