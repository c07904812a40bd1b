use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::available_parallelism;

use compio::dispatcher::{Dispatcher, DispatcherBuilder};
use futures::future::join_all;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::manager::FileSystemManager;
use crate::scenario::{Outcome, Step};

/// Default number of worker threads when unable to determine system parallelism
const DEFAULT_WORKER_THREADS: NonZeroUsize = NonZeroUsize::MIN;

/// Runs scenario steps against a shared manager.
///
/// Steps run in order. The children of a parallel block are dispatched to a pool of
/// worker threads at once, and the block completes when all of them have.
pub struct ScenarioExecutor<M> {
    dispatcher: Dispatcher,
    manager: Arc<M>,
}

impl<M> ScenarioExecutor<M>
where
    M: FileSystemManager + Send + Sync + 'static,
{
    /// Creates an executor with `workers` threads, or one per available core when
    /// `workers` is `None`.
    pub fn new(
        manager: Arc<M>,
        workers: Option<NonZeroUsize>,
    ) -> Result<Self, ExecutorCreationError> {
        let workers_num = workers.unwrap_or_else(Self::determine_worker_count);
        debug!("Using {} worker threads for parallel steps", workers_num);

        let dispatcher = DispatcherBuilder::new()
            .worker_threads(workers_num)
            .build()
            .context(DispatcherSnafu)?;

        Ok(Self {
            dispatcher,
            manager,
        })
    }

    fn determine_worker_count() -> NonZeroUsize {
        available_parallelism().unwrap_or(DEFAULT_WORKER_THREADS)
    }

    pub fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    /// Runs every step and returns their outcomes in step order.
    pub async fn execute(&self, steps: &[Step]) -> Result<Vec<Outcome>, ExecutionError> {
        let mut outcomes = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            let outcome = match step {
                Step::Parallel(children) => self.execute_parallel(index, children).await?,
                _ => step.apply(self.manager.as_ref()),
            };
            debug!("Step {} '{}' finished: {}", index, step, outcome);
            outcomes.push(outcome);
        }

        info!("Executed {} steps", outcomes.len());
        Ok(outcomes)
    }

    async fn execute_parallel(
        &self,
        index: usize,
        children: &[Step],
    ) -> Result<Outcome, ExecutionError> {
        debug!("Dispatching {} parallel steps of step {}", children.len(), index);

        let receivers = children
            .iter()
            .cloned()
            .map(|child| {
                let manager = self.manager.clone();
                self.dispatcher
                    .dispatch(move || async move { child.apply(manager.as_ref()) })
                    .map_err(|e| ExecutionError::StepDispatchError {
                        index,
                        error: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let outcomes = join_all(receivers)
            .await
            .into_iter()
            .map(|result| result.context(StepCanceledSnafu { index }))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Outcome::Parallel(outcomes))
    }
}

#[derive(Debug, Snafu)]
pub enum ExecutorCreationError {
    #[snafu(display("Failed to create the worker dispatcher"))]
    DispatcherError { source: std::io::Error },
}

#[derive(Debug, Snafu)]
pub enum ExecutionError {
    #[snafu(display("Failed to dispatch parallel step {}: {}", index, error))]
    StepDispatchError { index: usize, error: String },
    #[snafu(display("A worker running parallel step {} was canceled", index))]
    StepCanceled {
        index: usize,
        source: futures_channel::oneshot::Canceled,
    },
}
