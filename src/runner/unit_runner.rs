//! Running one execution unit from world construction to teardown.

use std::sync::{Arc, Mutex};

use tracing::{debug, error, info};

use super::report::{StepOutcome, StepReport, UnitReport, UnitResult};
use crate::{
    config::RunnerConfig,
    disposal::DisposalRegistry,
    error::StepError,
    executor::{Executed, StepExecutor},
    hooks::RunHooks,
    metrics,
    panic,
    unit::ExecutionUnit,
};

/// Runs units one at a time; cheap to clone across tasks.
#[derive(Clone, Debug, Default)]
pub struct UnitRunner {
    executor: StepExecutor,
    hooks: Arc<RunHooks>,
}

impl UnitRunner {
    /// Build a runner applying `config` and reporting to `hooks`.
    #[must_use]
    pub fn new(config: &RunnerConfig, hooks: Arc<RunHooks>) -> Self {
        let executor = StepExecutor::new()
            .default_timeout(config.default_step_timeout())
            .thread_name_prefix(config.thread_name_prefix());
        Self { executor, hooks }
    }

    /// Run `unit` against a world built by `make_world`.
    ///
    /// Steps run strictly in order. The first failure or timeout stops the
    /// unit; the remaining steps are reported as [`StepOutcome::NotRun`].
    /// Teardown always runs before this returns, whatever the outcome.
    pub async fn run<W, F>(&self, name: &str, unit: &ExecutionUnit<W>, make_world: F) -> UnitReport
    where
        W: Send + 'static,
        F: FnOnce() -> W + Send,
    {
        let names = unit.names();
        debug!(unit = name, steps = unit.len(), "unit started");
        self.hooks.unit_started(names);

        let mut registry = DisposalRegistry::new();
        let mut steps = Vec::with_capacity(unit.len());
        let mut stopped: Option<UnitResult> = None;

        let world = match panic::catch(make_world) {
            Ok(world) => Some(Arc::new(Mutex::new(world))),
            Err(panicked) => {
                error!(unit = name, panic = %panicked, "world construction panicked");
                stopped = Some(UnitResult::Failed(format!(
                    "world construction {panicked}"
                )));
                None
            }
        };

        for step in unit.steps() {
            let outcome = match &world {
                Some(world) if stopped.is_none() => {
                    match self.executor.execute(step, world, &mut registry).await {
                        Ok(Executed::Ran) => StepOutcome::Passed,
                        Ok(Executed::Skipped { reason }) => StepOutcome::Skipped(reason),
                        Err(StepError::Timeout { limit, .. }) => {
                            stopped = Some(UnitResult::TimedOut(limit));
                            StepOutcome::TimedOut(limit)
                        }
                        Err(error @ StepError::Failure { .. }) => {
                            stopped = Some(UnitResult::Failed(error.to_string()));
                            let message = std::error::Error::source(&error)
                                .map_or_else(|| error.to_string(), ToString::to_string);
                            StepOutcome::Failed(message)
                        }
                    }
                }
                _ => StepOutcome::NotRun,
            };
            let report = StepReport {
                name: step.name().to_owned(),
                outcome,
            };
            if report.outcome != StepOutcome::NotRun {
                self.hooks.step_ended(names, &report);
            }
            steps.push(report);
        }

        let disposal_failures = registry.release_all();
        let result = stopped.unwrap_or_else(|| UnitResult::from_completed(&steps));
        metrics::inc_units(&result);
        info!(
            unit = name,
            result = result.label(),
            disposal_failures = disposal_failures.len(),
            "unit finished"
        );

        let report = UnitReport {
            name: name.to_owned(),
            names: names.clone(),
            result,
            steps,
            disposal_failures,
        };
        self.hooks.unit_ended(&report);
        report
    }
}
