//! Running materialized units and collecting their reports.
//!
//! [`Runner`] drives every unit selected by its [`RunnerConfig`], running up
//! to `concurrency` of them at once on the Tokio runtime. Reports come back
//! in materialization order regardless of completion order.

mod report;
mod unit_runner;

use std::sync::Arc;

use futures::{StreamExt, stream};
use tracing::{debug, error, info};

pub use self::{
    report::{StepOutcome, StepReport, UnitReport, UnitResult},
    unit_runner::UnitRunner,
};
use crate::{
    config::RunnerConfig,
    error::RegistryError,
    hooks::RunHooks,
    registry::{FeatureRegistry, RunnableUnit},
};

/// Runs units and summarises the results.
#[derive(Debug, Default)]
pub struct Runner {
    config: RunnerConfig,
    hooks: Arc<RunHooks>,
}

impl Runner {
    /// Create a runner with `config`.
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config: config.normalized(),
            hooks: Arc::default(),
        }
    }

    /// Install callbacks observing the run.
    #[must_use]
    pub fn with_hooks(mut self, hooks: RunHooks) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// The normalized configuration in effect.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig { &self.config }

    /// Run every unit selected by the filter.
    pub async fn run(&self, units: Vec<Box<dyn RunnableUnit>>) -> RunSummary {
        let total = units.len();
        let selected: Vec<_> = units
            .into_iter()
            .filter(|unit| self.config.selects(unit.name()))
            .collect();
        debug!(total, selected = selected.len(), "run started");

        let unit_runner = UnitRunner::new(&self.config, Arc::clone(&self.hooks));
        let reports: Vec<UnitReport> = stream::iter(selected.into_iter().map(|unit| {
            let name = unit.name().to_owned();
            let names = unit.names().clone();
            let task = tokio::spawn(unit.run(unit_runner.clone()));
            async move {
                task.await.unwrap_or_else(|e| {
                    error!(unit = %name, error = %e, "unit task aborted");
                    UnitReport::aborted(name, names, format!("unit task aborted: {e}"))
                })
            }
        }))
        .buffered(self.config.concurrency().get())
        .collect()
        .await;

        let summary = RunSummary { reports };
        info!(
            passed = summary.passed(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            timed_out = summary.timed_out(),
            "run finished"
        );
        summary
    }

    /// Materialize every feature in `registry` and run the result.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if a scenario declaration is invalid.
    /// Nothing runs in that case.
    pub async fn run_registry(&self, registry: &FeatureRegistry) -> Result<RunSummary, RegistryError> {
        let units = registry.materialize()?;
        Ok(self.run(units).await)
    }
}

/// Reports of a finished run, in materialization order.
#[derive(Debug, Default)]
pub struct RunSummary {
    reports: Vec<UnitReport>,
}

impl RunSummary {
    /// Every unit report.
    #[must_use]
    pub fn reports(&self) -> &[UnitReport] { &self.reports }

    /// Consume the summary, returning its reports.
    #[must_use]
    pub fn into_reports(self) -> Vec<UnitReport> { self.reports }

    /// Look up a report by qualified unit name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UnitReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    fn count(&self, pred: impl Fn(&UnitResult) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.result)).count()
    }

    /// Units that passed.
    #[must_use]
    pub fn passed(&self) -> usize { self.count(|r| matches!(r, UnitResult::Passed)) }

    /// Units that failed without timing out.
    #[must_use]
    pub fn failed(&self) -> usize { self.count(|r| matches!(r, UnitResult::Failed(_))) }

    /// Units whose every step was skipped.
    #[must_use]
    pub fn skipped(&self) -> usize { self.count(|r| matches!(r, UnitResult::Skipped(_))) }

    /// Units stopped by a step timeout.
    #[must_use]
    pub fn timed_out(&self) -> usize { self.count(|r| matches!(r, UnitResult::TimedOut(_))) }

    /// Release failures across every unit.
    #[must_use]
    pub fn disposal_failures(&self) -> usize {
        self.reports.iter().map(|r| r.disposal_failures.len()).sum()
    }

    /// Returns `true` if no unit failed or timed out and every release
    /// succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(|r| !r.result.is_failure()) && self.disposal_failures() == 0
    }
}
