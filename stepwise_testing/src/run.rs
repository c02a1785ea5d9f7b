//! Helpers driving a single feature to completion.

use stepwise::{
    Feature,
    FeatureSource,
    RunSummary,
    Runner,
    RunnerConfig,
    StepOutcome,
    UnitReport,
};

/// Run every unit of `feature` with the default configuration.
///
/// # Panics
///
/// Panics if a scenario declaration registers an invalid step.
pub async fn run_feature<W: Send + 'static>(feature: Feature<W>) -> RunSummary {
    run_feature_with(feature, RunnerConfig::new()).await
}

/// Run every unit of `feature` with `config`.
///
/// # Panics
///
/// Panics if a scenario declaration registers an invalid step.
pub async fn run_feature_with<W: Send + 'static>(
    feature: Feature<W>,
    config: RunnerConfig,
) -> RunSummary {
    let units = feature.materialize().expect("feature declarations are valid");
    Runner::new(config).run(units).await
}

/// Run `feature` to completion on a fresh current-thread runtime.
///
/// Every task the run spawns stays on the calling thread, so thread-local
/// state such as a `metrics` local recorder observes the whole run.
///
/// # Panics
///
/// Panics if the runtime cannot be built or a declaration is invalid.
pub fn run_feature_blocking<W: Send + 'static>(feature: Feature<W>) -> RunSummary {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("current-thread runtime")
        .block_on(run_feature(feature))
}

/// Display names of every reported unit, in order.
pub fn unit_names(summary: &RunSummary) -> Vec<String> {
    summary
        .reports()
        .iter()
        .map(|r| r.names.display().to_owned())
        .collect()
}

/// Step outcomes of `report`, in order.
pub fn outcomes(report: &UnitReport) -> Vec<StepOutcome> {
    report.steps.iter().map(|s| s.outcome.clone()).collect()
}
