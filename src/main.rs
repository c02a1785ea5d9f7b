//! Demo binary running the bundled `stepwise` sample features.
//!
//! Lists or runs every sample unit and exits non-zero if any unit failed.

mod cli;
mod samples;

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use stepwise::{RegistryError, Runner, RunnerConfig, StepOutcome, registry::RunnableUnit};

#[tokio::main]
async fn main() -> Result<ExitCode, RegistryError> {
    // The library never installs a subscriber; the demo does.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let registry = samples::registry()?;

    if cli.list {
        for unit in registry.materialize()? {
            println!("{}", unit.name());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = RunnerConfig::new().with_concurrency(cli.concurrency);
    if let Some(pattern) = cli.filter {
        config = config.with_filter(pattern);
    }
    if let Some(ms) = cli.step_timeout_ms {
        config = config.with_default_step_timeout(Duration::from_millis(ms));
    }

    let summary = Runner::new(config).run_registry(&registry).await?;
    for report in summary.reports() {
        println!("{}: {}", report.name, report.result);
        for step in &report.steps {
            if let StepOutcome::Skipped(reason) = &step.outcome {
                println!("    {} (skipped: {reason})", step.name);
            }
        }
        for failure in &report.disposal_failures {
            println!("    {failure}");
        }
    }
    println!(
        "{} passed, {} failed, {} skipped, {} timed out",
        summary.passed(),
        summary.failed(),
        summary.skipped(),
        summary.timed_out()
    );

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
