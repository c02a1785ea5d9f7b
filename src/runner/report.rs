//! Results reported for steps and units.

use std::{fmt, time::Duration};

use crate::{error::DisposalFailure, naming::UnitNames};

/// Outcome of a single step within a unit run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The body completed.
    Passed,
    /// The body was not run because the step carries a skip reason.
    Skipped(String),
    /// The body returned an error or panicked.
    Failed(String),
    /// The body outlived its bound and was abandoned.
    TimedOut(Duration),
    /// An earlier step in the unit failed.
    NotRun,
}

/// A step's name and what happened to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// The step's composed name.
    pub name: String,
    /// What happened when the unit reached the step.
    pub outcome: StepOutcome,
}

/// Result of running one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitResult {
    /// Every attempted step completed.
    Passed,
    /// A step failed; carries the failure message.
    Failed(String),
    /// Every step was skipped; carries the first skip reason.
    Skipped(String),
    /// A step timed out; carries its configured bound.
    TimedOut(Duration),
}

impl UnitResult {
    /// Short label used in logs and metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
            Self::Skipped(_) => "skipped",
            Self::TimedOut(_) => "timed_out",
        }
    }

    /// Returns `true` for [`Failed`](Self::Failed) and
    /// [`TimedOut`](Self::TimedOut).
    #[must_use]
    pub fn is_failure(&self) -> bool { matches!(self, Self::Failed(_) | Self::TimedOut(_)) }

    /// Result of a unit whose steps all completed or were skipped.
    pub(crate) fn from_completed(steps: &[StepReport]) -> Self {
        let mut reasons = steps.iter().map(|s| match &s.outcome {
            StepOutcome::Skipped(reason) => Some(reason),
            _ => None,
        });
        match reasons.next() {
            Some(Some(first)) if reasons.all(|r| r.is_some()) => Self::Skipped(first.clone()),
            _ => Self::Passed,
        }
    }
}

impl fmt::Display for UnitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::TimedOut(limit) => write!(f, "timed out after {limit:?}"),
        }
    }
}

/// Everything recorded about one unit run.
#[derive(Debug)]
pub struct UnitReport {
    /// Qualified name used for filtering and display.
    pub name: String,
    /// Labels derived for the unit.
    pub names: UnitNames,
    /// The unit's primary result.
    pub result: UnitResult,
    /// One entry per step, in execution order.
    pub steps: Vec<StepReport>,
    /// Release operations that failed during teardown.
    pub disposal_failures: Vec<DisposalFailure>,
}

impl UnitReport {
    /// Report for a unit whose task ended without producing its own report.
    pub(crate) fn aborted(name: String, names: UnitNames, reason: String) -> Self {
        Self {
            name,
            names,
            result: UnitResult::Failed(reason),
            steps: Vec::new(),
            disposal_failures: Vec::new(),
        }
    }
}
