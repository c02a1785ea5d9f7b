//! Canonical error types for the crate.
//!
//! Errors fall into two groups. [`ConstructionError`] and [`RegistryError`]
//! are raised while scenarios are declared and materialized, before anything
//! runs. [`StepError`] and [`DisposalFailure`] are raised while an execution
//! unit runs and are folded into its [`crate::runner::UnitReport`].

use std::time::Duration;

use thiserror::Error;

use crate::step::Keyword;

/// Boxed error returned by step bodies and release operations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single step while its unit was running.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StepError {
    /// The step body returned an error or panicked.
    #[error("step `{step}` failed: {source}")]
    Failure {
        /// Name of the failing step.
        step: String,
        /// The error raised by the body.
        #[source]
        source: BoxError,
    },
    /// The step body did not finish within its configured bound.
    #[error("step `{step}` timed out after {limit:?}")]
    Timeout {
        /// Name of the step that timed out.
        step: String,
        /// The configured bound.
        limit: Duration,
    },
}

impl StepError {
    /// Name of the step that raised this error.
    #[must_use]
    pub fn step(&self) -> &str {
        match self {
            Self::Failure { step, .. } | Self::Timeout { step, .. } => step,
        }
    }

    /// Returns `true` if the step exceeded its timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool { matches!(self, Self::Timeout { .. }) }
}

/// A release operation failed during teardown.
///
/// Recorded alongside the unit's primary result; it never stops the
/// remaining resources from being released.
#[derive(Debug, Error)]
#[error("release of `{resource}` failed: {source}")]
pub struct DisposalFailure {
    /// Label of the resource whose release failed.
    pub resource: String,
    /// The error raised by the release operation.
    #[source]
    pub source: BoxError,
}

/// Invalid step registration, reported before any expansion or execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConstructionError {
    /// The step message was empty or only whitespace.
    #[error("`{keyword}` step registered with an empty message")]
    EmptyMessage {
        /// Keyword the step was registered under.
        keyword: Keyword,
    },
    /// A zero duration was supplied as a step timeout.
    #[error("step `{step}` was given a zero timeout")]
    ZeroTimeout {
        /// Name of the offending step.
        step: String,
    },
    /// An empty skip reason was supplied.
    #[error("step `{step}` was given an empty skip reason")]
    EmptySkipReason {
        /// Name of the offending step.
        step: String,
    },
    /// A message placeholder referenced an argument that is not bound.
    #[error("placeholder {{{index}}} has no bound argument ({available} available)")]
    PlaceholderOutOfRange {
        /// Index named by the placeholder.
        index: usize,
        /// Number of bound arguments.
        available: usize,
    },
}

/// Errors raised by [`crate::registry::FeatureRegistry`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// A feature with the same name was already registered.
    #[error("feature `{0}` was already registered")]
    DuplicateFeature(String),
    /// A scenario declaration registered an invalid step.
    #[error("feature `{feature}`, scenario `{scenario}`: {source}")]
    Construction {
        /// Feature owning the scenario.
        feature: String,
        /// Scenario whose declaration failed.
        scenario: String,
        /// The underlying registration error.
        #[source]
        source: ConstructionError,
    },
}
