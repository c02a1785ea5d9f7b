//! Metric helpers for `stepwise`.
//!
//! This module defines metric names and small helpers wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! every helper compiles to a no-op.

use crate::runner::UnitResult;

/// Name of the counter tracking finished units, labelled by `result`.
pub const UNITS_TOTAL: &str = "stepwise_units_total";
/// Name of the counter tracking skipped steps.
pub const STEPS_SKIPPED: &str = "stepwise_steps_skipped_total";
/// Name of the counter tracking step timeouts.
pub const STEP_TIMEOUTS: &str = "stepwise_step_timeouts_total";
/// Name of the counter tracking successful resource releases.
pub const RESOURCES_RELEASED: &str = "stepwise_resources_released_total";
/// Name of the counter tracking failed resource releases.
pub const DISPOSAL_FAILURES: &str = "stepwise_disposal_failures_total";

/// Record a finished unit under its result label.
pub fn inc_units(result: &UnitResult) {
    #[cfg(feature = "metrics")]
    metrics::counter!(UNITS_TOTAL, "result" => result.label()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = result;
}

/// Record a skipped step.
pub fn inc_steps_skipped() {
    #[cfg(feature = "metrics")]
    metrics::counter!(STEPS_SKIPPED).increment(1);
}

/// Record a step timeout.
pub fn inc_step_timeouts() {
    #[cfg(feature = "metrics")]
    metrics::counter!(STEP_TIMEOUTS).increment(1);
}

/// Record a successful resource release.
pub fn inc_resources_released() {
    #[cfg(feature = "metrics")]
    metrics::counter!(RESOURCES_RELEASED).increment(1);
}

/// Record a failed resource release.
pub fn inc_disposal_failures() {
    #[cfg(feature = "metrics")]
    metrics::counter!(DISPOSAL_FAILURES).increment(1);
}
