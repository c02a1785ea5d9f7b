//! `rstest` fixtures shared by the integration and behaviour tests.

use rstest::fixture;
use stepwise::RunnerConfig;

use crate::EventLog;

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn event_log() -> EventLog { EventLog::new() }

/// Serial configuration with no default timeout.
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn runner_config() -> RunnerConfig { RunnerConfig::new() }
