//! Runner configuration.

use std::{num::NonZeroUsize, time::Duration};

/// Default prefix for threads hosting timed step bodies.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "stepwise-step";

/// Settings applied to a whole run.
///
/// # Default Values
/// - `concurrency`: 1 (units run one after another)
/// - `default_step_timeout`: none
/// - `filter`: none (every unit runs)
/// - `thread_name_prefix`: `"stepwise-step"`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    concurrency: NonZeroUsize,
    default_step_timeout: Option<Duration>,
    filter: Option<String>,
    thread_name_prefix: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            concurrency: NonZeroUsize::MIN,
            default_step_timeout: None,
            filter: None,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_owned(),
        }
    }
}

impl RunnerConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Run up to `n` units at once.
    #[must_use]
    pub fn with_concurrency(mut self, n: NonZeroUsize) -> Self {
        self.concurrency = n;
        self
    }

    /// Bound every step that sets no timeout of its own.
    #[must_use]
    pub fn with_default_step_timeout(mut self, limit: Duration) -> Self {
        self.default_step_timeout = Some(limit);
        self
    }

    /// Only run units whose qualified name contains `pattern`.
    #[must_use]
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Name threads hosting timed bodies after `prefix`.
    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Clear settings that would have no sensible effect.
    ///
    /// A zero default timeout becomes "no timeout", and a blank filter or
    /// thread name prefix falls back to its default.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use stepwise::config::RunnerConfig;
    ///
    /// let cfg = RunnerConfig::new()
    ///     .with_default_step_timeout(Duration::ZERO)
    ///     .with_filter("  ")
    ///     .normalized();
    /// assert_eq!(cfg.default_step_timeout(), None);
    /// assert_eq!(cfg.filter(), None);
    /// ```
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.default_step_timeout = self.default_step_timeout.filter(|d| !d.is_zero());
        self.filter = self.filter.take().filter(|f| !f.trim().is_empty());
        if self.thread_name_prefix.trim().is_empty() {
            DEFAULT_THREAD_NAME_PREFIX.clone_into(&mut self.thread_name_prefix);
        }
        self
    }

    /// Number of units run at once.
    #[must_use]
    pub fn concurrency(&self) -> NonZeroUsize { self.concurrency }

    /// Timeout applied to steps without their own.
    #[must_use]
    pub fn default_step_timeout(&self) -> Option<Duration> { self.default_step_timeout }

    /// The unit name filter.
    #[must_use]
    pub fn filter(&self) -> Option<&str> { self.filter.as_deref() }

    /// Prefix for timed step thread names.
    #[must_use]
    pub fn thread_name_prefix(&self) -> &str { &self.thread_name_prefix }

    /// Returns `true` if a unit called `name` passes the filter.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        self.filter.as_deref().is_none_or(|pattern| name.contains(pattern))
    }
}
