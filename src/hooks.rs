//! Callbacks invoked by the runner as units progress.
//!
//! [`RunHooks`] stores optional callbacks shared by every unit of a run. A
//! panicking callback is logged and otherwise ignored; it never changes the
//! result of the unit that triggered it.

use std::fmt;

use tracing::error;

use crate::{
    naming::UnitNames,
    panic,
    runner::{StepReport, UnitReport},
};

/// Type alias for the `on_unit_start` callback.
type UnitStartHook = Box<dyn Fn(&UnitNames) + Send + Sync + 'static>;

/// Type alias for the `on_step_end` callback.
type StepEndHook = Box<dyn Fn(&UnitNames, &StepReport) + Send + Sync + 'static>;

/// Type alias for the `on_unit_end` callback.
type UnitEndHook = Box<dyn Fn(&UnitReport) + Send + Sync + 'static>;

/// Callbacks observing a run.
///
/// ```
/// use std::sync::{
///     Arc,
///     atomic::{AtomicUsize, Ordering},
/// };
///
/// use stepwise::hooks::RunHooks;
///
/// let finished = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&finished);
/// let hooks = RunHooks::default().on_unit_end(move |_| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
/// assert!(hooks.has_any());
/// ```
#[derive(Default)]
pub struct RunHooks {
    on_unit_start: Option<UnitStartHook>,
    on_step_end: Option<StepEndHook>,
    on_unit_end: Option<UnitEndHook>,
}

impl RunHooks {
    /// Call `hook` before a unit runs its first step.
    #[must_use]
    pub fn on_unit_start(mut self, hook: impl Fn(&UnitNames) + Send + Sync + 'static) -> Self {
        self.on_unit_start = Some(Box::new(hook));
        self
    }

    /// Call `hook` after each step that was attempted or skipped.
    #[must_use]
    pub fn on_step_end(
        mut self,
        hook: impl Fn(&UnitNames, &StepReport) + Send + Sync + 'static,
    ) -> Self {
        self.on_step_end = Some(Box::new(hook));
        self
    }

    /// Call `hook` once a unit has been torn down.
    #[must_use]
    pub fn on_unit_end(mut self, hook: impl Fn(&UnitReport) + Send + Sync + 'static) -> Self {
        self.on_unit_end = Some(Box::new(hook));
        self
    }

    /// Returns `true` if any callback is registered.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.on_unit_start.is_some() || self.on_step_end.is_some() || self.on_unit_end.is_some()
    }

    pub(crate) fn unit_started(&self, names: &UnitNames) {
        if let Some(hook) = &self.on_unit_start {
            guarded("on_unit_start", || hook(names));
        }
    }

    pub(crate) fn step_ended(&self, names: &UnitNames, report: &StepReport) {
        if let Some(hook) = &self.on_step_end {
            guarded("on_step_end", || hook(names, report));
        }
    }

    pub(crate) fn unit_ended(&self, report: &UnitReport) {
        if let Some(hook) = &self.on_unit_end {
            guarded("on_unit_end", || hook(report));
        }
    }
}

fn guarded(hook: &'static str, f: impl FnOnce()) {
    if let Err(panicked) = panic::catch(f) {
        error!(hook, panic = %panicked, "run hook panicked");
    }
}

impl fmt::Debug for RunHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunHooks")
            .field("on_unit_start", &self.on_unit_start.is_some())
            .field("on_step_end", &self.on_step_end.is_some())
            .field("on_unit_end", &self.on_unit_end.is_some())
            .finish()
    }
}
