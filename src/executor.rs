//! Execution of a single step against its unit's world.
//!
//! Untimed bodies run inline on the calling task. A body with a timeout runs
//! on a dedicated thread while the executor waits on a timer; if the timer
//! fires first the executor reports [`StepError::Timeout`] and returns
//! without joining the thread.
//!
//! The body thread stamps the instant it finished. A result stamped after
//! the deadline is a timeout even when the waiting task was only polled
//! late, as happens when another unit's body blocks the runtime thread.
//!
//! Timeout is abandonment, not cancellation. The abandoned body keeps
//! running in the background, and any resources it eventually returns are
//! dropped unregistered: their release operation is never called.

use std::{
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::{Duration, Instant},
};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::{
    disposal::{Acquired, DisposalRegistry, OnRelease},
    error::{BoxError, StepError},
    metrics,
    panic,
    step::Step,
};

/// World value shared between the executor and timed step threads.
pub type SharedWorld<W> = Arc<Mutex<W>>;

/// What happened to a step that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Executed {
    /// The body ran to completion.
    Ran,
    /// The body was not run.
    Skipped {
        /// Reason given when the step was registered.
        reason: String,
    },
}

/// Runs individual steps, enforcing timeouts.
#[derive(Clone, Debug, Default)]
pub struct StepExecutor {
    default_timeout: Option<Duration>,
    thread_name_prefix: Option<Arc<str>>,
}

impl StepExecutor {
    /// Create an executor with no default timeout.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Apply `limit` to steps that carry no timeout of their own.
    #[must_use]
    pub fn default_timeout(mut self, limit: Option<Duration>) -> Self {
        self.default_timeout = limit.filter(|d| !d.is_zero());
        self
    }

    /// Name threads hosting timed bodies `"{prefix}-{step name}"`.
    #[must_use]
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = Some(Arc::from(prefix.into()));
        self
    }

    /// Execute `step`, registering anything it acquires in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Failure`] if the body fails or panics and
    /// [`StepError::Timeout`] if it outlives its bound.
    pub async fn execute<W: Send + 'static>(
        &self,
        step: &Arc<Step<W>>,
        world: &SharedWorld<W>,
        registry: &mut DisposalRegistry,
    ) -> Result<Executed, StepError> {
        if let Some(reason) = step.skip_reason() {
            metrics::inc_steps_skipped();
            warn!(step = step.name(), reason, "step skipped");
            return Ok(Executed::Skipped {
                reason: reason.to_owned(),
            });
        }

        debug!(step = step.name(), "running step");
        let outcome = match step.timeout().or(self.default_timeout) {
            Some(limit) => self.run_bounded(step, world, limit).await?,
            None => run_body(step, world),
        };

        match outcome {
            Ok(acquired) => {
                register(step, acquired, registry);
                Ok(Executed::Ran)
            }
            Err(source) => {
                warn!(step = step.name(), error = %source, "step failed");
                Err(StepError::Failure {
                    step: step.name().to_owned(),
                    source,
                })
            }
        }
    }

    async fn run_bounded<W: Send + 'static>(
        &self,
        step: &Arc<Step<W>>,
        world: &SharedWorld<W>,
        limit: Duration,
    ) -> Result<Result<Acquired, BoxError>, StepError> {
        let (tx, rx) = oneshot::channel();
        let body_step = Arc::clone(step);
        let body_world = Arc::clone(world);
        let mut builder = thread::Builder::new();
        if let Some(prefix) = &self.thread_name_prefix {
            builder = builder.name(format!("{prefix}-{}", step.name()));
        }
        let deadline = Instant::now() + limit;
        builder
            .spawn(move || {
                let outcome = run_body(&body_step, &body_world);
                // The receiver is gone once the step has timed out.
                let _ = tx.send((outcome, Instant::now()));
            })
            .map_err(|e| StepError::Failure {
                step: step.name().to_owned(),
                source: Box::new(e),
            })?;

        match tokio::time::timeout(limit, rx).await {
            Ok(Ok((outcome, finished))) if finished <= deadline => Ok(outcome),
            Ok(Ok(_)) | Err(_) => Err(timed_out(step, limit)),
            Ok(Err(_)) => Err(StepError::Failure {
                step: step.name().to_owned(),
                source: "step thread exited without reporting".into(),
            }),
        }
    }
}

/// Record a step whose body outlived `limit`.
fn timed_out<W>(step: &Step<W>, limit: Duration) -> StepError {
    metrics::inc_step_timeouts();
    warn!(step = step.name(), ?limit, "step timed out; body abandoned");
    StepError::Timeout {
        step: step.name().to_owned(),
        limit,
    }
}

fn run_body<W>(step: &Step<W>, world: &SharedWorld<W>) -> Result<Acquired, BoxError>
where
    W: 'static,
{
    let mut guard = world.lock().unwrap_or_else(PoisonError::into_inner);
    match panic::catch(|| step.invoke(&mut guard)) {
        Ok(result) => result,
        Err(panicked) => Err(Box::new(panicked)),
    }
}

/// Hand the body's resources, then the step's teardown actions, to the unit.
fn register<W>(step: &Step<W>, acquired: Acquired, registry: &mut DisposalRegistry)
where
    W: 'static,
{
    registry.extend(acquired);
    for action in step.teardowns() {
        let action = Arc::clone(action);
        registry.register(Box::new(OnRelease::new(
            format!("teardown of `{}`", step.name()),
            move || action(),
        )));
    }
}
