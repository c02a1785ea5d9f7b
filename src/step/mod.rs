//! Steps: the named, individually executed phases of a scenario.
//!
//! A [`Step`] pairs a composed name (for example `"Given a blog"`) with a body
//! that runs against the unit's world. Bodies may hand resources to the
//! enclosing unit by returning an [`Acquired`] collection. Once a step has
//! been handed to expansion it is shared behind an [`Arc`] and never changes.

mod keyword;
pub(crate) mod message;

use std::{fmt, sync::Arc, time::Duration};

pub use keyword::Keyword;

use crate::{
    disposal::{Acquired, ReleaseOutcome},
    error::{BoxError, ConstructionError},
};

/// Type-erased step body.
pub type StepBody<W> = Arc<dyn Fn(&mut W) -> Result<Acquired, BoxError> + Send + Sync>;

/// Action run at teardown after its step completed.
pub type TeardownAction = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

/// Values a step body may return.
///
/// Implemented for `()`, [`Acquired`], and `Result<T, E>` where `T` is
/// itself a step output and `E` converts into [`BoxError`].
pub trait IntoStepOutput {
    /// Convert into the resources to register, or the body's failure.
    ///
    /// # Errors
    ///
    /// Returns the error carried by a failed body.
    fn into_step_output(self) -> Result<Acquired, BoxError>;
}

impl IntoStepOutput for () {
    fn into_step_output(self) -> Result<Acquired, BoxError> { Ok(Acquired::none()) }
}

impl IntoStepOutput for Acquired {
    fn into_step_output(self) -> Result<Acquired, BoxError> { Ok(self) }
}

impl<T, E> IntoStepOutput for Result<T, E>
where
    T: IntoStepOutput,
    E: Into<BoxError>,
{
    fn into_step_output(self) -> Result<Acquired, BoxError> {
        self.map_err(Into::into)
            .and_then(IntoStepOutput::into_step_output)
    }
}

/// A single named phase of a scenario.
pub struct Step<W> {
    keyword: Keyword,
    name: String,
    body: StepBody<W>,
    isolated: bool,
    skip_reason: Option<String>,
    timeout: Option<Duration>,
    teardowns: Vec<TeardownAction>,
}

impl<W: 'static> Step<W> {
    /// Build a step whose name is `message` as a sentence starting with
    /// `keyword`.
    ///
    /// ```
    /// use stepwise::step::{Keyword, Step};
    ///
    /// let step = Step::new(Keyword::Given, "a counter", |count: &mut u32| *count += 1)
    ///     .expect("valid step");
    /// assert_eq!(step.name(), "Given a counter");
    /// assert!(!step.is_isolated());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyMessage`] if `message` is blank.
    pub fn new<F, R>(keyword: Keyword, message: &str, body: F) -> Result<Self, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        let name = keyword.sentence(message)?;
        Ok(Self {
            keyword,
            name,
            body: Arc::new(move |world: &mut W| body(world).into_step_output()),
            isolated: false,
            skip_reason: None,
            timeout: None,
            teardowns: Vec::new(),
        })
    }

    /// Require this step to run in its own freshly constructed unit.
    #[must_use]
    pub fn isolated(mut self) -> Self {
        self.mark_isolated();
        self
    }

    /// Bound the body's execution time.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::ZeroTimeout`] if `limit` is zero.
    pub fn with_timeout(mut self, limit: Duration) -> Result<Self, ConstructionError> {
        self.set_timeout(limit)?;
        Ok(self)
    }

    /// Mark the step as skipped; its body will never run.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptySkipReason`] if `reason` is blank.
    pub fn skip(mut self, reason: impl Into<String>) -> Result<Self, ConstructionError> {
        self.set_skip_reason(reason.into())?;
        Ok(self)
    }

    /// Register `action` to run at teardown once the body has completed.
    #[must_use]
    pub fn teardown<F, R>(mut self, action: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: ReleaseOutcome,
    {
        self.push_teardown(action);
        self
    }

    pub(crate) fn mark_isolated(&mut self) { self.isolated = true; }

    pub(crate) fn set_timeout(&mut self, limit: Duration) -> Result<(), ConstructionError> {
        if limit.is_zero() {
            return Err(ConstructionError::ZeroTimeout {
                step: self.name.clone(),
            });
        }
        self.timeout = Some(limit);
        Ok(())
    }

    pub(crate) fn set_skip_reason(&mut self, reason: String) -> Result<(), ConstructionError> {
        if reason.trim().is_empty() {
            return Err(ConstructionError::EmptySkipReason {
                step: self.name.clone(),
            });
        }
        self.skip_reason = Some(reason);
        Ok(())
    }

    pub(crate) fn push_teardown<F, R>(&mut self, action: F)
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: ReleaseOutcome,
    {
        self.teardowns
            .push(Arc::new(move || action().into_release_result()));
    }
}

impl<W> Step<W> {
    /// The keyword the step was registered under.
    #[must_use]
    pub fn keyword(&self) -> Keyword { self.keyword }

    /// The composed step name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Whether the step runs in its own unit.
    #[must_use]
    pub fn is_isolated(&self) -> bool { self.isolated }

    /// The reason the step is skipped, if any.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> { self.skip_reason.as_deref() }

    /// The step's own timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> { self.timeout }

    pub(crate) fn teardowns(&self) -> &[TeardownAction] { &self.teardowns }

    pub(crate) fn invoke(&self, world: &mut W) -> Result<Acquired, BoxError> { (self.body)(world) }
}

impl<W> fmt::Debug for Step<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("isolated", &self.isolated)
            .field("skip_reason", &self.skip_reason)
            .field("timeout", &self.timeout)
            .field("teardowns", &self.teardowns.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_outputs_are_normalised() {
        let unit = Step::new(Keyword::Given, "nothing", |_: &mut ()| ()).expect("step");
        assert!(unit.invoke(&mut ()).expect("body").is_empty());

        let failing =
            Step::new(Keyword::When, "failing", |_: &mut ()| Err::<(), _>("nope")).expect("step");
        let error = failing.invoke(&mut ()).expect_err("body fails");
        assert_eq!(error.to_string(), "nope");
    }

    #[test]
    fn body_mutates_world() {
        let step = Step::new(Keyword::When, "incrementing", |n: &mut u8| *n += 2).expect("step");
        let mut world = 1;
        step.invoke(&mut world).expect("body");
        step.invoke(&mut world).expect("body");
        assert_eq!(world, 5);
    }

    #[test]
    fn modifiers_are_validated() {
        let step = Step::new(Keyword::Then, "bounded", |_: &mut ()| ()).expect("step");
        assert_eq!(
            step.with_timeout(Duration::ZERO).map(|_| ()),
            Err(ConstructionError::ZeroTimeout {
                step: "Then bounded".into()
            })
        );

        let step = Step::new(Keyword::Then, "skipped", |_: &mut ()| ()).expect("step");
        assert_eq!(
            step.skip(" ").map(|_| ()),
            Err(ConstructionError::EmptySkipReason {
                step: "Then skipped".into()
            })
        );
    }

    #[test]
    fn builder_sets_flags() {
        let step = Step::new(Keyword::Then, "it holds", |_: &mut ()| ())
            .expect("step")
            .isolated()
            .with_timeout(Duration::from_millis(10))
            .expect("timeout")
            .skip("later")
            .expect("skip")
            .teardown(|| ());
        assert!(step.is_isolated());
        assert_eq!(step.timeout(), Some(Duration::from_millis(10)));
        assert_eq!(step.skip_reason(), Some("later"));
        assert_eq!(step.teardowns().len(), 1);
    }
}
