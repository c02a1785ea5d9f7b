//! Step registration API used inside scenario and background declarations.
//!
//! A declaration receives a [`ScenarioContext`] and registers steps on it in
//! order. Each registration returns a [`StepHandle`] for adjusting the step
//! just registered:
//!
//! ```
//! use std::time::Duration;
//!
//! use stepwise::{context::ScenarioContext, error::ConstructionError};
//!
//! fn declare(ctx: &mut ScenarioContext<Vec<u32>>) -> Result<(), ConstructionError> {
//!     ctx.given("an empty stack", |stack: &mut Vec<u32>| stack.clear())?;
//!     ctx.when("a value is pushed", |stack: &mut Vec<u32>| stack.push(1))?
//!         .with_timeout(Duration::from_secs(1))?;
//!     ctx.then("the stack has one value", |stack: &mut Vec<u32>| {
//!         if stack.len() == 1 { Ok(()) } else { Err("wrong length") }
//!     })?
//!     .in_isolation();
//!     Ok(())
//! }
//!
//! let mut ctx = ScenarioContext::new();
//! declare(&mut ctx).unwrap();
//! assert_eq!(ctx.len(), 3);
//! ```

use std::{fmt, sync::Arc, time::Duration};

use crate::{
    disposal::ReleaseOutcome,
    error::ConstructionError,
    step::{IntoStepOutput, Keyword, Step, message::render},
};

/// Collects the steps registered by one declaration invocation.
pub struct ScenarioContext<W> {
    steps: Vec<Step<W>>,
    arguments: Option<Vec<String>>,
}

impl<W> Default for ScenarioContext<W> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            arguments: None,
        }
    }
}

impl<W: 'static> ScenarioContext<W> {
    /// Context whose messages are used literally.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Context substituting `arguments` into `{n}` message placeholders.
    #[must_use]
    pub fn bound(arguments: Vec<String>) -> Self {
        Self {
            steps: Vec::new(),
            arguments: Some(arguments),
        }
    }

    /// Register a step under `keyword`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if the message is blank or names an
    /// unbound placeholder.
    pub fn step<F, R>(
        &mut self,
        keyword: Keyword,
        message: &str,
        body: F,
    ) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        let step = match &self.arguments {
            Some(arguments) => Step::new(keyword, &render(message, arguments)?, body)?,
            None => Step::new(keyword, message, body)?,
        };
        self.steps.push(step);
        let index = self.steps.len() - 1;
        Ok(StepHandle {
            step: &mut self.steps[index],
        })
    }

    /// Register an arrange step.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn given<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.step(Keyword::Given, message, body)
    }

    /// Register an act step.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn when<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.step(Keyword::When, message, body)
    }

    /// Register an assert step.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn then<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.step(Keyword::Then, message, body)
    }

    /// Register a step continuing the previous phase.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn and<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.step(Keyword::And, message, body)
    }

    /// Register a contrasting step continuing the previous phase.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn but<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.step(Keyword::But, message, body)
    }

    /// Register an assert step that runs in its own unit.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn then_in_isolation<F, R>(
        &mut self,
        message: &str,
        body: F,
    ) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        Ok(self.then(message, body)?.in_isolation())
    }

    /// Register an assert step that is skipped with `reason`.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step); also fails if `reason` is blank.
    pub fn then_skip<F, R>(
        &mut self,
        message: &str,
        reason: &str,
        body: F,
    ) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.then(message, body)?.skip(reason)
    }

    /// Older name for [`given`](Self::given).
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    #[deprecated(since = "0.1.0", note = "use `given`")]
    pub fn context<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.given(message, body)
    }

    /// Older name for [`then`](Self::then).
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    #[deprecated(since = "0.1.0", note = "use `then`")]
    pub fn observation<F, R>(
        &mut self,
        message: &str,
        body: F,
    ) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.then(message, body)
    }

    /// Older name for [`then_in_isolation`](Self::then_in_isolation).
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    #[deprecated(since = "0.1.0", note = "use `then_in_isolation`")]
    pub fn assert<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.then_in_isolation(message, body)
    }

    /// Older name for [`then_skip`](Self::then_skip) with the reason `"todo"`.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    #[deprecated(since = "0.1.0", note = "use `then_skip`")]
    pub fn todo<F, R>(&mut self, message: &str, body: F) -> Result<StepHandle<'_, W>, ConstructionError>
    where
        F: Fn(&mut W) -> R + Send + Sync + 'static,
        R: IntoStepOutput,
    {
        self.then_skip(message, "todo", body)
    }

    /// Number of steps registered so far.
    #[must_use]
    pub fn len(&self) -> usize { self.steps.len() }

    /// Returns `true` if no steps have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// Finish registration, freezing the steps for expansion.
    #[must_use]
    pub fn into_steps(self) -> Vec<Arc<Step<W>>> {
        self.steps.into_iter().map(Arc::new).collect()
    }
}

impl<W> fmt::Debug for ScenarioContext<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("steps", &self.steps)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Adjusts the step most recently registered on a [`ScenarioContext`].
pub struct StepHandle<'a, W> {
    step: &'a mut Step<W>,
}

impl<W: 'static> StepHandle<'_, W> {
    /// Run the step in its own freshly built unit.
    pub fn in_isolation(self) -> Self {
        self.step.mark_isolated();
        self
    }

    /// Bound the step's execution time.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::ZeroTimeout`] if `limit` is zero.
    pub fn with_timeout(self, limit: Duration) -> Result<Self, ConstructionError> {
        self.step.set_timeout(limit)?;
        Ok(self)
    }

    /// Skip the step with `reason`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptySkipReason`] if `reason` is blank.
    pub fn skip(self, reason: &str) -> Result<Self, ConstructionError> {
        self.step.set_skip_reason(reason.to_owned())?;
        Ok(self)
    }

    /// Run `action` at teardown if the step completes.
    pub fn teardown<F, R>(self, action: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: ReleaseOutcome,
    {
        self.step.push_teardown(action);
        self
    }

    /// Name of the step.
    #[must_use]
    pub fn name(&self) -> &str { self.step.name() }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn names<W>(ctx: ScenarioContext<W>) -> Vec<String>
    where
        W: 'static,
    {
        ctx.into_steps()
            .iter()
            .map(|s| s.name().to_owned())
            .collect()
    }

    #[test]
    fn keywords_prefix_messages() {
        let mut ctx = ScenarioContext::<()>::new();
        ctx.given("a", |_| ()).expect("given");
        ctx.when("b", |_| ()).expect("when");
        ctx.then("c", |_| ()).expect("then");
        ctx.and("d", |_| ()).expect("and");
        ctx.but("e", |_| ()).expect("but");
        assert_eq!(names(ctx), ["Given a", "When b", "Then c", "And d", "But e"]);
    }

    #[test]
    fn handle_adjusts_latest_step() {
        let mut ctx = ScenarioContext::<()>::new();
        ctx.given("a", |_| ()).expect("given");
        let handle = ctx
            .then("b", |_| ())
            .expect("then")
            .in_isolation()
            .with_timeout(Duration::from_millis(5))
            .expect("timeout")
            .teardown(|| ());
        assert_eq!(handle.name(), "Then b");

        let steps = ctx.into_steps();
        assert!(!steps[0].is_isolated());
        assert!(steps[1].is_isolated());
        assert_eq!(steps[1].timeout(), Some(Duration::from_millis(5)));
        assert_eq!(steps[1].teardowns().len(), 1);
    }

    #[test]
    fn convenience_registrations_set_flags() {
        let mut ctx = ScenarioContext::<()>::new();
        ctx.then_in_isolation("isolated", |_| ()).expect("isolated");
        ctx.then_skip("skipped", "not ready", |_| ()).expect("skipped");
        let steps = ctx.into_steps();
        assert!(steps[0].is_isolated());
        assert_eq!(steps[1].skip_reason(), Some("not ready"));
    }

    #[test]
    #[allow(deprecated)]
    fn deprecated_names_map_to_current_ones() {
        let mut ctx = ScenarioContext::<()>::new();
        ctx.context("a", |_| ()).expect("context");
        ctx.observation("b", |_| ()).expect("observation");
        ctx.assert("c", |_| ()).expect("assert");
        ctx.todo("d", |_| ()).expect("todo");
        let steps = ctx.into_steps();
        assert_eq!(steps[0].name(), "Given a");
        assert_eq!(steps[1].name(), "Then b");
        assert!(steps[2].is_isolated());
        assert_eq!(steps[3].skip_reason(), Some("todo"));
    }

    #[rstest]
    #[case::unbound(None, "Given {0} items")]
    #[case::bound(Some(vec!["3".to_owned()]), "Given 3 items")]
    fn placeholders_render_only_when_bound(
        #[case] arguments: Option<Vec<String>>,
        #[case] expected: &str,
    ) {
        let mut ctx = match arguments {
            Some(arguments) => ScenarioContext::<()>::bound(arguments),
            None => ScenarioContext::new(),
        };
        ctx.given("{0} items", |_| ()).expect("given");
        assert_eq!(names(ctx), [expected]);
    }

    #[rstest]
    #[case::blank_message("  ", "reason")]
    #[case::blank_reason("message", "")]
    fn invalid_registrations_fail_immediately(#[case] message: &str, #[case] reason: &str) {
        let mut ctx = ScenarioContext::<()>::new();
        assert!(ctx.then_skip(message, reason, |_| ()).is_err());
    }
}
