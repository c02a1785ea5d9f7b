//! Splitting a declared step sequence into execution units.
//!
//! The main unit runs every non-isolated step in declaration order. Each
//! isolated step gets a unit of its own that replays the non-isolated steps
//! declared before it and then runs the isolated step alone. Isolated units
//! come first, in declaration order, and the main unit last. Run one at a
//! time, every isolated unit has finished and torn down before the main unit
//! reaches the steps declared after it.

use std::sync::Arc;

use tracing::debug;

use crate::{
    naming::UnitNamer,
    step::Step,
    unit::{ExecutionUnit, UnitKind},
};

/// Expand `steps` into execution units with unbound names.
///
/// ```
/// use stepwise::{
///     expander::expand,
///     step::{Keyword, Step},
/// };
///
/// let units = expand(vec![
///     Step::new(Keyword::Given, "a", |_: &mut ()| ()).unwrap(),
///     Step::new(Keyword::Then, "b", |_: &mut ()| ()).unwrap().isolated(),
///     Step::new(Keyword::Then, "c", |_: &mut ()| ()).unwrap(),
/// ]);
/// let names: Vec<_> = units.iter().map(|u| u.name()).collect();
/// assert_eq!(names, ["Given a | Then b", "Given a, Then c"]);
/// ```
pub fn expand<W>(steps: Vec<Step<W>>) -> Vec<ExecutionUnit<W>> {
    let steps: Vec<_> = steps.into_iter().map(Arc::new).collect();
    ContextExpander::default().expand(&steps)
}

/// Splits step sequences on isolation markers.
#[derive(Clone, Debug, Default)]
pub struct ContextExpander {
    namer: UnitNamer,
}

impl ContextExpander {
    /// Create an expander naming units with `namer`.
    #[must_use]
    pub fn new(namer: UnitNamer) -> Self { Self { namer } }

    /// Expand one invocation's steps into its execution units.
    ///
    /// The main unit is always produced. An isolated unit is left out only
    /// when every step it would run is skipped.
    #[must_use]
    pub fn expand<W>(&self, steps: &[Arc<Step<W>>]) -> Vec<ExecutionUnit<W>> {
        let mut units = Vec::new();
        let mut prefix = Vec::new();
        for (position, step) in steps.iter().enumerate() {
            if !step.is_isolated() {
                prefix.push(Arc::clone(step));
                continue;
            }
            let all_skipped = prefix
                .iter()
                .chain(std::iter::once(step))
                .all(|s| s.skip_reason().is_some());
            if all_skipped {
                debug!(step = step.name(), "isolated unit omitted: every step is skipped");
                continue;
            }
            let names = self.namer.isolated(&prefix, step);
            let mut unit_steps = prefix.clone();
            unit_steps.push(Arc::clone(step));
            units.push(ExecutionUnit::new(
                UnitKind::Isolated { position },
                unit_steps,
                names,
            ));
        }

        let main_names = self.namer.main(&prefix);
        units.push(ExecutionUnit::new(UnitKind::Main, prefix, main_names));
        units
    }
}
