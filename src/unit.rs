//! Execution units: the independently run test cases produced by expansion.

use std::{fmt, sync::Arc};

use crate::{naming::UnitNames, step::Step};

/// Which part of an expansion a unit came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// Every non-isolated step of the invocation.
    Main,
    /// The shared prefix followed by one isolated step.
    Isolated {
        /// Position of the isolated step in the declared sequence.
        position: usize,
    },
}

/// An ordered group of steps run as one self-contained test case.
///
/// Units never share steps' resources or world state with each other; each
/// run builds a fresh world and a fresh disposal registry.
pub struct ExecutionUnit<W> {
    kind: UnitKind,
    steps: Vec<Arc<Step<W>>>,
    names: UnitNames,
}

impl<W> ExecutionUnit<W> {
    pub(crate) fn new(kind: UnitKind, steps: Vec<Arc<Step<W>>>, names: UnitNames) -> Self {
        Self { kind, steps, names }
    }

    /// Where this unit came from.
    #[must_use]
    pub fn kind(&self) -> UnitKind { self.kind }

    /// Steps executed by the unit, in order.
    #[must_use]
    pub fn steps(&self) -> &[Arc<Step<W>>] { &self.steps }

    /// Labels derived for the unit.
    #[must_use]
    pub fn names(&self) -> &UnitNames { &self.names }

    /// The unit's display name.
    #[must_use]
    pub fn name(&self) -> &str { self.names.display() }

    /// Number of steps in the unit.
    #[must_use]
    pub fn len(&self) -> usize { self.steps.len() }

    /// Returns `true` if the unit has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// Returns `true` if every step in the unit is skipped.
    #[must_use]
    pub fn is_fully_skipped(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.skip_reason().is_some())
    }
}

impl<W> fmt::Debug for ExecutionUnit<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionUnit")
            .field("kind", &self.kind)
            .field("name", &self.names.display())
            .field("steps", &self.steps.len())
            .finish()
    }
}
