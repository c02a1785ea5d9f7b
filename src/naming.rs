//! Names shown to hosts for execution units.
//!
//! A unit's display name is the names of its steps joined in order. An
//! isolated unit is named after its shared prefix and its isolated step. Two
//! further labels, the context and disposal names, mark the boundaries of the
//! shared prefix for diagnostics; they never denote a unit of their own.

use std::fmt;

use crate::{binding::Binding, step::Step};

/// Separator between step names within one unit name.
pub const STEP_SEPARATOR: &str = ", ";
/// Separator between a shared prefix and its isolated step.
pub const ISOLATED_SEPARATOR: &str = " | ";
/// Suffix of the label marking where a shared context is established.
pub const CONTEXT_SUFFIX: &str = " { (shared context)";
/// Suffix of the label marking where a shared context is torn down.
pub const DISPOSAL_SUFFIX: &str = " } (disposal)";

/// Every label derived for one execution unit.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UnitNames {
    display: String,
    context: Option<String>,
    disposal: Option<String>,
}

impl UnitNames {
    /// The unit's externally visible name.
    #[must_use]
    pub fn display(&self) -> &str { &self.display }

    /// Label for the start of the shared prefix of an isolated unit.
    #[must_use]
    pub fn context(&self) -> Option<&str> { self.context.as_deref() }

    /// Label for the teardown of the shared prefix of an isolated unit.
    #[must_use]
    pub fn disposal(&self) -> Option<&str> { self.disposal.as_deref() }
}

impl fmt::Display for UnitNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.display) }
}

/// Join step names with [`STEP_SEPARATOR`].
///
/// ```
/// assert_eq!(
///     stepwise::naming::join(["Given a blog", "When I post"]),
///     "Given a blog, When I post"
/// );
/// ```
pub fn join<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(STEP_SEPARATOR)
}

/// Derives [`UnitNames`] for the units of one scenario invocation.
#[derive(Clone, Debug, Default)]
pub struct UnitNamer {
    signature: Option<String>,
}

impl UnitNamer {
    /// Namer for an unbound invocation.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Namer appending the signature of `binding` to every label.
    #[must_use]
    pub fn bound(binding: &Binding) -> Self {
        Self {
            signature: Some(binding.signature()),
        }
    }

    /// Name the main unit from the steps it executes.
    #[must_use]
    pub fn main<W>(&self, steps: &[impl AsRef<Step<W>>]) -> UnitNames {
        UnitNames {
            display: self.sign(join(steps.iter().map(|s| s.as_ref().name()))),
            context: None,
            disposal: None,
        }
    }

    /// Name the unit running `prefix` followed by the isolated `step`.
    #[must_use]
    pub fn isolated<W>(&self, prefix: &[impl AsRef<Step<W>>], step: &Step<W>) -> UnitNames {
        let shared = join(prefix.iter().map(|s| s.as_ref().name()));
        let display = if shared.is_empty() {
            step.name().to_owned()
        } else {
            format!("{shared}{ISOLATED_SEPARATOR}{}", step.name())
        };
        UnitNames {
            display: self.sign(display),
            context: Some(self.sign(format!("{shared}{CONTEXT_SUFFIX}"))),
            disposal: Some(self.sign(format!("{shared}{DISPOSAL_SUFFIX}"))),
        }
    }

    fn sign(&self, name: String) -> String {
        match &self.signature {
            Some(signature) => format!("{name} {signature}"),
            None => name,
        }
    }
}
