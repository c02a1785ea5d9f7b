//! Data-driven scenarios: binding example values to a declaration.
//!
//! A scenario declared with examples is invoked once per example. Each
//! invocation sees its example's values, may use them in step messages
//! through `{n}` placeholders, and yields an independent step sequence whose
//! unit names carry the example's signature. Examples with identical values
//! also carry their 1-based position, e.g. `<u8>(1) #2`, so no two
//! invocations share a name.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{context::ScenarioContext, error::ConstructionError, step::Step};

/// A tuple of example values.
///
/// Implemented for tuples of one to eight elements whose members are
/// `Display + Debug + Clone + Send + Sync + 'static`.
pub trait ExampleValues: Send + Sync + 'static {
    /// Short names of the tuple's element types.
    fn type_names() -> Vec<String>;

    /// Each value as substituted into step messages.
    fn arguments(&self) -> Vec<String>;

    /// Each value as shown in unit names.
    fn literals(&self) -> Vec<String>;
}

macro_rules! impl_example_values {
    ($($name:ident),+) => {
        impl<$($name),+> ExampleValues for ($($name,)+)
        where
            $($name: fmt::Display + fmt::Debug + Send + Sync + 'static),+
        {
            fn type_names() -> Vec<String> {
                vec![$(short_type_name(std::any::type_name::<$name>())),+]
            }

            #[allow(non_snake_case, reason = "bindings reuse the type parameter names")]
            fn arguments(&self) -> Vec<String> {
                let ($($name,)+) = self;
                vec![$($name.to_string()),+]
            }

            #[allow(non_snake_case, reason = "bindings reuse the type parameter names")]
            fn literals(&self) -> Vec<String> {
                let ($($name,)+) = self;
                vec![$(format!("{:?}", $name)),+]
            }
        }
    };
}

impl_example_values!(A);
impl_example_values!(A, B);
impl_example_values!(A, B, C);
impl_example_values!(A, B, C, D);
impl_example_values!(A, B, C, D, E);
impl_example_values!(A, B, C, D, E, F);
impl_example_values!(A, B, C, D, E, F, G);
impl_example_values!(A, B, C, D, E, F, G, H);

/// Strip module paths from a type name, including inside generics.
///
/// ```
/// use stepwise::binding::short_type_name;
///
/// assert_eq!(short_type_name("alloc::vec::Vec<alloc::string::String>"), "Vec<String>");
/// assert_eq!(short_type_name("&str"), "&str");
/// ```
#[must_use]
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            segment_start = out.len();
        }
    }
    out
}

/// The values one scenario invocation was bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    type_names: Vec<String>,
    arguments: Vec<String>,
    literals: Vec<String>,
    ordinal: Option<usize>,
}

impl Binding {
    /// Capture the values of `example`.
    #[must_use]
    pub fn of<E: ExampleValues>(example: &E) -> Self {
        Self {
            type_names: E::type_names(),
            arguments: example.arguments(),
            literals: example.literals(),
            ordinal: None,
        }
    }

    fn numbered(mut self, ordinal: usize) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    /// Values substituted for `{n}` placeholders.
    #[must_use]
    pub fn arguments(&self) -> &[String] { &self.arguments }

    /// Short names of the bound types.
    #[must_use]
    pub fn type_names(&self) -> &[String] { &self.type_names }

    /// Position of the example, set only when another example has the
    /// same values.
    #[must_use]
    pub fn ordinal(&self) -> Option<usize> { self.ordinal }

    /// Suffix distinguishing this invocation, e.g. `<i32, String>(1, "a")`.
    #[must_use]
    pub fn signature(&self) -> String {
        let values = format!(
            "<{}>({})",
            self.type_names.join(", "),
            self.literals.join(", ")
        );
        match self.ordinal {
            Some(n) => format!("{values} #{n}"),
            None => values,
        }
    }
}

/// The step sequence produced by one invocation of a declaration.
pub struct Invocation<W> {
    binding: Option<Binding>,
    steps: Vec<Arc<Step<W>>>,
}

impl<W> Invocation<W> {
    pub(crate) fn new(binding: Option<Binding>, steps: Vec<Arc<Step<W>>>) -> Self {
        Self { binding, steps }
    }

    /// The values the invocation was bound to, if any.
    #[must_use]
    pub fn binding(&self) -> Option<&Binding> { self.binding.as_ref() }

    /// The declared steps, in order.
    #[must_use]
    pub fn steps(&self) -> &[Arc<Step<W>>] { &self.steps }

    /// Put `steps` ahead of the declared steps.
    pub(crate) fn prepend(&mut self, steps: &[Arc<Step<W>>]) {
        self.steps.splice(0..0, steps.iter().cloned());
    }
}

impl<W> fmt::Debug for Invocation<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("binding", &self.binding)
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Replays a declaration once per example.
#[derive(Clone, Debug)]
pub struct ParameterBinder<E> {
    examples: Vec<E>,
}

impl<E: ExampleValues> ParameterBinder<E> {
    /// Bind to `examples`, in order.
    pub fn new(examples: impl IntoIterator<Item = E>) -> Self {
        Self {
            examples: examples.into_iter().collect(),
        }
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize { self.examples.len() }

    /// Returns `true` if there are no examples.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.examples.is_empty() }

    /// Invoke `declare` once per example, synchronously and in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConstructionError`] raised by an invocation.
    pub fn bind<W, F>(&self, declare: F) -> Result<Vec<Invocation<W>>, ConstructionError>
    where
        W: 'static,
        F: Fn(&mut ScenarioContext<W>, &E) -> Result<(), ConstructionError>,
    {
        let bindings: Vec<_> = self.examples.iter().map(Binding::of).collect();
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        for binding in &bindings {
            *occurrences.entry(binding.signature()).or_default() += 1;
        }

        self.examples
            .iter()
            .zip(bindings)
            .enumerate()
            .map(|(index, (example, binding))| {
                let collides = occurrences
                    .get(&binding.signature())
                    .is_some_and(|&count| count > 1);
                let binding = if collides { binding.numbered(index + 1) } else { binding };
                let mut ctx = ScenarioContext::bound(binding.arguments().to_vec());
                declare(&mut ctx, example)?;
                Ok(Invocation::new(Some(binding), ctx.into_steps()))
            })
            .collect()
    }
}
