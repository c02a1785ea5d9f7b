//! Features: named groups of scenarios sharing a world type and background.
//!
//! ```
//! use stepwise::{
//!     feature::{Feature, Scenario},
//!     registry::FeatureSource,
//! };
//!
//! let feature = Feature::<Vec<&str>>::new("Stack")
//!     .background(|ctx| {
//!         ctx.given("an empty stack", |s: &mut Vec<&str>| s.clear())?;
//!         Ok(())
//!     })
//!     .scenario(Scenario::new("pushing", |ctx| {
//!         ctx.when("an item is pushed", |s: &mut Vec<&str>| s.push("item"))?;
//!         ctx.then_in_isolation("the stack has one item", |s: &mut Vec<&str>| {
//!             if s.len() == 1 { Ok(()) } else { Err("wrong size") }
//!         })?;
//!         Ok(())
//!     }));
//!
//! let units = feature.materialize().unwrap();
//! let names: Vec<_> = units.iter().map(|u| u.name().to_owned()).collect();
//! assert_eq!(
//!     names,
//!     [
//!         "Stack / pushing / Given an empty stack, When an item is pushed | Then the stack has one item",
//!         "Stack / pushing / Given an empty stack, When an item is pushed",
//!     ]
//! );
//! ```

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use tracing::debug;

use crate::{
    binding::{ExampleValues, Invocation, ParameterBinder},
    context::ScenarioContext,
    error::{ConstructionError, RegistryError},
    expander::ContextExpander,
    naming::{UnitNamer, UnitNames},
    registry::{FeatureSource, RunnableUnit},
    runner::{UnitReport, UnitRunner},
    unit::ExecutionUnit,
};

/// Separator between the parts of a qualified unit name.
pub const QUALIFIER_SEPARATOR: &str = " / ";

type Declaration<W> =
    Arc<dyn Fn(&mut ScenarioContext<W>) -> Result<(), ConstructionError> + Send + Sync>;

type BoundDeclaration<W> =
    Arc<dyn Fn() -> Result<Vec<Invocation<W>>, ConstructionError> + Send + Sync>;

type WorldFactory<W> = Arc<dyn Fn() -> W + Send + Sync>;

enum Source<W> {
    Plain(Declaration<W>),
    Bound(BoundDeclaration<W>),
}

/// A named scenario declaration, optionally bound to examples.
pub struct Scenario<W> {
    name: String,
    source: Source<W>,
}

impl<W: 'static> Scenario<W> {
    /// Declare a scenario invoked once.
    pub fn new<F>(name: impl Into<String>, declare: F) -> Self
    where
        F: Fn(&mut ScenarioContext<W>) -> Result<(), ConstructionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            source: Source::Plain(Arc::new(declare)),
        }
    }

    /// Declare a scenario invoked once per example.
    ///
    /// ```
    /// use stepwise::feature::Scenario;
    ///
    /// let scenario = Scenario::with_examples(
    ///     "addition",
    ///     [(1, 2, 3), (2, 2, 4)],
    ///     |ctx, &(a, b, sum): &(i32, i32, i32)| {
    ///         ctx.given("{0} plus {1}", move |total: &mut i32| *total = a + b)?;
    ///         ctx.then("the total is {2}", move |total: &mut i32| {
    ///             if *total == sum { Ok(()) } else { Err("wrong total") }
    ///         })?;
    ///         Ok(())
    ///     },
    /// );
    /// assert_eq!(scenario.name(), "addition");
    /// ```
    pub fn with_examples<E, F>(
        name: impl Into<String>,
        examples: impl IntoIterator<Item = E>,
        declare: F,
    ) -> Self
    where
        E: ExampleValues,
        F: Fn(&mut ScenarioContext<W>, &E) -> Result<(), ConstructionError> + Send + Sync + 'static,
    {
        let binder = ParameterBinder::new(examples);
        Self {
            name: name.into(),
            source: Source::Bound(Arc::new(move || binder.bind(&declare))),
        }
    }

    /// The scenario name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    fn invocations(&self) -> Result<Vec<Invocation<W>>, ConstructionError> {
        match &self.source {
            Source::Plain(declare) => {
                let mut ctx = ScenarioContext::new();
                declare(&mut ctx)?;
                Ok(vec![Invocation::new(None, ctx.into_steps())])
            }
            Source::Bound(bind) => bind(),
        }
    }
}

impl<W> fmt::Debug for Scenario<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("bound", &matches!(self.source, Source::Bound(_)))
            .finish()
    }
}

/// Scenarios sharing a world factory and an optional background.
pub struct Feature<W> {
    name: String,
    world: WorldFactory<W>,
    background: Option<Declaration<W>>,
    scenarios: Vec<Scenario<W>>,
}

impl<W: Default + Send + 'static> Feature<W> {
    /// Feature whose units start from `W::default()`.
    pub fn new(name: impl Into<String>) -> Self { Self::with_world(name, W::default) }
}

impl<W: Send + 'static> Feature<W> {
    /// Feature whose units start from a world built by `factory`.
    pub fn with_world<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> W + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            world: Arc::new(factory),
            background: None,
            scenarios: Vec::new(),
        }
    }

    /// Steps prepended to every scenario invocation.
    #[must_use]
    pub fn background<F>(mut self, declare: F) -> Self
    where
        F: Fn(&mut ScenarioContext<W>) -> Result<(), ConstructionError> + Send + Sync + 'static,
    {
        self.background = Some(Arc::new(declare));
        self
    }

    /// Add a scenario after those already added.
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario<W>) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// The feature name.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// The feature's scenarios in declaration order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario<W>] { &self.scenarios }

    /// Expand every scenario into prepared units.
    ///
    /// Units are ordered by scenario, then example, then expansion order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Construction`] naming the scenario whose
    /// declaration or background registered an invalid step.
    pub fn prepare(&self) -> Result<Vec<PreparedUnit<W>>, RegistryError> {
        let mut prepared = Vec::new();
        for scenario in &self.scenarios {
            let wrap = |source| RegistryError::Construction {
                feature: self.name.clone(),
                scenario: scenario.name.clone(),
                source,
            };
            for mut invocation in scenario.invocations().map_err(wrap)? {
                if let Some(declare) = &self.background {
                    let mut ctx = ScenarioContext::new();
                    declare(&mut ctx).map_err(wrap)?;
                    invocation.prepend(&ctx.into_steps());
                }
                let namer = invocation.binding().map_or_else(UnitNamer::new, UnitNamer::bound);
                let units = ContextExpander::new(namer).expand(invocation.steps());
                debug!(
                    feature = %self.name,
                    scenario = %scenario.name,
                    units = units.len(),
                    "scenario expanded"
                );
                prepared.extend(units.into_iter().map(|unit| PreparedUnit {
                    name: qualified(&self.name, &scenario.name, unit.name()),
                    unit,
                    world: Arc::clone(&self.world),
                }));
            }
        }
        Ok(prepared)
    }
}

fn qualified(feature: &str, scenario: &str, unit: &str) -> String {
    if unit.is_empty() {
        format!("{feature}{QUALIFIER_SEPARATOR}{scenario}")
    } else {
        format!("{feature}{QUALIFIER_SEPARATOR}{scenario}{QUALIFIER_SEPARATOR}{unit}")
    }
}

impl<W> fmt::Debug for Feature<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("background", &self.background.is_some())
            .field("scenarios", &self.scenarios)
            .finish_non_exhaustive()
    }
}

impl<W: Send + 'static> FeatureSource for Feature<W> {
    fn name(&self) -> &str { &self.name }

    fn materialize(&self) -> Result<Vec<Box<dyn RunnableUnit>>, RegistryError> {
        Ok(self
            .prepare()?
            .into_iter()
            .map(|unit| Box::new(unit) as Box<dyn RunnableUnit>)
            .collect())
    }
}

/// An execution unit bound to its feature's world factory.
pub struct PreparedUnit<W> {
    name: String,
    unit: ExecutionUnit<W>,
    world: WorldFactory<W>,
}

impl<W> PreparedUnit<W> {
    /// The expanded unit.
    #[must_use]
    pub fn unit(&self) -> &ExecutionUnit<W> { &self.unit }
}

impl<W> fmt::Debug for PreparedUnit<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedUnit")
            .field("name", &self.name)
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

impl<W: Send + 'static> RunnableUnit for PreparedUnit<W> {
    fn name(&self) -> &str { &self.name }

    fn names(&self) -> &UnitNames { self.unit.names() }

    fn run(self: Box<Self>, runner: UnitRunner) -> BoxFuture<'static, UnitReport> {
        Box::pin(async move {
            let world = Arc::clone(&self.world);
            runner.run(&self.name, &self.unit, move || world()).await
        })
    }
}
