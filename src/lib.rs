#![doc(html_root_url = "https://docs.rs/stepwise/latest")]
//! Public API for the `stepwise` library.
//!
//! `stepwise` runs behaviour-driven scenarios. A scenario declaration
//! registers named steps on a [`ScenarioContext`]; the engine splits the
//! resulting sequence into independent [`ExecutionUnit`]s wherever a step
//! asks for isolation, runs each unit against a fresh world, and releases
//! every resource the unit's steps acquired in reverse acquisition order.

pub mod binding;
pub mod config;
pub mod context;
pub mod disposal;
pub mod error;
pub mod executor;
pub mod expander;
pub mod feature;
pub mod hooks;
pub mod metrics;
pub mod naming;
pub mod panic;
pub mod registry;
pub mod runner;
pub mod step;
pub mod unit;

pub use binding::{Binding, ExampleValues, ParameterBinder};
pub use config::RunnerConfig;
pub use context::{ScenarioContext, StepHandle};
pub use disposal::{Acquired, DisposalRegistry, OnRelease, Resource};
pub use error::{BoxError, ConstructionError, DisposalFailure, RegistryError, StepError};
pub use executor::{Executed, StepExecutor};
pub use expander::{ContextExpander, expand};
pub use feature::{Feature, PreparedUnit, Scenario};
pub use hooks::RunHooks;
pub use naming::{UnitNamer, UnitNames};
pub use registry::{FeatureRegistry, FeatureSource, RunnableUnit};
pub use runner::{RunSummary, Runner, StepOutcome, StepReport, UnitReport, UnitResult, UnitRunner};
pub use step::{Keyword, Step};
pub use unit::{ExecutionUnit, UnitKind};
