//! Utilities for observing `stepwise` features during tests.
//!
//! Resources created through an [`EventLog`] record their construction and
//! release, so tests can assert on lifetimes without any process-wide state:
//!
//! ```rust
//! use stepwise::{Feature, Scenario};
//! use stepwise_testing::{Event, EventLog, run_feature};
//!
//! # async fn example() {
//! let log = EventLog::new();
//! let sink = log.clone();
//! let feature = Feature::<()>::new("Disk").scenario(Scenario::new("mounting", move |ctx| {
//!     let sink = sink.clone();
//!     ctx.given("a disk", move |_| sink.acquire("disk"))?;
//!     Ok(())
//! }));
//!
//! run_feature(feature).await;
//! assert_eq!(
//!     log.events(),
//!     [Event::constructed("disk"), Event::disposed("disk")]
//! );
//! # }
//! ```

mod events;
pub mod fixtures;
pub mod metrics;
mod run;

pub use events::{Event, EventLog, TrackedResource};
pub use fixtures::{event_log, runner_config};
pub use run::{outcomes, run_feature, run_feature_blocking, run_feature_with, unit_names};
