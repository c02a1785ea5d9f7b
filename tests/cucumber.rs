//! Cucumber test runner for the behavioural suite.
//!
//! Runs each feature file against [`StepwiseWorld`]:
//! ```text
//! tests/features/expansion.feature -> splitting declarations into units
//! tests/features/disposal.feature  -> releasing resources per unit
//! ```

mod steps;

use cucumber::World;
use world::StepwiseWorld;

#[tokio::main]
async fn main() {
    StepwiseWorld::run("tests/features/expansion.feature").await;
    StepwiseWorld::run("tests/features/disposal.feature").await;
}
