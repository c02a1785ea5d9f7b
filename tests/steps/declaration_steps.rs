//! Steps building the declaration under test and running it.
use cucumber::{given, when};

use crate::world::{DeclaredStep, StepwiseWorld};

#[given(expr = "a step {string}")]
fn plain_step(world: &mut StepwiseWorld, message: String) {
    world.declare(DeclaredStep::named(message));
}

#[given(expr = "a step {string} acquiring {string}")]
fn acquiring_step(world: &mut StepwiseWorld, message: String, resource: String) {
    world.declare(DeclaredStep {
        resource: Some(resource),
        ..DeclaredStep::named(message)
    });
}

#[given(expr = "a failing step {string}")]
fn failing_step(world: &mut StepwiseWorld, message: String) {
    world.declare(DeclaredStep {
        fails: true,
        ..DeclaredStep::named(message)
    });
}

#[given(expr = "a step {string} skipped because {string}")]
fn skipped_step(world: &mut StepwiseWorld, message: String, reason: String) {
    world.declare(DeclaredStep {
        skip: Some(reason),
        ..DeclaredStep::named(message)
    });
}

#[given(expr = "an isolated Then step {string}")]
fn isolated_step(world: &mut StepwiseWorld, message: String) {
    world.declare(DeclaredStep {
        isolated: true,
        ..DeclaredStep::named(message)
    });
}

#[given(expr = "an isolated Then step {string} skipped because {string}")]
fn isolated_skipped_step(world: &mut StepwiseWorld, message: String, reason: String) {
    world.declare(DeclaredStep {
        isolated: true,
        skip: Some(reason),
        ..DeclaredStep::named(message)
    });
}

#[when("the scenario runs")]
async fn scenario_runs(world: &mut StepwiseWorld) { world.run().await; }
