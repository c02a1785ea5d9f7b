//! Assertions on the reported units and recorded resource events.
use cucumber::then;

use crate::world::StepwiseWorld;

fn names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[then(expr = "{int} unit(s) is/are reported")]
fn units_reported(world: &mut StepwiseWorld, count: usize) {
    assert_eq!(world.summary().reports().len(), count);
}

#[then(expr = "unit {int} is named {string}")]
fn unit_named(world: &mut StepwiseWorld, position: usize, name: String) {
    assert_eq!(world.unit(position).names.display(), name);
}

#[then(expr = "unit {int} result is {word}")]
fn unit_result(world: &mut StepwiseWorld, position: usize, label: String) {
    assert_eq!(world.unit(position).result.label(), label);
}

#[then(expr = "the resources were released in order {string}")]
fn released_in_order(world: &mut StepwiseWorld, order: String) {
    assert_eq!(world.log().disposed(), names(&order));
}

#[then(expr = "the resources were constructed in order {string}")]
fn constructed_in_order(world: &mut StepwiseWorld, order: String) {
    assert_eq!(world.log().constructed(), names(&order));
}
