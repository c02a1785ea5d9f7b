//! Resource lifetimes: a shared arrangement, an isolated check, and a slow
//! step bounded by a timeout.

use std::time::Duration;

use stepwise::{Acquired, Feature, OnRelease, Scenario};
use tracing::info;

#[derive(Debug, Default)]
pub struct Workbench {
    open: Vec<&'static str>,
}

fn open(bench: &mut Workbench, name: &'static str) -> Acquired {
    bench.open.push(name);
    info!(resource = name, "opened");
    Acquired::one(OnRelease::new(name, move || info!(resource = name, "closed")))
}

pub fn feature() -> Feature<Workbench> {
    Feature::new("Workbench")
        .scenario(Scenario::new("Sharing a disk between checks", |ctx| {
            ctx.given("a disk", |bench: &mut Workbench| open(bench, "disk"))?;
            ctx.when("a file is opened on it", |bench: &mut Workbench| {
                open(bench, "file")
            })?
            .teardown(|| info!("file handle flushed"));
            ctx.then("both are open", |bench: &mut Workbench| {
                if bench.open == ["disk", "file"] {
                    Ok(())
                } else {
                    Err(format!("unexpected open set {:?}", bench.open))
                }
            })?;
            ctx.then_in_isolation("the file can be deleted", |bench: &mut Workbench| {
                bench.open.retain(|name| *name != "file");
            })?;
            Ok(())
        }))
        .scenario(Scenario::new("Waiting on a slow device", |ctx| {
            ctx.given("a slow device", |bench: &mut Workbench| open(bench, "device"))?;
            ctx.when("it is read", |_: &mut Workbench| {
                std::thread::sleep(Duration::from_millis(500));
            })?
            .with_timeout(Duration::from_millis(100))?;
            ctx.then("the read finished", |_: &mut Workbench| ())?;
            Ok(())
        }))
}
