//! Resource lifetimes across execution units.
//!
//! Every unit acquires its own resources and releases them, most recent
//! first, whether it passed, failed or timed out.

use std::time::Duration;

use rstest::rstest;
use stepwise::{Feature, Scenario, StepOutcome, UnitResult};
use stepwise_testing::{Event, EventLog, event_log, outcomes, run_feature, unit_names};

/// Events of one unit acquiring `r1` then `r2` before running `last`.
fn unit_lifecycle(last: &str) -> Vec<Event> {
    vec![
        Event::constructed("r1"),
        Event::constructed("r2"),
        Event::ran(last),
        Event::disposed("r2"),
        Event::disposed("r1"),
    ]
}

#[rstest]
#[tokio::test]
async fn isolated_unit_replays_prefix_and_tears_down_before_the_main_unit(event_log: EventLog) {
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Disposal").scenario(Scenario::new("two contexts", move |ctx| {
        let (a, b, c1, c2) = (sink.clone(), sink.clone(), sink.clone(), sink.clone());
        ctx.given("A", move |_| a.acquire("r1"))?;
        ctx.when("B", move |_| b.acquire("r2"))?;
        ctx.then_in_isolation("C1", move |_| c1.ran("C1"))?;
        ctx.then("C2", move |_| c2.ran("C2"))?;
        Ok(())
    }));

    let summary = run_feature(feature).await;

    assert_eq!(
        unit_names(&summary),
        ["Given A, When B | Then C1", "Given A, When B, Then C2"]
    );
    assert!(summary.is_success());
    let expected: Vec<_> = [unit_lifecycle("C1"), unit_lifecycle("C2")].concat();
    assert_eq!(event_log.events(), expected);
    assert_eq!(event_log.constructed().len(), 4);
    assert_eq!(event_log.disposed().len(), 4);
}

#[rstest]
#[tokio::test]
async fn many_resources_from_one_step_release_in_reverse(event_log: EventLog) {
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Disposal").scenario(Scenario::new("bulk", move |ctx| {
        let s = sink.clone();
        ctx.given("three disks", move |_| s.acquire_all(&["d1", "d2", "d3"]))?;
        Ok(())
    }));

    run_feature(feature).await;

    assert_eq!(event_log.disposed(), ["d3", "d2", "d1"]);
}

#[rstest]
#[case::failure(false)]
#[case::timeout(true)]
#[tokio::test]
async fn teardown_runs_after_early_stop(event_log: EventLog, #[case] times_out: bool) {
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Disposal").scenario(Scenario::new("stopping", move |ctx| {
        let (a, b, late) = (sink.clone(), sink.clone(), sink.clone());
        ctx.given("r1", move |_| a.acquire("r1"))?;
        ctx.and("r2", move |_| b.acquire("r2"))?;
        if times_out {
            ctx.when("it hangs", |_| std::thread::sleep(Duration::from_millis(300)))?
                .with_timeout(Duration::from_millis(20))?;
        } else {
            ctx.when("it breaks", |_| Err::<(), _>("broken"))?;
        }
        ctx.then("r3", move |_| late.acquire("r3"))?;
        Ok(())
    }));

    let summary = run_feature(feature).await;

    let report = &summary.reports()[0];
    assert!(report.result.is_failure());
    assert_eq!(outcomes(report)[3], StepOutcome::NotRun);
    assert_eq!(event_log.constructed(), ["r1", "r2"]);
    assert_eq!(event_log.disposed(), ["r2", "r1"]);
}

#[rstest]
#[tokio::test]
async fn release_failures_are_recorded_without_stopping_teardown(event_log: EventLog) {
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Disposal").scenario(Scenario::new("leaky", move |ctx| {
        let (a, b, c) = (sink.clone(), sink.clone(), sink.clone());
        ctx.given("r1", move |_| a.acquire("r1"))?;
        ctx.and("r2", move |_| b.acquire_failing("r2", "device busy"))?;
        ctx.and("r3", move |_| c.acquire("r3"))?;
        Ok(())
    }));

    let summary = run_feature(feature).await;

    let report = &summary.reports()[0];
    assert_eq!(report.result, UnitResult::Passed);
    assert_eq!(event_log.disposed(), ["r3", "r2", "r1"]);
    assert_eq!(report.disposal_failures.len(), 1);
    assert_eq!(report.disposal_failures[0].resource, "r2");
    assert_eq!(report.disposal_failures[0].source.to_string(), "device busy");
    assert!(!summary.is_success());
}

#[rstest]
#[tokio::test]
async fn teardown_actions_release_after_their_step_resources(event_log: EventLog) {
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Disposal").scenario(Scenario::new("teardown", move |ctx| {
        let (a, b, t) = (sink.clone(), sink.clone(), sink.clone());
        ctx.given("r1", move |_| a.acquire("r1"))?
            .teardown(move || t.record(Event::disposed("teardown")));
        ctx.and("r2", move |_| b.acquire("r2"))?;
        ctx.then_skip("skipped", "later", |_| ())?
            .teardown(|| -> Result<(), String> { Err("never runs".into()) });
        Ok(())
    }));

    let summary = run_feature(feature).await;

    assert!(summary.is_success());
    assert_eq!(event_log.disposed(), ["r2", "teardown", "r1"]);
}
