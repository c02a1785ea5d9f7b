//! Step timeouts: abandonment of slow bodies and the leak boundary.

use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use rstest::rstest;
use stepwise::{Feature, RunnerConfig, Scenario, StepOutcome, UnitResult};
use stepwise_testing::{EventLog, event_log, outcomes, run_feature, run_feature_with};

#[rstest]
#[tokio::test]
async fn timed_out_unit_carries_configured_limit(event_log: EventLog) {
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Timeouts").scenario(Scenario::new("slow", move |ctx| {
        let late = sink.clone();
        ctx.when("it takes too long", |_| thread::sleep(Duration::from_millis(300)))?
            .with_timeout(Duration::from_millis(25))?;
        ctx.then("it never gets here", move |_| late.ran("then"))?;
        Ok(())
    }));

    let summary = run_feature(feature).await;

    let report = &summary.reports()[0];
    assert_eq!(report.result, UnitResult::TimedOut(Duration::from_millis(25)));
    assert_eq!(
        outcomes(report),
        [
            StepOutcome::TimedOut(Duration::from_millis(25)),
            StepOutcome::NotRun
        ]
    );
    assert!(event_log.events().is_empty());
}

#[rstest]
#[tokio::test]
async fn abandoned_body_keeps_running_and_its_resources_are_never_released(
    event_log: EventLog,
) {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&finished);
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Timeouts").scenario(Scenario::new("leak", move |ctx| {
        let (flag, sink) = (Arc::clone(&flag), sink.clone());
        ctx.given("a slow acquisition", move |_| {
            thread::sleep(Duration::from_millis(100));
            flag.store(true, Ordering::SeqCst);
            sink.acquire("late")
        })?
        .with_timeout(Duration::from_millis(10))?;
        Ok(())
    }));

    let summary = run_feature(feature).await;
    assert!(matches!(summary.reports()[0].result, UnitResult::TimedOut(_)));
    assert!(!finished.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(finished.load(Ordering::SeqCst));
    assert_eq!(event_log.constructed(), ["late"]);
    assert!(event_log.disposed().is_empty());
}

#[tokio::test]
async fn default_timeout_applies_only_to_unbounded_steps() {
    let feature = Feature::<()>::new("Timeouts").scenario(Scenario::new("mixed", |ctx| {
        ctx.given("a step with a generous bound", |_| {
            thread::sleep(Duration::from_millis(60));
        })?
        .with_timeout(Duration::from_secs(5))?;
        ctx.when("a slow step without one", |_| {
            thread::sleep(Duration::from_millis(300));
        })?;
        Ok(())
    }));

    let config = RunnerConfig::new().with_default_step_timeout(Duration::from_millis(30));
    let summary = run_feature_with(feature, config).await;

    let report = &summary.reports()[0];
    assert_eq!(
        outcomes(report),
        [
            StepOutcome::Passed,
            StepOutcome::TimedOut(Duration::from_millis(30))
        ]
    );
}

#[tokio::test]
async fn fast_timed_step_passes() {
    let feature = Feature::<u8>::new("Timeouts").scenario(Scenario::new("fast", |ctx| {
        ctx.given("a quick step", |n: &mut u8| *n = 7)?
            .with_timeout(Duration::from_secs(5))?;
        ctx.then("its effect is visible", |n: &mut u8| {
            if *n == 7 { Ok(()) } else { Err("world not updated") }
        })?;
        Ok(())
    }));

    let summary = run_feature(feature).await;

    assert!(summary.is_success());
}

#[rstest]
#[tokio::test]
async fn late_result_is_a_timeout_while_another_unit_blocks_the_runtime(event_log: EventLog) {
    let sink = event_log.clone();
    let feature = Feature::<()>::new("Concurrent")
        .scenario(Scenario::new("timed", move |ctx| {
            let sink = sink.clone();
            ctx.when("it overruns", move |_| {
                thread::sleep(Duration::from_millis(100));
                sink.acquire("late")
            })?
            .with_timeout(Duration::from_millis(20))?;
            Ok(())
        }))
        .scenario(Scenario::new("blocking", |ctx| {
            ctx.given("it holds the thread", |_| {
                thread::sleep(Duration::from_millis(300));
            })?;
            Ok(())
        }));

    let config = RunnerConfig::new().with_concurrency(NonZeroUsize::new(2).expect("non-zero"));
    let summary = run_feature_with(feature, config).await;

    let timed = summary
        .get("Concurrent / timed / When it overruns")
        .expect("timed unit reported");
    assert_eq!(timed.result, UnitResult::TimedOut(Duration::from_millis(20)));
    assert_eq!(
        outcomes(timed),
        [StepOutcome::TimedOut(Duration::from_millis(20))]
    );
    let blocking = summary
        .get("Concurrent / blocking / Given it holds the thread")
        .expect("blocking unit reported");
    assert_eq!(blocking.result, UnitResult::Passed);
    assert!(event_log.disposed().is_empty());
}
