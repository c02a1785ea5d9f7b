//! Scenarios bound to examples.

use std::sync::{Arc, Mutex};

use rstest::rstest;
use stepwise::{Feature, Scenario, UnitResult};
use stepwise_testing::{EventLog, event_log, run_feature, unit_names};

#[tokio::test]
async fn each_example_is_named_after_its_values() {
    let feature = Feature::<()>::new("Examples").scenario(Scenario::with_examples(
        "formatting",
        [(1_i32, 2_i64, "three")],
        |ctx, _: &(i32, i64, &'static str)| {
            ctx.given("{0}, {1} and {2}", |_| ())?;
            Ok(())
        },
    ));

    let summary = run_feature(feature).await;

    assert_eq!(
        unit_names(&summary),
        ["Given 1, 2 and three <i32, i64, &str>(1, 2, \"three\")"]
    );
}

#[rstest]
#[tokio::test]
async fn three_examples_give_three_independent_expansions(event_log: EventLog) {
    let sink = event_log.clone();
    let feature = Feature::<u32>::new("Examples").scenario(Scenario::with_examples(
        "counting",
        [(1_u32,), (2,), (3,)],
        move |ctx, &(n,): &(u32,)| {
            let (a, b) = (sink.clone(), sink.clone());
            ctx.given("a counter set to {0}", move |count: &mut u32| {
                *count += n;
                a.acquire(&format!("counter {n}"))
            })?;
            ctx.then_in_isolation("the counter holds {0}", move |count: &mut u32| {
                b.ran(&format!("check {n}"));
                if *count == n { Ok(()) } else { Err(format!("counter is {count}")) }
            })?;
            Ok(())
        },
    ));

    let summary = run_feature(feature).await;

    assert_eq!(summary.reports().len(), 6);
    assert!(summary.is_success(), "{:?}", summary.reports());
    assert_eq!(
        event_log.disposed(),
        ["counter 1", "counter 1", "counter 2", "counter 2", "counter 3", "counter 3"]
    );
}

#[tokio::test]
async fn failing_example_does_not_affect_the_others() {
    let feature = Feature::<()>::new("Examples").scenario(Scenario::with_examples(
        "positive numbers",
        [(1_i8,), (-1,), (2,)],
        |ctx, &(n,): &(i8,)| {
            ctx.then("{0} is positive", move |_| {
                if n > 0 { Ok(()) } else { Err("not positive") }
            })?;
            Ok(())
        },
    ));

    let summary = run_feature(feature).await;

    let results: Vec<_> = summary.reports().iter().map(|r| r.result.clone()).collect();
    assert!(matches!(results[0], UnitResult::Passed));
    assert!(matches!(results[1], UnitResult::Failed(ref m) if m.contains("not positive")));
    assert!(matches!(results[2], UnitResult::Passed));
}

#[tokio::test]
async fn declaration_runs_once_per_example() {
    let invocations = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&invocations);
    let feature = Feature::<()>::new("Examples").scenario(Scenario::with_examples(
        "replay",
        [("a",), ("b",)],
        move |ctx, &(name,): &(&'static str,)| {
            seen.lock().expect("lock").push(name);
            ctx.given("{0}", |_| ())?;
            Ok(())
        },
    ));

    run_feature(feature).await;

    assert_eq!(*invocations.lock().expect("lock"), ["a", "b"]);
}

#[tokio::test]
async fn identical_examples_stay_distinguishable() {
    let feature = Feature::<()>::new("Examples").scenario(Scenario::with_examples(
        "repeated",
        [(1_u8,), (1,)],
        |ctx, _: &(u8,)| {
            ctx.given("the number {0}", |_| ())?;
            Ok(())
        },
    ));

    let summary = run_feature(feature).await;

    assert_eq!(
        unit_names(&summary),
        ["Given the number 1 <u8>(1) #1", "Given the number 1 <u8>(1) #2"]
    );
    assert!(
        summary
            .get("Examples / repeated / Given the number 1 <u8>(1) #2")
            .is_some()
    );
}
