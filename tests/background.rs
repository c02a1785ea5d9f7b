//! Background steps shared by every scenario of a feature.

use rstest::rstest;
use stepwise::{Feature, Scenario, UnitResult};
use stepwise_testing::{EventLog, event_log, run_feature, unit_names};

#[rstest]
#[tokio::test]
async fn background_runs_fresh_before_each_unit(event_log: EventLog) {
    let background = event_log.clone();
    let feature = Feature::<Vec<&'static str>>::new("Blogs")
        .background(move |ctx| {
            let sink = background.clone();
            ctx.given("a blog", move |posts: &mut Vec<&'static str>| {
                posts.push("welcome");
                sink.acquire("blog")
            })?;
            Ok(())
        })
        .scenario(Scenario::new("posting", |ctx| {
            ctx.when("I post", |posts: &mut Vec<&'static str>| posts.push("hello"))?;
            ctx.then_in_isolation("there are two posts", |posts: &mut Vec<&'static str>| {
                if posts.len() == 2 { Ok(()) } else { Err(format!("{posts:?}")) }
            })?;
            Ok(())
        }))
        .scenario(Scenario::new("reading", |ctx| {
            ctx.then("there is one post", |posts: &mut Vec<&'static str>| {
                if posts.len() == 1 { Ok(()) } else { Err(format!("{posts:?}")) }
            })?;
            Ok(())
        }));

    let summary = run_feature(feature).await;

    assert_eq!(
        unit_names(&summary),
        [
            "Given a blog, When I post | Then there are two posts",
            "Given a blog, When I post",
            "Given a blog, Then there is one post",
        ]
    );
    assert!(summary.reports().iter().all(|r| r.result == UnitResult::Passed));
    assert_eq!(event_log.constructed().len(), 3);
    assert_eq!(event_log.disposed().len(), 3);
}

#[tokio::test]
async fn world_factory_builds_each_unit_its_own_world() {
    let feature = Feature::with_world("Counters", || 10_u32).scenario(Scenario::new(
        "incrementing",
        |ctx| {
            ctx.when("it is incremented", |n: &mut u32| *n += 1)?;
            ctx.then_in_isolation("it is eleven", |n: &mut u32| {
                if *n == 11 { Ok(()) } else { Err(format!("{n}")) }
            })?;
            ctx.then_in_isolation("it is still eleven", |n: &mut u32| {
                if *n == 11 { Ok(()) } else { Err(format!("{n}")) }
            })?;
            Ok(())
        },
    ));

    let summary = run_feature(feature).await;

    assert_eq!(summary.reports().len(), 3);
    assert!(summary.is_success());
}
