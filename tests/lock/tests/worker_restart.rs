//! Background worker: restarts never surface a stale generation.

use std::sync::Arc;
use std::time::Duration;

use starpath_harness::worker::SearchWorkerV1;
use starpath_harness::worlds::{fixture, open_field};
use starpath_kernel::world::WorldV1;
use starpath_search::{DominanceModeV1, SearchPolicyV1, TerminationReasonV1};

fn busy() -> (Arc<WorldV1>, SearchPolicyV1) {
    let world = Arc::new(open_field(7, 1_000).build().unwrap());
    let policy = SearchPolicyV1 {
        max_solutions: u32::MAX,
        dominance: DominanceModeV1::Disabled,
        ..SearchPolicyV1::default()
    };
    (world, policy)
}

fn quick(name: &str) -> Arc<WorldV1> {
    Arc::new(fixture(name).unwrap().build().unwrap())
}

#[test]
fn rapid_restarts_publish_only_latest() {
    let mut worker = SearchWorkerV1::new();
    for _ in 0..5 {
        let (world, policy) = busy();
        worker.start(world, policy);
    }
    let latest = worker.start(quick("open_grid"), SearchPolicyV1::default());
    assert_eq!(latest, 6);

    let published = worker.wait().unwrap();
    assert_eq!(published.generation, latest);
    let outcome = published.outcome.unwrap();
    assert_eq!(outcome.termination, TerminationReasonV1::SolutionTargetReached);
    assert_eq!(outcome.first().unwrap().final_energy(), Some(6));
}

#[test]
fn poll_is_empty_until_the_new_generation_publishes() {
    let mut worker = SearchWorkerV1::new();
    worker.start(quick("open_grid"), SearchPolicyV1::default());
    assert!(worker.wait().is_some());

    let (world, policy) = busy();
    let generation = worker.start(world, policy);
    assert!(
        worker.poll().is_none(),
        "previous generation's result must be cleared on restart"
    );
    assert!(worker.wait_timeout(Duration::from_millis(10)).is_none());

    worker.cancel();
    let published = worker.wait().unwrap();
    assert_eq!(published.generation, generation);
    assert_eq!(
        published.outcome.unwrap().termination,
        TerminationReasonV1::Cancelled
    );
}

#[test]
fn shared_world_is_reused_across_generations() {
    let mut worker = SearchWorkerV1::new();
    let world = quick("gauntlet");
    let first = worker.start(Arc::clone(&world), SearchPolicyV1::default());
    let a = worker.wait().unwrap();
    let second = worker.start(Arc::clone(&world), SearchPolicyV1::default());
    let b = worker.wait().unwrap();

    assert_eq!(a.generation, first);
    assert_eq!(b.generation, second);
    assert_eq!(a.outcome.unwrap().traces, b.outcome.unwrap().traces);
}
