//! Fixture binary for cross-process determinism checks.
//!
//! Solves every named fixture world under a fixed set of policies and prints
//! one `key=value` line per result. Two runs of this binary must print
//! byte-identical output regardless of working directory or environment.
//!
//! Usage: `solve_fixture`

use starpath_harness::runner::run_solve_world;
use starpath_harness::worlds::{fixture, FIXTURE_NAMES};
use starpath_search::{DominanceModeV1, GiantStarPolicyV1, SearchPolicyV1};

fn policies() -> Vec<(&'static str, SearchPolicyV1)> {
    vec![
        ("default", SearchPolicyV1::default()),
        (
            "random_7",
            SearchPolicyV1 {
                max_solutions: 3,
                giant_star: GiantStarPolicyV1::SingleRandom { seed: 7 },
                ..SearchPolicyV1::default()
            },
        ),
        (
            "exact_all",
            SearchPolicyV1 {
                max_solutions: 4,
                dominance: DominanceModeV1::ExactSignature,
                ..SearchPolicyV1::default()
            },
        ),
    ]
}

fn main() {
    for name in FIXTURE_NAMES {
        let world = fixture(name)
            .expect("fixture is registered")
            .build()
            .expect("fixture builds");
        for (label, policy) in policies() {
            let report = run_solve_world(&world, &policy).expect("fixture solves");
            println!(
                "fixture={name} policy={label} world={} report={} solutions={}",
                report.world_digest,
                report.digest(),
                report.outcome.traces.len(),
            );
            for (index, digest) in report.trace_digests.iter().enumerate() {
                println!("fixture={name} policy={label} trace[{index}]={digest}");
            }
        }
    }
}
