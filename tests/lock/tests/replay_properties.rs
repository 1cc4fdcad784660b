//! Properties every returned path must satisfy, checked across all fixture
//! worlds and a spread of policies.

use std::collections::BTreeSet;

use starpath_harness::worlds::{fixture, FIXTURE_NAMES};
use starpath_kernel::world::WorldV1;
use starpath_search::{
    replay_verify, solve, ArrivalV1, DominanceModeV1, GiantStarPolicyV1, PathTraceV1,
    SearchPolicyV1,
};

fn policies() -> Vec<SearchPolicyV1> {
    let mut out = Vec::new();
    for dominance in [
        DominanceModeV1::Disabled,
        DominanceModeV1::EnergyDominance,
        DominanceModeV1::ExactSignature,
    ] {
        for giant_star in [
            GiantStarPolicyV1::Exhaustive,
            GiantStarPolicyV1::SingleRandom { seed: 3 },
        ] {
            out.push(SearchPolicyV1 {
                max_solutions: 8,
                giant_star,
                dominance,
                max_expansions: Some(200_000),
            });
        }
    }
    out
}

fn assert_path_properties(world: &WorldV1, trace: &PathTraceV1, label: &str) {
    replay_verify(world, trace).unwrap_or_else(|e| panic!("{label}: {e}"));

    let cells = trace.cells();
    let unique: BTreeSet<_> = cells.iter().collect();
    assert_eq!(unique.len(), cells.len(), "{label}: a cell repeats");

    assert_eq!(cells.first(), Some(&world.origin()), "{label}");
    assert_eq!(cells.last(), Some(&world.destination()), "{label}");

    for step in trace.steps() {
        assert!(step.energy_after >= 0, "{label}: negative energy at {}", step.cell);
        if let Some(threshold) = world.gate_threshold(step.cell) {
            if !matches!(step.arrival, ArrivalV1::Origin) {
                assert!(step.energy_before >= threshold, "{label}: gate {}", step.cell);
            }
        }
    }

    let mut seen = BTreeSet::new();
    for step in trace.steps() {
        if let ArrivalV1::Teleport { wormhole, .. } = &step.arrival {
            assert!(seen.insert(wormhole.clone()), "{label}: {wormhole} used twice");
        }
    }
}

#[test]
fn every_returned_path_replays() {
    for name in FIXTURE_NAMES {
        let world = fixture(name).unwrap().build().unwrap();
        for (i, policy) in policies().iter().enumerate() {
            let outcome = solve(&world, policy).unwrap();
            for (t, trace) in outcome.traces.iter().enumerate() {
                assert_path_properties(&world, trace, &format!("{name}/policy{i}/trace{t}"));
            }
        }
    }
}

#[test]
fn returned_paths_are_distinct() {
    for name in FIXTURE_NAMES {
        let world = fixture(name).unwrap().build().unwrap();
        let policy = SearchPolicyV1 {
            max_solutions: 8,
            ..SearchPolicyV1::default()
        };
        let outcome = solve(&world, &policy).unwrap();
        assert!(outcome.traces.len() <= 8, "{name}");
        let digests: BTreeSet<_> = outcome
            .traces
            .iter()
            .map(|t| t.digest().unwrap())
            .collect();
        assert_eq!(digests.len(), outcome.traces.len(), "{name}: duplicate trace");
    }
}

#[test]
fn fixtures_are_equally_solvable_under_every_cache_mode() {
    for name in FIXTURE_NAMES {
        let world = fixture(name).unwrap().build().unwrap();
        let verdicts: BTreeSet<bool> = [
            DominanceModeV1::Disabled,
            DominanceModeV1::EnergyDominance,
            DominanceModeV1::ExactSignature,
        ]
        .into_iter()
        .map(|dominance| {
            solve(
                &world,
                &SearchPolicyV1 {
                    dominance,
                    ..SearchPolicyV1::default()
                },
            )
            .unwrap()
            .is_solved()
        })
        .collect();
        assert_eq!(verdicts.len(), 1, "{name}: dominance changed solvability");
    }
}

#[test]
fn tampered_trace_is_rejected() {
    let world = fixture("gauntlet").unwrap().build().unwrap();
    let outcome = solve(&world, &SearchPolicyV1::default()).unwrap();
    let trace = outcome.first().unwrap();

    let mut steps = trace.steps().to_vec();
    let last = steps.len() - 1;
    steps[last].energy_after += 1;
    assert!(replay_verify(&world, &PathTraceV1::from_steps(steps)).is_err());

    let mut steps = trace.steps().to_vec();
    steps.remove(1);
    assert!(replay_verify(&world, &PathTraceV1::from_steps(steps)).is_err());
}
