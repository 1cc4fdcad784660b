//! End-to-end scenarios driven from literal world documents.
//!
//! Each test starts from JSON text, so the document format is locked
//! together with the search behavior.

use starpath_harness::runner::run_solve;
use starpath_kernel::grid::Cell;
use starpath_kernel::world::load_world;
use starpath_search::{
    solve, ArrivalV1, CellEffectV1, PruneReasonV1, SearchPolicyV1, TerminationReasonV1,
};

const OPEN_GRID: &str = r#"{
    "grid": {"rows": 3, "cols": 3},
    "origin": [0, 0],
    "destination": [2, 2],
    "initial_energy": 10,
    "costs": [[1, 1, 1], [1, 1, 1], [1, 1, 1]]
}"#;

const WORMHOLE_SHORTCUT: &str = r#"{
    "grid": {"rows": 3, "cols": 3},
    "origin": [0, 0],
    "destination": [2, 2],
    "initial_energy": 6,
    "costs": [[1, 1, 1], [1, 1, 1], [1, 1, 0]],
    "wormholes": [{"id": "w1", "entry": [0, 1], "exit": [2, 2], "cost": 2}]
}"#;

const SEALED: &str = r#"{
    "grid": {"rows": 3, "cols": 3},
    "origin": [0, 0],
    "destination": [2, 2],
    "initial_energy": 100,
    "costs": [[1, 1, 1], [1, 1, 1], [1, 1, 1]],
    "black_holes": [[2, 2]],
    "giant_stars": [[0, 2]]
}"#;

const CHAIN: &str = r#"{
    "grid": {"rows": 2, "cols": 3},
    "origin": [0, 0],
    "destination": [1, 2],
    "initial_energy": 20,
    "costs": [[1, 1, 1], [1, 1, 1]],
    "wormholes": [
        {"id": "alpha", "entry": [0, 1], "exit": [1, 0], "cost": 3},
        {"id": "beta", "entry": [1, 0], "exit": [1, 2], "cost": 4}
    ]
}"#;

const RECHARGE_GATE: &str = r#"{
    "grid": {"rows": 1, "cols": 4},
    "origin": [0, 0],
    "destination": [0, 3],
    "initial_energy": 3,
    "costs": [[50, 50, 2, 1]],
    "recharge_zones": [{"cell": [0, 1], "multiplier": 3}],
    "min_charge_gates": [{"cell": [0, 2], "threshold": 8}]
}"#;

fn solve_doc(doc: &str) -> starpath_search::SolveOutcomeV1 {
    let world = load_world(doc.as_bytes()).unwrap();
    solve(&world, &SearchPolicyV1::default()).unwrap()
}

#[test]
fn open_grid_four_moves_final_energy_six() {
    let outcome = solve_doc(OPEN_GRID);
    let trace = outcome.first().unwrap();
    assert_eq!(trace.steps().len(), 5);
    assert_eq!(trace.moves(), 4);
    assert_eq!(trace.final_energy(), Some(6));
    for pair in trace.steps().windows(2) {
        assert_eq!(pair[1].energy_before, pair[0].energy_after);
        assert_eq!(pair[1].effect, CellEffectV1::Cost(1));
    }
}

#[test]
fn wormhole_shortcut_two_moves_final_energy_three() {
    let outcome = solve_doc(WORMHOLE_SHORTCUT);
    let trace = outcome.first().unwrap();
    assert_eq!(trace.moves(), 2);
    assert_eq!(
        trace.cells(),
        vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(2, 2)]
    );
    assert_eq!(trace.steps()[1].energy_after, 5);
    assert!(matches!(
        &trace.steps()[2].arrival,
        ArrivalV1::Teleport { wormhole, cost: 2, .. } if wormhole.as_str() == "w1"
    ));
    assert_eq!(trace.final_energy(), Some(3));
}

#[test]
fn sealed_destination_reports_no_solution() {
    let outcome = solve_doc(SEALED);
    assert!(!outcome.is_solved());
    assert_eq!(outcome.termination, TerminationReasonV1::StackExhausted);
    assert!(outcome.stats.prunes(PruneReasonV1::BlackHole) > 0);

    let report = run_solve(SEALED.as_bytes(), &SearchPolicyV1::default()).unwrap();
    assert!(!report.is_solved());
}

#[test]
fn chained_wormholes_pay_both_costs() {
    let outcome = solve_doc(CHAIN);
    let trace = outcome.first().unwrap();
    let teleports: Vec<i64> = trace
        .steps()
        .iter()
        .filter_map(|step| match step.arrival {
            ArrivalV1::Teleport { cost, .. } => Some(cost),
            _ => None,
        })
        .collect();
    assert_eq!(teleports, vec![3, 4]);
    assert_eq!(trace.steps().last().unwrap().consumed.len(), 2);
}

#[test]
fn recharge_then_gate() {
    let outcome = solve_doc(RECHARGE_GATE);
    let trace = outcome.first().unwrap();
    let steps = trace.steps();
    assert_eq!(steps[1].effect, CellEffectV1::Recharge { multiplier: 3 });
    assert_eq!(steps[1].energy_before, 3);
    assert_eq!(steps[1].energy_after, 9);
    assert_eq!(steps[2].energy_before, 9);
    assert_eq!(steps[2].energy_after, 7);
    assert_eq!(trace.final_energy(), Some(6));
}

#[test]
fn narrative_reads_like_a_log() {
    let outcome = solve_doc(WORMHOLE_SHORTCUT);
    let narrative = outcome.first().unwrap().narrative();
    assert_eq!(narrative[0], "start at (0,0) with 6 energy");
    assert_eq!(narrative[1], "move right to (0,1), cost 1: 6 -> 5");
    assert_eq!(
        narrative[2],
        "teleport through w1 from (0,1) to (2,2) paying 2, cost 0: 3 -> 3"
    );
}
