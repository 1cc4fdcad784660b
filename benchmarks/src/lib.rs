//! Shared helpers for starpath benchmark suites.

use starpath_harness::worlds::{fixture, open_field};
use starpath_kernel::world::WorldV1;
use starpath_search::{solve, DominanceModeV1, SearchPolicyV1, SolveOutcomeV1};

/// Build a named fixture world.
///
/// # Panics
///
/// Panics if the name is unknown or the fixture fails validation.
/// Benchmark setup failures are fatal.
#[must_use]
pub fn fixture_world(name: &str) -> WorldV1 {
    fixture(name)
        .unwrap_or_else(|| panic!("unknown fixture {name}"))
        .build()
        .expect("fixture builds")
}

/// A hazard-free `size`×`size` field whose destination needs more energy
/// than the ship has, so the search explores until the budget runs out.
///
/// # Panics
///
/// Panics if the generated world fails validation.
#[must_use]
pub fn exhausting_field(size: u32) -> WorldV1 {
    let shortfall = i64::from(2 * size.saturating_sub(1)) - 1;
    open_field(size, shortfall).build().expect("open field builds")
}

/// Policy collecting every path up to an expansion budget.
#[must_use]
pub fn budgeted(dominance: DominanceModeV1, max_expansions: u64) -> SearchPolicyV1 {
    SearchPolicyV1 {
        max_solutions: u32::MAX,
        dominance,
        max_expansions: Some(max_expansions),
        ..SearchPolicyV1::default()
    }
}

/// Run one solve.
///
/// # Panics
///
/// Panics if the policy is rejected.
#[must_use]
pub fn solve_once(world: &WorldV1, policy: &SearchPolicyV1) -> SolveOutcomeV1 {
    solve(world, policy).expect("valid policy")
}
