//! Named fixture worlds for tests, benchmarks and the fixture binary.
//!
//! Every fixture is a [`WorldDescriptionV1`] so it can be serialized to the
//! on-disk document format and loaded back through the normal loader.

mod gauntlet;

use starpath_kernel::grid::Cell;
use starpath_kernel::world::WorldDescriptionV1;

pub use gauntlet::{gauntlet, open_field};

/// Names accepted by [`fixture`], in a stable order.
pub const FIXTURE_NAMES: &[&str] = &[
    "open_grid",
    "wormhole_shortcut",
    "chained_wormholes",
    "star_corridor",
    "star_choice",
    "recharge_gate",
    "sealed_destination",
    "gauntlet",
];

/// Look up a fixture by name.
#[must_use]
pub fn fixture(name: &str) -> Option<WorldDescriptionV1> {
    let description = match name {
        "open_grid" => open_grid(),
        "wormhole_shortcut" => wormhole_shortcut(),
        "chained_wormholes" => chained_wormholes(),
        "star_corridor" => star_corridor(),
        "star_choice" => star_choice(),
        "recharge_gate" => recharge_gate(),
        "sealed_destination" => sealed_destination(),
        "gauntlet" => gauntlet(),
        _ => return None,
    };
    Some(description)
}

/// 3×3, cost 1 everywhere, (0,0) → (2,2), 10 energy.
#[must_use]
pub fn open_grid() -> WorldDescriptionV1 {
    WorldDescriptionV1::uniform(3, 3, 1, Cell::new(0, 0), Cell::new(2, 2), 10)
}

/// A wormhole at (0,1) drops the ship on the destination for 2 energy.
#[must_use]
pub fn wormhole_shortcut() -> WorldDescriptionV1 {
    WorldDescriptionV1::uniform(3, 3, 1, Cell::new(0, 0), Cell::new(2, 2), 6)
        .with_cost(Cell::new(2, 2), 0)
        .with_wormhole(Cell::new(0, 1), Cell::new(2, 2), 2)
}

/// Wormhole A exits onto wormhole B's entrance.
#[must_use]
pub fn chained_wormholes() -> WorldDescriptionV1 {
    WorldDescriptionV1::uniform(2, 3, 1, Cell::new(0, 0), Cell::new(1, 2), 20)
        .with_named_wormhole("alpha", Cell::new(0, 1), Cell::new(1, 0), 3)
        .with_named_wormhole("beta", Cell::new(1, 0), Cell::new(1, 2), 4)
}

/// A one-row corridor blocked by a black hole next to a giant star.
#[must_use]
pub fn star_corridor() -> WorldDescriptionV1 {
    WorldDescriptionV1::uniform(1, 4, 1, Cell::new(0, 0), Cell::new(0, 3), 10)
        .with_giant_star(Cell::new(0, 1))
        .with_black_hole(Cell::new(0, 2))
}

/// The destination is walled in by two black holes that share one giant
/// star, so the tie-break rule decides which route is taken.
#[must_use]
pub fn star_choice() -> WorldDescriptionV1 {
    WorldDescriptionV1::uniform(3, 3, 1, Cell::new(0, 0), Cell::new(2, 2), 20)
        .with_giant_star(Cell::new(1, 1))
        .with_black_hole(Cell::new(1, 2))
        .with_black_hole(Cell::new(2, 1))
}

/// The gate at (0,2) can only be passed after the recharge at (0,1).
#[must_use]
pub fn recharge_gate() -> WorldDescriptionV1 {
    WorldDescriptionV1::uniform(1, 4, 50, Cell::new(0, 0), Cell::new(0, 3), 3)
        .with_recharge_zone(Cell::new(0, 1), 3)
        .with_cost(Cell::new(0, 2), 2)
        .with_cost(Cell::new(0, 3), 1)
        .with_min_charge_gate(Cell::new(0, 2), 8)
}

/// The destination is a black hole with no giant star nearby.
#[must_use]
pub fn sealed_destination() -> WorldDescriptionV1 {
    open_grid().with_black_hole(Cell::new(2, 2))
}
