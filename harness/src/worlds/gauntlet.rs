//! Larger generated fixtures.

use starpath_kernel::grid::Cell;
use starpath_kernel::world::WorldDescriptionV1;

/// 8×8 world with every terrain kind and costs between 1 and 4.
#[must_use]
pub fn gauntlet() -> WorldDescriptionV1 {
    let mut description =
        WorldDescriptionV1::uniform(8, 8, 1, Cell::new(0, 0), Cell::new(7, 7), 40);
    for row in 0..8 {
        for col in 0..8 {
            let cost = 1 + i64::from((row * 3 + col * 5) % 4);
            description = description.with_cost(Cell::new(row, col), cost);
        }
    }
    description
        .with_black_hole(Cell::new(1, 1))
        .with_black_hole(Cell::new(2, 5))
        .with_black_hole(Cell::new(3, 3))
        .with_black_hole(Cell::new(4, 6))
        .with_black_hole(Cell::new(5, 2))
        .with_black_hole(Cell::new(6, 6))
        .with_giant_star(Cell::new(3, 2))
        .with_giant_star(Cell::new(6, 5))
        .with_wormhole(Cell::new(0, 4), Cell::new(5, 5), 3)
        .with_wormhole(Cell::new(5, 0), Cell::new(2, 7), 2)
        .with_recharge_zone(Cell::new(4, 4), 2)
        .with_recharge_zone(Cell::new(2, 2), 2)
        .with_min_charge_gate(Cell::new(6, 7), 8)
        .with_min_charge_gate(Cell::new(7, 5), 5)
}

/// Hazard-free `size`×`size` field, cost 1, corner to corner.
///
/// With dominance disabled and an unbounded solution count, the search
/// has to walk every simple path; used to keep a worker busy.
#[must_use]
pub fn open_field(size: u32, initial_energy: i64) -> WorldDescriptionV1 {
    let last = size.saturating_sub(1);
    WorldDescriptionV1::uniform(
        size,
        size,
        1,
        Cell::new(0, 0),
        Cell::new(last, last),
        initial_energy,
    )
}
