//! `WorldV1`: the immutable grid, its costs, hazards and effects.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Direction};
use crate::proof::canon::{canonical_json_bytes_of, CanonError};
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

use super::description::{
    GridSizeV1, MinChargeGateV1, RechargeZoneV1, WorldDescriptionV1, WormholeDescriptionV1,
};

/// Stable identifier of a wormhole.
///
/// Two wormholes with identical geometry still have distinct ids; a branch
/// consumes ids, not cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WormholeId(String);

impl WormholeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id used when the document does not name a wormhole:
    /// `wh_<declaration index>_<row>-<col>`.
    #[must_use]
    pub fn derived(index: usize, entry: Cell) -> Self {
        Self(format!("wh_{index}_{}-{}", entry.row, entry.col))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WormholeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A one-way, cost-bearing teleporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WormholeV1 {
    pub id: WormholeId,
    pub entry: Cell,
    pub exit: Cell,
    pub cost: i64,
}

/// Terrain classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainV1 {
    Empty,
    BlackHole,
    GiantStar,
    WormholeEntry,
    RechargeZone,
    MinChargeGate,
}

impl TerrainV1 {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TerrainV1::Empty => "empty",
            TerrainV1::BlackHole => "black_hole",
            TerrainV1::GiantStar => "giant_star",
            TerrainV1::WormholeEntry => "wormhole_entry",
            TerrainV1::RechargeZone => "recharge_zone",
            TerrainV1::MinChargeGate => "min_charge_gate",
        }
    }
}

/// The immutable world a search runs against.
///
/// Constructed only through [`WorldDescriptionV1::build`] (or the loaders
/// that wrap it), which guarantees every referenced cell is in bounds and
/// the cost matrix matches the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldV1 {
    pub(crate) rows: u32,
    pub(crate) cols: u32,
    /// Row-major, `rows * cols` entries.
    pub(crate) costs: Vec<i64>,
    pub(crate) origin: Cell,
    pub(crate) destination: Cell,
    pub(crate) initial_energy: i64,
    pub(crate) black_holes: BTreeSet<Cell>,
    pub(crate) giant_stars: BTreeSet<Cell>,
    /// Keyed by entry cell.
    pub(crate) wormholes: BTreeMap<Cell, WormholeV1>,
    pub(crate) recharge_zones: BTreeMap<Cell, u32>,
    pub(crate) min_charge_gates: BTreeMap<Cell, i64>,
}

impl WorldV1 {
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells (`rows * cols`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.costs.len()
    }

    #[must_use]
    pub fn origin(&self) -> Cell {
        self.origin
    }

    #[must_use]
    pub fn destination(&self) -> Cell {
        self.destination
    }

    #[must_use]
    pub fn initial_energy(&self) -> i64 {
        self.initial_energy
    }

    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Row-major index of an in-bounds cell.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let row = usize::try_from(cell.row).ok()?;
        let col = usize::try_from(cell.col).ok()?;
        let cols = usize::try_from(self.cols).ok()?;
        row.checked_mul(cols)?.checked_add(col)
    }

    /// Traversal cost of an in-bounds cell.
    #[must_use]
    pub fn cost(&self, cell: Cell) -> Option<i64> {
        self.index(cell).map(|i| self.costs[i])
    }

    #[must_use]
    pub fn is_black_hole(&self, cell: Cell) -> bool {
        self.black_holes.contains(&cell)
    }

    #[must_use]
    pub fn is_giant_star(&self, cell: Cell) -> bool {
        self.giant_stars.contains(&cell)
    }

    /// The wormhole whose entrance is `cell`, if any.
    #[must_use]
    pub fn wormhole_at(&self, cell: Cell) -> Option<&WormholeV1> {
        self.wormholes.get(&cell)
    }

    #[must_use]
    pub fn recharge_multiplier(&self, cell: Cell) -> Option<u32> {
        self.recharge_zones.get(&cell).copied()
    }

    #[must_use]
    pub fn gate_threshold(&self, cell: Cell) -> Option<i64> {
        self.min_charge_gates.get(&cell).copied()
    }

    /// Classify a cell.
    ///
    /// When a cell was declared with more than one kind, the first match in
    /// the order wormhole entry, black hole, giant star, recharge zone,
    /// minimum-charge gate wins. Use [`WorldV1::terrain_kinds`] to see all.
    #[must_use]
    pub fn classify(&self, cell: Cell) -> TerrainV1 {
        self.terrain_kinds(cell)
            .first()
            .copied()
            .unwrap_or(TerrainV1::Empty)
    }

    /// Every terrain kind declared on `cell`, in classification priority order.
    #[must_use]
    pub fn terrain_kinds(&self, cell: Cell) -> Vec<TerrainV1> {
        let mut kinds = Vec::new();
        if self.wormholes.contains_key(&cell) {
            kinds.push(TerrainV1::WormholeEntry);
        }
        if self.black_holes.contains(&cell) {
            kinds.push(TerrainV1::BlackHole);
        }
        if self.giant_stars.contains(&cell) {
            kinds.push(TerrainV1::GiantStar);
        }
        if self.recharge_zones.contains_key(&cell) {
            kinds.push(TerrainV1::RechargeZone);
        }
        if self.min_charge_gates.contains_key(&cell) {
            kinds.push(TerrainV1::MinChargeGate);
        }
        kinds
    }

    /// In-bounds orthogonal neighbors of `cell`, in [`Direction::ALL`] order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            direction
                .step(cell)
                .filter(|next| self.in_bounds(*next))
                .map(|next| (direction, next))
        })
    }

    #[must_use]
    pub fn black_holes(&self) -> &BTreeSet<Cell> {
        &self.black_holes
    }

    #[must_use]
    pub fn giant_stars(&self) -> &BTreeSet<Cell> {
        &self.giant_stars
    }

    /// All wormholes, ordered by entry cell.
    pub fn wormholes(&self) -> impl Iterator<Item = &WormholeV1> {
        self.wormholes.values()
    }

    /// Project back into a description with every id made explicit.
    ///
    /// Hazard and effect lists come out sorted by cell, so two worlds that
    /// differ only in declaration order project identically.
    #[must_use]
    pub fn to_description(&self) -> WorldDescriptionV1 {
        let cols = self.cols as usize;
        WorldDescriptionV1 {
            grid: GridSizeV1 {
                rows: self.rows,
                cols: self.cols,
            },
            origin: self.origin,
            destination: self.destination,
            initial_energy: self.initial_energy,
            costs: self.costs.chunks(cols.max(1)).map(<[i64]>::to_vec).collect(),
            black_holes: self.black_holes.iter().copied().collect(),
            giant_stars: self.giant_stars.iter().copied().collect(),
            wormholes: self
                .wormholes
                .values()
                .map(|w| WormholeDescriptionV1 {
                    id: Some(w.id.as_str().to_string()),
                    entry: w.entry,
                    exit: w.exit,
                    cost: w.cost,
                })
                .collect(),
            recharge_zones: self
                .recharge_zones
                .iter()
                .map(|(&cell, &multiplier)| RechargeZoneV1 { cell, multiplier })
                .collect(),
            min_charge_gates: self
                .min_charge_gates
                .iter()
                .map(|(&cell, &threshold)| MinChargeGateV1 { cell, threshold })
                .collect(),
        }
    }

    /// Canonical JSON bytes of [`WorldV1::to_description`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes_of(&self.to_description())
    }

    /// Content digest of the world under [`HashDomain::World`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(HashDomain::World, &self.canonical_bytes()?))
    }
}
