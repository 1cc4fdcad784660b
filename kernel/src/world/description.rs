//! `WorldDescriptionV1`: the external JSON world document and its validation.
//!
//! The description is the only way to obtain a [`WorldV1`]. [`WorldDescriptionV1::build`]
//! checks every structural rule up front and either returns a complete world
//! or a [`WorldLoadError`]; there is no partially built state.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

use super::error::WorldLoadError;
use super::model::{WormholeId, WormholeV1, WorldV1};

/// Grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSizeV1 {
    pub rows: u32,
    pub cols: u32,
}

/// A wormhole as declared in the document. `id` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WormholeDescriptionV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub entry: Cell,
    pub exit: Cell,
    pub cost: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RechargeZoneV1 {
    pub cell: Cell,
    pub multiplier: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinChargeGateV1 {
    pub cell: Cell,
    pub threshold: i64,
}

/// The world document.
///
/// Field names match the on-disk JSON. Hazard and effect lists default to
/// empty when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldDescriptionV1 {
    pub grid: GridSizeV1,
    pub origin: Cell,
    pub destination: Cell,
    pub initial_energy: i64,
    /// Row-major, `rows` rows of `cols` entries.
    pub costs: Vec<Vec<i64>>,
    #[serde(default)]
    pub black_holes: Vec<Cell>,
    #[serde(default)]
    pub giant_stars: Vec<Cell>,
    #[serde(default)]
    pub wormholes: Vec<WormholeDescriptionV1>,
    #[serde(default)]
    pub recharge_zones: Vec<RechargeZoneV1>,
    #[serde(default)]
    pub min_charge_gates: Vec<MinChargeGateV1>,
}

impl WorldDescriptionV1 {
    /// A hazard-free grid with the same cost everywhere.
    #[must_use]
    pub fn uniform(
        rows: u32,
        cols: u32,
        cost: i64,
        origin: Cell,
        destination: Cell,
        initial_energy: i64,
    ) -> Self {
        Self {
            grid: GridSizeV1 { rows, cols },
            origin,
            destination,
            initial_energy,
            costs: vec![vec![cost; cols as usize]; rows as usize],
            black_holes: Vec::new(),
            giant_stars: Vec::new(),
            wormholes: Vec::new(),
            recharge_zones: Vec::new(),
            min_charge_gates: Vec::new(),
        }
    }

    /// Override one cell's cost. Out-of-range cells are left for
    /// [`WorldDescriptionV1::build`] to reject.
    #[must_use]
    pub fn with_cost(mut self, cell: Cell, cost: i64) -> Self {
        if let Some(slot) = self
            .costs
            .get_mut(cell.row as usize)
            .and_then(|row| row.get_mut(cell.col as usize))
        {
            *slot = cost;
        }
        self
    }

    #[must_use]
    pub fn with_black_hole(mut self, cell: Cell) -> Self {
        self.black_holes.push(cell);
        self
    }

    #[must_use]
    pub fn with_giant_star(mut self, cell: Cell) -> Self {
        self.giant_stars.push(cell);
        self
    }

    /// Add a wormhole with a derived id.
    #[must_use]
    pub fn with_wormhole(mut self, entry: Cell, exit: Cell, cost: i64) -> Self {
        self.wormholes.push(WormholeDescriptionV1 {
            id: None,
            entry,
            exit,
            cost,
        });
        self
    }

    #[must_use]
    pub fn with_named_wormhole(
        mut self,
        id: impl Into<String>,
        entry: Cell,
        exit: Cell,
        cost: i64,
    ) -> Self {
        self.wormholes.push(WormholeDescriptionV1 {
            id: Some(id.into()),
            entry,
            exit,
            cost,
        });
        self
    }

    #[must_use]
    pub fn with_recharge_zone(mut self, cell: Cell, multiplier: u32) -> Self {
        self.recharge_zones.push(RechargeZoneV1 { cell, multiplier });
        self
    }

    #[must_use]
    pub fn with_min_charge_gate(mut self, cell: Cell, threshold: i64) -> Self {
        self.min_charge_gates.push(MinChargeGateV1 { cell, threshold });
        self
    }

    /// Parse a JSON document without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldLoadError::Parse`] naming the JSON path of the first
    /// offending field.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, WorldLoadError> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let description = serde_path_to_error::deserialize::<_, Self>(&mut deserializer)
            .map_err(|error| {
                let path = error.path().to_string();
                WorldLoadError::Parse {
                    path: if path.is_empty() { ".".to_string() } else { path },
                    detail: error.into_inner().to_string(),
                }
            })?;
        deserializer.end().map_err(|error| WorldLoadError::Parse {
            path: ".".to_string(),
            detail: error.to_string(),
        })?;
        Ok(description)
    }

    /// Validate and build the immutable world.
    ///
    /// # Errors
    ///
    /// Returns the first [`WorldLoadError`] found, checking in this order:
    /// grid size, initial energy, cost matrix shape, cell bounds, wormhole
    /// uniqueness.
    pub fn build(&self) -> Result<WorldV1, WorldLoadError> {
        let GridSizeV1 { rows, cols } = self.grid;
        if rows == 0 || cols == 0 {
            return Err(WorldLoadError::EmptyGrid { rows, cols });
        }
        if self.initial_energy < 0 {
            return Err(WorldLoadError::NegativeInitialEnergy {
                energy: self.initial_energy,
            });
        }

        let costs = flatten_costs(&self.costs, rows, cols)?;

        let bounds = Bounds { rows, cols };
        bounds.check("origin", self.origin)?;
        bounds.check("destination", self.destination)?;
        for &cell in &self.black_holes {
            bounds.check("black hole", cell)?;
        }
        for &cell in &self.giant_stars {
            bounds.check("giant star", cell)?;
        }
        for wormhole in &self.wormholes {
            bounds.check("wormhole entry", wormhole.entry)?;
            bounds.check("wormhole exit", wormhole.exit)?;
        }
        for zone in &self.recharge_zones {
            bounds.check("recharge zone", zone.cell)?;
        }
        for gate in &self.min_charge_gates {
            bounds.check("min-charge gate", gate.cell)?;
        }

        let mut wormholes = BTreeMap::new();
        let mut ids = BTreeSet::new();
        for (index, declared) in self.wormholes.iter().enumerate() {
            let id = declared
                .id
                .clone()
                .map_or_else(|| WormholeId::derived(index, declared.entry), WormholeId::new);
            if !ids.insert(id.clone()) {
                return Err(WorldLoadError::DuplicateWormholeId {
                    id: id.as_str().to_string(),
                });
            }
            if wormholes.contains_key(&declared.entry) {
                return Err(WorldLoadError::DuplicateWormholeEntry {
                    cell: declared.entry,
                });
            }
            wormholes.insert(
                declared.entry,
                WormholeV1 {
                    id,
                    entry: declared.entry,
                    exit: declared.exit,
                    cost: declared.cost,
                },
            );
        }

        let mut recharge_zones = BTreeMap::new();
        for zone in &self.recharge_zones {
            if recharge_zones.insert(zone.cell, zone.multiplier).is_some() {
                tracing::warn!(cell = %zone.cell, "recharge zone declared twice; last declaration wins");
            }
        }
        let mut min_charge_gates = BTreeMap::new();
        for gate in &self.min_charge_gates {
            if min_charge_gates.insert(gate.cell, gate.threshold).is_some() {
                tracing::warn!(cell = %gate.cell, "min-charge gate declared twice; last declaration wins");
            }
        }

        let world = WorldV1 {
            rows,
            cols,
            costs,
            origin: self.origin,
            destination: self.destination,
            initial_energy: self.initial_energy,
            black_holes: self.black_holes.iter().copied().collect(),
            giant_stars: self.giant_stars.iter().copied().collect(),
            wormholes,
            recharge_zones,
            min_charge_gates,
        };
        warn_on_overlaps(&world);
        Ok(world)
    }
}

/// Parse and validate a world document.
///
/// # Errors
///
/// Returns [`WorldLoadError`] on malformed JSON or any structural violation.
pub fn load_world(bytes: &[u8]) -> Result<WorldV1, WorldLoadError> {
    let world = WorldDescriptionV1::from_json_slice(bytes)?.build()?;
    tracing::debug!(
        rows = world.rows(),
        cols = world.cols(),
        black_holes = world.black_holes().len(),
        wormholes = world.wormholes().count(),
        "world loaded"
    );
    Ok(world)
}

/// Read a world document from disk and validate it.
///
/// # Errors
///
/// Returns [`WorldLoadError::Io`] if the file cannot be read, otherwise as
/// [`load_world`].
pub fn load_world_file(path: &Path) -> Result<WorldV1, WorldLoadError> {
    let bytes = std::fs::read(path).map_err(|e| WorldLoadError::Io {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    load_world(&bytes)
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

struct Bounds {
    rows: u32,
    cols: u32,
}

impl Bounds {
    fn check(&self, what: &str, cell: Cell) -> Result<(), WorldLoadError> {
        if cell.row < self.rows && cell.col < self.cols {
            Ok(())
        } else {
            Err(WorldLoadError::CellOutOfBounds {
                what: what.to_string(),
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

fn flatten_costs(matrix: &[Vec<i64>], rows: u32, cols: u32) -> Result<Vec<i64>, WorldLoadError> {
    if matrix.len() != rows as usize {
        return Err(WorldLoadError::CostRowCount {
            expected: rows,
            actual: matrix.len(),
        });
    }
    let mut flat = Vec::with_capacity(matrix.len() * cols as usize);
    for (row, entries) in matrix.iter().enumerate() {
        if entries.len() != cols as usize {
            return Err(WorldLoadError::CostRowWidth {
                row,
                expected: cols,
                actual: entries.len(),
            });
        }
        flat.extend_from_slice(entries);
    }
    Ok(flat)
}

fn warn_on_overlaps(world: &WorldV1) {
    let declared: BTreeSet<Cell> = world
        .black_holes
        .iter()
        .chain(world.giant_stars.iter())
        .chain(world.wormholes.keys())
        .chain(world.recharge_zones.keys())
        .chain(world.min_charge_gates.keys())
        .copied()
        .collect();
    for cell in declared {
        let kinds = world.terrain_kinds(cell);
        if kinds.len() > 1 {
            let names: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
            tracing::warn!(
                %cell,
                kinds = %names.join(","),
                effective = kinds[0].as_str(),
                "cell declared with more than one terrain kind"
            );
        }
    }
    if world.is_black_hole(world.origin) {
        tracing::warn!(cell = %world.origin, "origin is declared as a black hole");
    }
    if world.is_black_hole(world.destination) {
        tracing::warn!(cell = %world.destination, "destination is declared as a black hole");
    }
}
