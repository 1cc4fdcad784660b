//! Load-time world errors.
//!
//! Every variant is raised before a [`super::WorldV1`] exists; a world is
//! either fully valid or not built at all.

use crate::grid::Cell;

/// Typed failure for parsing or validating a world description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldLoadError {
    /// The world file could not be read.
    #[error("failed to read world file {path}: {detail}")]
    Io { path: String, detail: String },
    /// The document is not valid JSON or does not match the schema.
    /// `path` is the JSON path of the offending field (`.` for the root).
    #[error("world document invalid at {path}: {detail}")]
    Parse { path: String, detail: String },
    /// `rows` or `cols` is zero.
    #[error("grid must be at least 1x1, got {rows}x{cols}")]
    EmptyGrid { rows: u32, cols: u32 },
    /// The cost matrix has the wrong number of rows.
    #[error("cost matrix has {actual} rows, grid declares {expected}")]
    CostRowCount { expected: u32, actual: usize },
    /// A cost matrix row has the wrong number of columns.
    #[error("cost matrix row {row} has {actual} entries, grid declares {expected} columns")]
    CostRowWidth {
        row: usize,
        expected: u32,
        actual: usize,
    },
    /// A referenced cell lies outside the grid.
    #[error("{what} {cell} is outside the {rows}x{cols} grid")]
    CellOutOfBounds {
        what: String,
        cell: Cell,
        rows: u32,
        cols: u32,
    },
    /// Two wormholes share an entry cell.
    #[error("more than one wormhole enters at {cell}")]
    DuplicateWormholeEntry { cell: Cell },
    /// Two wormholes share an id.
    #[error("wormhole id {id:?} is declared more than once")]
    DuplicateWormholeId { id: String },
    /// The ship cannot start with a negative budget.
    #[error("initial energy must be non-negative, got {energy}")]
    NegativeInitialEnergy { energy: i64 },
}
