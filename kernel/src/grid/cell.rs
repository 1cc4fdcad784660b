//! Grid coordinates and orthogonal movement.

use serde::{Deserialize, Serialize};

/// A grid coordinate, `(row, col)`, zero-based.
///
/// Serialized as a two-element array `[row, col]` to match the world
/// document format. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether `other` is one orthogonal step away.
    #[must_use]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<[u32; 2]> for Cell {
    fn from([row, col]: [u32; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Cell> for [u32; 2] {
    fn from(cell: Cell) -> Self {
        [cell.row, cell.col]
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Orthogonal movement direction.
///
/// [`Direction::ALL`] is the fixed exploration order used everywhere a
/// neighborhood is enumerated: right, left, down, up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// Exploration order. Changing this changes which path is found first.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// The neighbor of `cell` in this direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// The upper bounds are the world's concern, not the grid's.
    #[must_use]
    pub fn step(self, cell: Cell) -> Option<Cell> {
        match self {
            Direction::Right => cell.col.checked_add(1).map(|col| Cell::new(cell.row, col)),
            Direction::Left => cell.col.checked_sub(1).map(|col| Cell::new(cell.row, col)),
            Direction::Down => cell.row.checked_add(1).map(|row| Cell::new(row, cell.col)),
            Direction::Up => cell.row.checked_sub(1).map(|row| Cell::new(row, cell.col)),
        }
    }

    /// The direction that leads from `from` to the adjacent cell `to`.
    #[must_use]
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.step(from) == Some(to))
    }

    /// Stable lowercase name, used in canonical JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
