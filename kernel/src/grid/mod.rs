//! Grid primitives: coordinates, movement directions, and per-branch cell sets.

pub mod cell;
pub mod cell_set;

pub use cell::{Cell, Direction};
pub use cell_set::CellSetV1;
