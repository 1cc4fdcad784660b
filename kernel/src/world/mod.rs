//! The static world model and its load-time description.
//!
//! A [`WorldV1`] is built once from a [`description::WorldDescriptionV1`]
//! and never mutated afterwards; searches only borrow it.

pub mod description;
pub mod error;
pub mod model;

pub use description::{load_world, load_world_file, WorldDescriptionV1};
pub use error::WorldLoadError;
pub use model::{TerrainV1, WormholeId, WormholeV1, WorldV1};
