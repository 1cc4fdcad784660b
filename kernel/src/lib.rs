//! Starpath Kernel: the immutable world model and canonical hashing.
//!
//! # API Surface
//!
//! - [`world::description::load_world`] -- parse and validate a world document into a [`world::WorldV1`]
//! - [`world::WorldV1`] -- read-only grid, costs, hazards and effects
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON writer
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `grid` ← `world` ← `proof`
//!
//! `proof` is used by `world` only for digests. `grid` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod grid;
pub mod proof;
pub mod world;
