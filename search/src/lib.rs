//! Starpath Search: energy-budget reachability over a grid world.
//!
//! This crate provides the search layer. It depends only on
//! `starpath_kernel`; it does NOT depend on `starpath_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! starpath_kernel  ←  starpath_search  ←  starpath_harness
//! (world, canon)      (engine, traces)    (runner, worker, CLI)
//! ```
//!
//! # Key types
//!
//! - [`search::solve`] / [`search::solve_cancellable`] -- explicit-stack depth-first search
//! - [`SearchPolicyV1`] -- solution count, giant-star rule, dominance mode, budget
//! - [`BranchStateV1`] -- per-branch position, energy and copy-on-write sets
//! - [`DominanceCacheV1`] -- best-energy-per-signature pruning
//! - [`PathTraceV1`] -- read-only step records of a completed path
//! - [`replay::replay_verify`] -- independent re-derivation of a trace

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod branch;
pub mod dominance;
pub mod error;
pub mod policy;
pub mod replay;
pub mod search;
pub mod tiebreak;
pub mod trace;

pub use branch::BranchStateV1;
pub use dominance::{DominanceCacheV1, SignatureV1};
pub use error::SearchError;
pub use policy::{DominanceModeV1, GiantStarPolicyV1, SearchPolicyV1};
pub use replay::{replay_verify, ReplayError};
pub use search::{
    solve, solve_cancellable, PruneReasonV1, SearchStatsV1, SolveOutcomeV1, TerminationReasonV1,
};
pub use tiebreak::GiantStarChooserV1;
pub use trace::{ArrivalV1, CellEffectV1, PathTraceV1, StepRecordV1, TraceNodeV1};
