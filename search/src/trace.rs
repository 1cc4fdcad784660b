//! Path traces: the ordered, read-only record of a completed solution.
//!
//! During search, step records live in [`TraceNodeV1`]s linked to their
//! parent by `Arc`, so sibling branches share their common prefix and a dead
//! branch frees its own suffix. A completed path is materialized into a
//! [`PathTraceV1`] by walking the links from the leaf.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{json, Value};
use starpath_kernel::grid::{Cell, Direction};
use starpath_kernel::proof::canon::{canonical_json_bytes, CanonError};
use starpath_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use starpath_kernel::world::{WormholeId, WorldV1};

/// Schema tag carried in a trace's canonical JSON.
pub const PATH_TRACE_SCHEMA_VERSION: &str = "path_trace.v1";

/// How the ship reached a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrivalV1 {
    /// The first step; the ship starts here.
    Origin,
    /// An orthogonal move. `cleared` is the black hole a giant star on the
    /// previous cell neutralized as the ship left it.
    Move {
        direction: Direction,
        cleared: Option<Cell>,
    },
    /// A mandatory teleport from the wormhole entrance at `from`.
    Teleport {
        wormhole: WormholeId,
        from: Cell,
        cost: i64,
    },
}

impl ArrivalV1 {
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        match self {
            ArrivalV1::Origin => json!({ "kind": "origin" }),
            ArrivalV1::Move { direction, cleared } => json!({
                "kind": "move",
                "direction": direction.as_str(),
                "cleared_black_hole": cleared.map(<[u32; 2]>::from),
            }),
            ArrivalV1::Teleport {
                wormhole,
                from,
                cost,
            } => json!({
                "kind": "teleport",
                "wormhole": wormhole.as_str(),
                "from": <[u32; 2]>::from(*from),
                "cost": cost,
            }),
        }
    }
}

/// The energy rule a cell applied on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEffectV1 {
    /// The origin: nothing is charged.
    Start,
    /// The cell's traversal cost was subtracted.
    Cost(i64),
    /// A recharge zone multiplied the arrival energy; no cost was charged.
    Recharge { multiplier: u32 },
}

impl CellEffectV1 {
    /// The effect `cell` applies to a ship arriving by move or teleport.
    #[must_use]
    pub fn for_cell(world: &WorldV1, cell: Cell) -> Self {
        if let Some(multiplier) = world.recharge_multiplier(cell) {
            CellEffectV1::Recharge { multiplier }
        } else {
            CellEffectV1::Cost(world.cost(cell).unwrap_or(0))
        }
    }

    /// Energy after the effect. Saturates instead of overflowing.
    #[must_use]
    pub fn apply(self, energy_at_arrival: i64) -> i64 {
        match self {
            CellEffectV1::Start => energy_at_arrival,
            CellEffectV1::Cost(cost) => energy_at_arrival.saturating_sub(cost),
            CellEffectV1::Recharge { multiplier } => {
                energy_at_arrival.saturating_mul(i64::from(multiplier))
            }
        }
    }

    #[must_use]
    pub fn to_json_value(self) -> Value {
        match self {
            CellEffectV1::Start => json!({ "kind": "start" }),
            CellEffectV1::Cost(cost) => json!({ "kind": "cost", "cost": cost }),
            CellEffectV1::Recharge { multiplier } => {
                json!({ "kind": "recharge", "multiplier": multiplier })
            }
        }
    }
}

/// One step of a path.
///
/// Self-contained: a renderer can display any step without recomputing
/// anything from its neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecordV1 {
    pub cell: Cell,
    /// Energy on arrival, before the cell's effect.
    pub energy_before: i64,
    /// Energy after the cell's cost or recharge.
    pub energy_after: i64,
    pub arrival: ArrivalV1,
    pub effect: CellEffectV1,
    /// Black holes neutralized on this branch up to and including this step.
    pub neutralized: Arc<BTreeSet<Cell>>,
    /// Wormholes consumed on this branch up to and including this step.
    pub consumed: Arc<BTreeSet<WormholeId>>,
}

impl StepRecordV1 {
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        json!({
            "cell": <[u32; 2]>::from(self.cell),
            "energy_before": self.energy_before,
            "energy_after": self.energy_after,
            "arrival": self.arrival.to_json_value(),
            "effect": self.effect.to_json_value(),
            "neutralized_black_holes": self
                .neutralized
                .iter()
                .map(|c| <[u32; 2]>::from(*c))
                .collect::<Vec<_>>(),
            "consumed_wormholes": self
                .consumed
                .iter()
                .map(WormholeId::as_str)
                .collect::<Vec<_>>(),
        })
    }
}

impl std::fmt::Display for StepRecordV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.arrival {
            ArrivalV1::Origin => {
                return write!(f, "start at {} with {} energy", self.cell, self.energy_after);
            }
            ArrivalV1::Move { direction, cleared } => {
                if let Some(hole) = cleared {
                    write!(f, "neutralize black hole {hole}, ")?;
                }
                write!(f, "move {direction} to {}", self.cell)?;
            }
            ArrivalV1::Teleport {
                wormhole,
                from,
                cost,
            } => {
                write!(
                    f,
                    "teleport through {wormhole} from {from} to {} paying {cost}",
                    self.cell
                )?;
            }
        }
        match self.effect {
            CellEffectV1::Start => {}
            CellEffectV1::Cost(cost) => write!(f, ", cost {cost}")?,
            CellEffectV1::Recharge { multiplier } => write!(f, ", recharge x{multiplier}")?,
        }
        write!(f, ": {} -> {}", self.energy_before, self.energy_after)
    }
}

/// A completed path from origin to destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTraceV1 {
    steps: Vec<StepRecordV1>,
}

impl PathTraceV1 {
    /// Wrap an ordered step list. The list is not checked; use
    /// [`crate::replay::replay_verify`] for that.
    #[must_use]
    pub fn from_steps(steps: Vec<StepRecordV1>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[StepRecordV1] {
        &self.steps
    }

    /// Number of transitions (moves plus teleports). A trace of one step
    /// has zero moves.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    #[must_use]
    pub fn final_energy(&self) -> Option<i64> {
        self.steps.last().map(|s| s.energy_after)
    }

    /// Cells in visiting order.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        self.steps.iter().map(|s| s.cell).collect()
    }

    /// One human-readable line per step.
    #[must_use]
    pub fn narrative(&self) -> Vec<String> {
        self.steps.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn to_json_value(&self) -> Value {
        json!({
            "schema_version": PATH_TRACE_SCHEMA_VERSION,
            "moves": self.moves(),
            "final_energy": self.final_energy(),
            "steps": self.steps.iter().map(StepRecordV1::to_json_value).collect::<Vec<_>>(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content digest under [`HashDomain::Trace`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(HashDomain::Trace, &self.canonical_bytes()?))
    }
}

// ---------------------------------------------------------------------------
// Linked step records
// ---------------------------------------------------------------------------

/// A step record linked to the step before it.
///
/// A pending branch holds an `Arc` to its newest node. A node lives exactly
/// as long as some branch or child still refers to it.
pub struct TraceNodeV1 {
    parent: Option<Arc<TraceNodeV1>>,
    record: StepRecordV1,
}

impl TraceNodeV1 {
    pub(crate) fn new(parent: Option<Arc<TraceNodeV1>>, record: StepRecordV1) -> Arc<Self> {
        Arc::new(Self { parent, record })
    }

    #[must_use]
    pub fn record(&self) -> &StepRecordV1 {
        &self.record
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Arc<TraceNodeV1>> {
        self.parent.as_ref()
    }

    /// Materialize the path ending at this node, root first.
    #[must_use]
    pub fn to_trace(&self) -> PathTraceV1 {
        let mut steps = Vec::new();
        let mut cursor = Some(self);
        while let Some(node) = cursor {
            steps.push(node.record.clone());
            cursor = node.parent.as_deref();
        }
        steps.reverse();
        PathTraceV1 { steps }
    }
}

impl std::fmt::Debug for TraceNodeV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceNodeV1")
            .field("record", &self.record)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

// Unlinks the chain iteratively; the default recursive drop overflows the
// thread stack on long paths.
impl Drop for TraceNodeV1 {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}
