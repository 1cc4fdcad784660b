//! Per-branch search state.
//!
//! Every branch owns a logical copy of its sets. The copies are shared
//! behind `Arc` and cloned only when a branch writes to one
//! (`Arc::make_mut`), so siblings that do not diverge cost a refcount bump.

use std::collections::BTreeSet;
use std::sync::Arc;

use starpath_kernel::grid::{Cell, CellSetV1};
use starpath_kernel::world::{WormholeId, WorldV1};

use crate::trace::{ArrivalV1, TraceNodeV1};

/// A pending branch on the work stack.
///
/// `energy` is the energy on arrival at `position`, before the cell's own
/// effect. `visited` holds cells occupied earlier on this branch, not
/// including `position`.
#[derive(Debug, Clone)]
pub struct BranchStateV1 {
    pub position: Cell,
    pub energy: i64,
    pub visited: Arc<CellSetV1>,
    pub consumed: Arc<BTreeSet<WormholeId>>,
    pub neutralized: Arc<BTreeSet<Cell>>,
    pub arrival: ArrivalV1,
    /// The previous step's record (`None` at the root).
    pub parent: Option<Arc<TraceNodeV1>>,
}

impl BranchStateV1 {
    /// The single root branch: at the origin with the initial budget.
    #[must_use]
    pub fn root(world: &WorldV1) -> Self {
        Self {
            position: world.origin(),
            energy: world.initial_energy(),
            visited: Arc::new(CellSetV1::with_capacity(world.cell_count())),
            consumed: Arc::default(),
            neutralized: Arc::default(),
            arrival: ArrivalV1::Origin,
            parent: None,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self.arrival, ArrivalV1::Origin)
    }
}

/// Copy-on-write insert into a shared set.
pub(crate) fn with_inserted<T: Ord + Clone>(set: &Arc<BTreeSet<T>>, value: T) -> Arc<BTreeSet<T>> {
    let mut next = Arc::clone(set);
    Arc::make_mut(&mut next).insert(value);
    next
}

/// Copy-on-write insert into a shared visited bitset.
pub(crate) fn with_visited(set: &Arc<CellSetV1>, index: usize) -> Arc<CellSetV1> {
    let mut next = Arc::clone(set);
    Arc::make_mut(&mut next).insert(index);
    next
}
