//! Dominance cache: prune branches that re-reach a configuration already
//! seen with at least as much energy.
//!
//! The signature deliberately ignores the visited set. Two branches at the
//! same cell with the same neutralized and consumed sets can still differ in
//! which cells they may enter next, so the cache can prune a branch whose
//! continuation would have succeeded.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use starpath_kernel::grid::Cell;
use starpath_kernel::world::WormholeId;

use crate::policy::DominanceModeV1;

/// State signature used as the cache key.
///
/// `energy` is populated only under [`DominanceModeV1::ExactSignature`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureV1 {
    pub position: Cell,
    pub energy: Option<i64>,
    pub neutralized: Arc<BTreeSet<Cell>>,
    pub consumed: Arc<BTreeSet<WormholeId>>,
}

/// Map from signature to the best energy seen for it.
#[derive(Debug)]
pub struct DominanceCacheV1 {
    mode: DominanceModeV1,
    best: HashMap<SignatureV1, i64>,
}

impl DominanceCacheV1 {
    #[must_use]
    pub fn new(mode: DominanceModeV1) -> Self {
        Self {
            mode,
            best: HashMap::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> DominanceModeV1 {
        self.mode
    }

    /// Build the signature for a state, or `None` when the cache is disabled.
    #[must_use]
    pub fn signature(
        &self,
        position: Cell,
        energy: i64,
        neutralized: &Arc<BTreeSet<Cell>>,
        consumed: &Arc<BTreeSet<WormholeId>>,
    ) -> Option<SignatureV1> {
        let energy = match self.mode {
            DominanceModeV1::Disabled => return None,
            DominanceModeV1::EnergyDominance => None,
            DominanceModeV1::ExactSignature => Some(energy),
        };
        Some(SignatureV1 {
            position,
            energy,
            neutralized: Arc::clone(neutralized),
            consumed: Arc::clone(consumed),
        })
    }

    /// Whether a branch with `energy` at `signature` is dominated.
    #[must_use]
    pub fn should_prune(&self, signature: &SignatureV1, energy: i64) -> bool {
        self.best
            .get(signature)
            .is_some_and(|&best| best >= energy)
    }

    /// Remember `energy` for `signature` if it beats the stored value.
    pub fn record(&mut self, signature: SignatureV1, energy: i64) {
        self.best
            .entry(signature)
            .and_modify(|best| *best = (*best).max(energy))
            .or_insert(energy);
    }

    /// Prune-or-record in one step. Returns `true` if the branch survives.
    pub fn admit(&mut self, signature: SignatureV1, energy: i64) -> bool {
        if self.should_prune(&signature, energy) {
            return false;
        }
        self.record(signature, energy);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.best.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}
