//! Giant-star tie-break: which adjacent black hole a giant star neutralizes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starpath_kernel::grid::Cell;

use crate::policy::GiantStarPolicyV1;

/// Turns a candidate list into successor groups.
///
/// Each group is the black hole cleared for that group's moves (`None` for
/// no clearing). The random stream is consumed once per giant star that has
/// at least one candidate, in search order, so a fixed seed reproduces the
/// same choices.
#[derive(Debug, Clone)]
pub struct GiantStarChooserV1 {
    rng: Option<ChaCha8Rng>,
}

impl GiantStarChooserV1 {
    #[must_use]
    pub fn new(policy: GiantStarPolicyV1) -> Self {
        let rng = match policy {
            GiantStarPolicyV1::Exhaustive => None,
            GiantStarPolicyV1::SingleRandom { seed } => Some(ChaCha8Rng::seed_from_u64(seed)),
        };
        Self { rng }
    }

    /// Successor groups for `candidates`, which must already be in
    /// direction order.
    pub fn groups(&mut self, candidates: &[Cell]) -> Vec<Option<Cell>> {
        if candidates.is_empty() {
            return vec![None];
        }
        match &mut self.rng {
            None => candidates.iter().copied().map(Some).collect(),
            Some(rng) => {
                let pick = rng.gen_range(0..candidates.len());
                vec![Some(candidates[pick])]
            }
        }
    }
}
