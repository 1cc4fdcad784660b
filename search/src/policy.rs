//! Search policy types.

use serde_json::{json, Value};
use starpath_kernel::proof::canon::{canonical_json_bytes, CanonError};
use starpath_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::SearchError;

/// Schema tag carried in the policy's canonical JSON.
pub const SEARCH_POLICY_SCHEMA_VERSION: &str = "search_policy.v1";

/// Search configuration.
///
/// Every field affects which traces are returned, so the policy digest is
/// bound into every solve report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicyV1 {
    /// Stop after this many distinct solutions (must be at least 1).
    pub max_solutions: u32,
    /// How a giant star picks which adjacent black hole to neutralize.
    pub giant_star: GiantStarPolicyV1,
    /// Pruning cache strategy.
    pub dominance: DominanceModeV1,
    /// Hard cap on expanded states. `None` runs until the stack is empty.
    pub max_expansions: Option<u64>,
}

impl SearchPolicyV1 {
    /// Validate before a search starts.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `max_solutions` is zero or
    /// `max_expansions` is `Some(0)`.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_solutions == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_solutions must be at least 1".into(),
            });
        }
        if self.max_expansions == Some(0) {
            return Err(SearchError::InvalidPolicy {
                detail: "max_expansions must be at least 1 when set".into(),
            });
        }
        Ok(())
    }

    /// Canonical JSON projection, used for the policy digest and reports.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        json!({
            "schema_version": SEARCH_POLICY_SCHEMA_VERSION,
            "max_solutions": self.max_solutions,
            "giant_star": self.giant_star.to_json_value(),
            "dominance": self.dominance.as_str(),
            "max_expansions": self.max_expansions,
        })
    }

    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content digest under [`HashDomain::Policy`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(HashDomain::Policy, &self.canonical_bytes()?))
    }
}

impl Default for SearchPolicyV1 {
    fn default() -> Self {
        Self {
            max_solutions: 1,
            giant_star: GiantStarPolicyV1::Exhaustive,
            dominance: DominanceModeV1::ExactSignature,
            max_expansions: None,
        }
    }
}

/// Giant-star tie-break rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiantStarPolicyV1 {
    /// Branch once per adjacent, not-yet-neutralized black hole.
    Exhaustive,
    /// Neutralize one candidate chosen by a `ChaCha8Rng` seeded with `seed`.
    SingleRandom { seed: u64 },
}

impl GiantStarPolicyV1 {
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        match self {
            GiantStarPolicyV1::Exhaustive => json!({ "mode": "exhaustive" }),
            GiantStarPolicyV1::SingleRandom { seed } => {
                json!({ "mode": "single_random", "seed": seed })
            }
        }
    }
}

/// Dominance cache strategy.
///
/// Neither cache mode looks at the visited set, so under either one a
/// "no path" answer can be a false negative. Only `Disabled` is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DominanceModeV1 {
    /// No cache.
    Disabled,
    /// Signature excludes energy; a branch is pruned when the same
    /// signature was already reached with at least as much energy.
    EnergyDominance,
    /// Signature includes energy; only exact repeats are pruned.
    #[default]
    ExactSignature,
}

impl DominanceModeV1 {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DominanceModeV1::Disabled => "disabled",
            DominanceModeV1::EnergyDominance => "energy_dominance",
            DominanceModeV1::ExactSignature => "exact_signature",
        }
    }
}

impl std::fmt::Display for DominanceModeV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
