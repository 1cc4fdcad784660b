//! Harness runner: load → solve → replay-verify → report.
//!
//! The runner uses ONLY kernel and search APIs: `load_world`, `solve`,
//! `replay_verify`, `canonical_json_bytes`, `canonical_hash`. It does not
//! implement any search rule itself.
//!
//! # Pipeline
//!
//! ```text
//! load_world() → policy.validate() → solve()
//!   → [replay_verify() × traces] → digests → SolveReportV1
//! ```

use std::path::Path;

use serde_json::{json, Value};
use starpath_kernel::proof::canon::{canonical_json_bytes, CanonError};
use starpath_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use starpath_kernel::world::{load_world, load_world_file, WorldLoadError, WorldV1};
use starpath_search::policy::SearchPolicyV1;
use starpath_search::replay::{replay_verify, ReplayError};
use starpath_search::search::{solve, SolveOutcomeV1};
use starpath_search::SearchError;

/// Schema tag carried in every solve report.
pub const SOLVE_REPORT_SCHEMA_VERSION: &str = "solve_report.v1";

/// Error during a harness run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The world document failed to load.
    #[error(transparent)]
    Load(#[from] WorldLoadError),
    /// The policy was rejected before search.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// A returned trace did not replay. Always an engine bug.
    #[error("trace {index} failed replay: {source}")]
    Replay {
        index: usize,
        #[source]
        source: ReplayError,
    },
    /// Canonical JSON serialization failed.
    #[error(transparent)]
    Canon(#[from] CanonError),
}

/// The result of one run: the outcome plus its canonical report.
#[derive(Debug, Clone)]
pub struct SolveReportV1 {
    pub world_digest: ContentHash,
    pub policy_digest: ContentHash,
    pub outcome: SolveOutcomeV1,
    /// Digest of each trace, in outcome order.
    pub trace_digests: Vec<ContentHash>,
    canonical: Vec<u8>,
    digest: ContentHash,
}

impl SolveReportV1 {
    /// Canonical JSON bytes of the report.
    #[must_use]
    pub fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }

    /// Report digest under [`HashDomain::Report`].
    #[must_use]
    pub fn digest(&self) -> &ContentHash {
        &self.digest
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.outcome.is_solved()
    }
}

/// Run a solve from world document bytes.
///
/// # Errors
///
/// Returns [`RunError`] if loading, policy validation, replay, or
/// canonicalization fails. "No path" is not an error.
pub fn run_solve(description: &[u8], policy: &SearchPolicyV1) -> Result<SolveReportV1, RunError> {
    let world = load_world(description)?;
    run_solve_world(&world, policy)
}

/// Run a solve from a world file on disk.
///
/// # Errors
///
/// As [`run_solve`], plus [`WorldLoadError::Io`] for unreadable files.
pub fn run_solve_file(path: &Path, policy: &SearchPolicyV1) -> Result<SolveReportV1, RunError> {
    let world = load_world_file(path)?;
    run_solve_world(&world, policy)
}

/// Run a solve against an already-built world.
///
/// # Errors
///
/// As [`run_solve`], minus load errors.
pub fn run_solve_world(world: &WorldV1, policy: &SearchPolicyV1) -> Result<SolveReportV1, RunError> {
    let outcome = solve(world, policy)?;
    for (index, trace) in outcome.traces.iter().enumerate() {
        replay_verify(world, trace).map_err(|source| RunError::Replay { index, source })?;
    }
    build_report(world, policy, outcome)
}

/// Assemble the canonical report for an outcome.
///
/// # Errors
///
/// Returns [`RunError::Canon`] if any digest input fails to canonicalize.
pub fn build_report(
    world: &WorldV1,
    policy: &SearchPolicyV1,
    outcome: SolveOutcomeV1,
) -> Result<SolveReportV1, RunError> {
    let world_digest = world.digest()?;
    let policy_digest = policy.digest()?;
    let trace_digests = outcome
        .traces
        .iter()
        .map(starpath_search::PathTraceV1::digest)
        .collect::<Result<Vec<_>, _>>()?;

    let value = report_json(&world_digest, &policy_digest, policy, &outcome, &trace_digests);
    let canonical = canonical_json_bytes(&value)?;
    let digest = canonical_hash(HashDomain::Report, &canonical);

    tracing::info!(
        solved = outcome.is_solved(),
        traces = outcome.traces.len(),
        report_digest = %digest,
        "solve report built"
    );

    Ok(SolveReportV1 {
        world_digest,
        policy_digest,
        outcome,
        trace_digests,
        canonical,
        digest,
    })
}

fn report_json(
    world_digest: &ContentHash,
    policy_digest: &ContentHash,
    policy: &SearchPolicyV1,
    outcome: &SolveOutcomeV1,
    trace_digests: &[ContentHash],
) -> Value {
    json!({
        "schema_version": SOLVE_REPORT_SCHEMA_VERSION,
        "world_digest": world_digest.as_str(),
        "policy_digest": policy_digest.as_str(),
        "policy": policy.to_json_value(),
        "solved": outcome.is_solved(),
        "termination": outcome.termination.as_str(),
        "stats": outcome.stats.to_json_value(),
        "trace_digests": trace_digests.iter().map(ContentHash::as_str).collect::<Vec<_>>(),
        "traces": outcome
            .traces
            .iter()
            .map(starpath_search::PathTraceV1::to_json_value)
            .collect::<Vec<_>>(),
    })
}
