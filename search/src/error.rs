//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Runtime outcomes
//! (pruned branches, exhausted stack, budget, cancellation) are ordinary
//! control flow reported through [`crate::search::TerminationReasonV1`] and
//! [`crate::search::SearchStatsV1`].

/// Typed failure for pre-flight search validation.
///
/// Returned before the first state is pushed; no outcome is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The policy carries a value the engine cannot honor.
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
}
