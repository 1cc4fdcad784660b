//! Report directory persistence: write and read a [`SolveReportV1`] on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   report.json          canonical JSON, the full solve report
//!   report_digest.txt    ASCII digest string ("sha256:...")
//! ```
//!
//! The directory path is never part of the digest.
//!
//! # Fail-closed semantics
//!
//! - Missing file → error
//! - Report not byte-identical to its canonical form → error
//! - Wrong `schema_version` → error
//! - Stored digest differs from the recomputed one → error

use std::path::Path;

use serde_json::Value;
use starpath_kernel::proof::canon::canonical_json_bytes;
use starpath_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::runner::{SolveReportV1, SOLVE_REPORT_SCHEMA_VERSION};

const REPORT_FILENAME: &str = "report.json";
const DIGEST_FILENAME: &str = "report_digest.txt";

/// Error writing or reading a report directory.
#[derive(Debug, thiserror::Error)]
pub enum ReportDirError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("missing {filename}")]
    Missing { filename: String },
    #[error("report.json is not valid JSON: {detail}")]
    Parse { detail: String },
    #[error("report.json is not in canonical form")]
    NotCanonical,
    #[error("schema_version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },
    #[error("report_digest.txt is malformed: {content:?}")]
    MalformedDigest { content: String },
    #[error("digest mismatch: stored {stored}, recomputed {recomputed}")]
    DigestMismatch { stored: String, recomputed: String },
}

/// A report read back from disk and verified.
#[derive(Debug, Clone)]
pub struct StoredReportV1 {
    pub value: Value,
    pub canonical: Vec<u8>,
    pub digest: ContentHash,
}

impl StoredReportV1 {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.value["solved"].as_bool().unwrap_or(false)
    }
}

/// Write a report to `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`ReportDirError::Io`] on any filesystem failure.
pub fn write_report_dir(report: &SolveReportV1, dir: &Path) -> Result<(), ReportDirError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportDirError::Io {
        detail: format!("create_dir_all {}: {e}", dir.display()),
    })?;
    write_atomic(&dir.join(REPORT_FILENAME), report.canonical_bytes())?;
    write_atomic(&dir.join(DIGEST_FILENAME), report.digest().as_str().as_bytes())?;
    tracing::debug!(dir = %dir.display(), digest = %report.digest(), "report written");
    Ok(())
}

/// Read and verify a report directory.
///
/// # Errors
///
/// Returns [`ReportDirError`] on any integrity failure.
pub fn read_report_dir(dir: &Path) -> Result<StoredReportV1, ReportDirError> {
    let canonical = read_required(dir, REPORT_FILENAME)?;
    let stored_digest = read_required(dir, DIGEST_FILENAME)?;

    let value: Value = serde_json::from_slice(&canonical).map_err(|e| ReportDirError::Parse {
        detail: e.to_string(),
    })?;
    let recanonical = canonical_json_bytes(&value).map_err(|e| ReportDirError::Parse {
        detail: e.to_string(),
    })?;
    if recanonical != canonical {
        return Err(ReportDirError::NotCanonical);
    }

    let found = value["schema_version"].as_str().unwrap_or_default();
    if found != SOLVE_REPORT_SCHEMA_VERSION {
        return Err(ReportDirError::SchemaMismatch {
            expected: SOLVE_REPORT_SCHEMA_VERSION.into(),
            found: found.into(),
        });
    }

    let text = String::from_utf8_lossy(&stored_digest);
    let stored =
        ContentHash::parse(text.trim()).ok_or_else(|| ReportDirError::MalformedDigest {
            content: text.to_string(),
        })?;
    let digest = canonical_hash(HashDomain::Report, &canonical);
    if stored != digest {
        return Err(ReportDirError::DigestMismatch {
            stored: stored.to_string(),
            recomputed: digest.to_string(),
        });
    }

    Ok(StoredReportV1 {
        value,
        canonical,
        digest,
    })
}

/// Write via temp file + rename in the same directory.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportDirError> {
    let dir = path.parent().ok_or_else(|| ReportDirError::Io {
        detail: "no parent directory".into(),
    })?;
    let temp_name = format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);

    std::fs::write(&temp_path, content).map_err(|e| ReportDirError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| ReportDirError::Io {
        detail: format!("rename {} -> {}: {e}", temp_path.display(), path.display()),
    })
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, ReportDirError> {
    std::fs::read(dir.join(filename)).map_err(|_| ReportDirError::Missing {
        filename: filename.into(),
    })
}
