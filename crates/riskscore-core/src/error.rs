//! Engine error types.
//!
//! Dirty input never shows up here: unknown labels and unmatched answers are
//! absorbed during scoring. Only an unusable cache key or a failing
//! collaborator fails a request.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`crate::assembler::AnalysisAssembler`].
#[derive(Debug, Error)]
pub enum AssembleError {
    /// No attempt identifier was supplied, so nothing can be read or stored.
    #[error("missing cache key: an exam attempt id is required")]
    MissingCacheKey,

    /// The exam data store could not provide the attempt.
    #[error("failed to load attempt {attempt_id}")]
    AttemptLoad {
        attempt_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// Reading the cached analysis failed.
    #[error("failed to read cached analysis for {attempt_id}")]
    CacheRead {
        attempt_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// Persisting the assembled analysis failed.
    #[error("failed to store analysis for {attempt_id}")]
    CacheWrite {
        attempt_id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AssembleError {
    /// Returns `true` if retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AssembleError::MissingCacheKey)
    }
}

/// A stored analysis that exists but cannot be decoded.
///
/// Cache implementations return this inside their `anyhow::Error` so the
/// assembler can tell a damaged entry from an unreachable store.
#[derive(Debug, Error)]
#[error("corrupt cache entry {}", .path.display())]
pub struct CorruptCacheEntry {
    pub path: PathBuf,
    #[source]
    pub source: serde_json::Error,
}
