//! Error taxonomy for the retrieval engine.
//!
//! Two families matter here:
//!
//! - **Fatal**: [`MemoryError::InvalidInput`] is the only error surfaced to
//!   callers of the retrieval path. It is raised synchronously, before any
//!   external store is contacted.
//! - **Recoverable**: store connectivity loss and extraction failure. The
//!   orchestrator converts these into empty partial results at its boundary;
//!   they only propagate on the ingest path, where a missing memory id makes
//!   the operation meaningless.

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Engine error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Caller passed an empty owner id, query, or content
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The vector similarity index is unreachable
    #[error("embedding store unavailable: {0}")]
    StoreUnavailable(String),
    /// The relationship graph is unreachable
    #[error("graph store unavailable: {0}")]
    GraphUnavailable(String),
    /// The concept extractor failed or timed out
    #[error("concept extraction failed: {0}")]
    ExtractionFailed(String),
}

impl MemoryError {
    /// True for errors the orchestrator degrades into empty partial results
    /// instead of propagating.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MemoryError::InvalidInput(_))
    }
}

/// Engine result type
pub type Result<T> = std::result::Result<T, MemoryError>;

// ============================================================================
// TESTS
// ============================================================================
