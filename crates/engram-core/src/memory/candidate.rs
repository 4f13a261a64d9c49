//! Ephemeral retrieval types.
//!
//! Candidates exist only for the lifetime of one `retrieve_context` call.
//! They normalize the heterogeneous results of the three retrieval lanes
//! into one shape the assembler can pack.

use serde::{Deserialize, Serialize};

// ============================================================================
// PROVENANCE
// ============================================================================

/// Which subsystem produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// Direct vector similarity hit on the memory collection
    VectorMemory,
    /// Reached by traversing relationship edges from a vector hit
    GraphExpansion,
    /// Vector similarity hit on stored conversation history
    Conversation,
}

impl CandidateSource {
    /// Stable string form used in logs and context labels
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSource::VectorMemory => "vector-memory",
            CandidateSource::GraphExpansion => "graph-expansion",
            CandidateSource::Conversation => "conversation",
        }
    }
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RETRIEVAL CANDIDATE
// ============================================================================

/// One ranked candidate in a merged retrieval result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalCandidate {
    /// Candidate text
    pub content: String,
    /// Which lane produced it
    pub source: CandidateSource,
    /// Relevance in [0, 1]. Similarity for vector lanes; for graph expansion
    /// a derived score of 1/(1+distance) so every candidate is comparable.
    pub relevance: f32,
    /// Importance 1..=10 when the source knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>,
    /// Record id when the source knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

impl RetrievalCandidate {
    /// Clamp the relevance into [0, 1]; scores arrive from external stores
    /// and distance conversions can drift slightly past the bounds.
    pub fn clamped(mut self) -> Self {
        self.relevance = self.relevance.clamp(0.0, 1.0);
        self
    }
}

// ============================================================================
// SOURCE COUNTS
// ============================================================================

/// Per-source result counts for one retrieval.
///
/// A zero where results were expected is how callers detect degraded
/// operation without the call itself failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCounts {
    /// Memories obtained from vector similarity search
    pub vector_memories: usize,
    /// Conversation chunks obtained from history search
    pub conversation_chunks: usize,
    /// Memories obtained through graph expansion
    pub graph_memories: usize,
}

impl SourceCounts {
    /// Total results fetched before deduplication
    pub fn total(&self) -> usize {
        self.vector_memories + self.conversation_chunks + self.graph_memories
    }
}

// ============================================================================
// RETRIEVED CONTEXT
// ============================================================================

/// Result of a full context retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedContext {
    /// Token-bounded context block, empty when nothing relevant fit
    pub context: String,
    /// What each lane actually contributed
    pub source_counts: SourceCounts,
    /// The merged, deduplicated candidate list backing the context string
    pub candidates: Vec<RetrievalCandidate>,
}

// ============================================================================
// TESTS
// ============================================================================
