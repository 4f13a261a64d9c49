//! Retrieval orchestrator.
//!
//! One query fans out to three lanes — vector memory search, conversation
//! history search, and graph expansion from the top vector hits — then the
//! results merge into a single ranked candidate list.
//!
//! The fan-out is request-scoped structured concurrency: every lane is a
//! future polled inside the caller's task, each wrapped in its own timeout.
//! Dropping the `retrieve` future cancels every in-flight lane. A lane that
//! fails or times out contributes an empty slot and a zero in the source
//! counts; it never fails the call.
//!
//! Ranking is one uniform rule: lexicographic on (source priority, native
//! per-source score). Vector memories rank by similarity, graph expansion by
//! importance then distance, conversation chunks by similarity. Duplicate
//! content is dropped at the first lower-priority occurrence.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{
    CONVERSATION_CONTEXT_LIMIT, GRAPH_EXPANSION_LIMIT, GRAPH_SEED_COUNT, MIN_RETRIEVAL_IMPORTANCE,
};
use crate::error::{MemoryError, Result};
use crate::graph::{GraphStore, RelatedMemory};
use crate::memory::{CandidateSource, RetrievalCandidate, SourceCounts};
use crate::store::{EmbeddingStore, ScoredItem};

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Coordinates the concurrent fan-out and the merge for one query shape:
/// find memories and chunks relevant to a short query, scoped to one owner.
pub struct Orchestrator {
    embedding_store: Arc<dyn EmbeddingStore>,
    graph_store: Arc<dyn GraphStore>,
    fetch_timeout: Duration,
    max_graph_depth: usize,
}

impl Orchestrator {
    /// Orchestrator over the given stores.
    pub fn new(
        embedding_store: Arc<dyn EmbeddingStore>,
        graph_store: Arc<dyn GraphStore>,
        fetch_timeout: Duration,
        max_graph_depth: usize,
    ) -> Self {
        Self {
            embedding_store,
            graph_store,
            fetch_timeout,
            max_graph_depth,
        }
    }

    /// Fan out, merge, and deduplicate.
    ///
    /// Only an empty owner id or query is an error, raised before any store
    /// is contacted. Everything else degrades per lane.
    pub async fn retrieve(
        &self,
        owner_id: &str,
        query: &str,
        exclude_conversation_id: Option<&str>,
        max_memories: usize,
        include_graph_context: bool,
    ) -> Result<(Vec<RetrievalCandidate>, SourceCounts)> {
        validate_query_inputs(owner_id, query)?;

        let (vector_hits, conversation_hits) = tokio::join!(
            fetch_or_empty(
                "vector-memory",
                self.fetch_timeout,
                self.embedding_store.search_memories(
                    owner_id,
                    query,
                    MIN_RETRIEVAL_IMPORTANCE,
                    max_memories,
                ),
            ),
            fetch_or_empty(
                "conversation",
                self.fetch_timeout,
                self.embedding_store.search_conversations(
                    owner_id,
                    query,
                    exclude_conversation_id,
                    CONVERSATION_CONTEXT_LIMIT,
                ),
            ),
        );

        let graph_hits = if include_graph_context && !vector_hits.is_empty() {
            self.expand_from_seeds(&vector_hits).await
        } else {
            Vec::new()
        };

        let counts = SourceCounts {
            vector_memories: vector_hits.len(),
            conversation_chunks: conversation_hits.len(),
            graph_memories: graph_hits.len(),
        };

        let candidates = merge_candidates(vector_hits, graph_hits, conversation_hits);
        Ok((candidates, counts))
    }

    /// Expand the graph from the top vector hits, one bounded traversal per
    /// seed, concurrently. Merged output is re-ranked by importance then
    /// distance so the two seeds' results interleave correctly.
    async fn expand_from_seeds(&self, vector_hits: &[ScoredItem]) -> Vec<RelatedMemory> {
        let expansions = vector_hits.iter().take(GRAPH_SEED_COUNT).map(|seed| {
            fetch_or_empty(
                "graph-expansion",
                self.fetch_timeout,
                self.graph_store
                    .find_related(&seed.id, self.max_graph_depth, GRAPH_EXPANSION_LIMIT),
            )
        });

        let mut merged: Vec<RelatedMemory> = futures::future::join_all(expansions)
            .await
            .into_iter()
            .flatten()
            .collect();

        merged.sort_by(|a, b| {
            b.importance
                .cmp(&a.importance)
                .then_with(|| a.distance.cmp(&b.distance))
                .then_with(|| a.id.cmp(&b.id))
        });
        merged
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Reject empty owner ids and queries before any external call.
pub fn validate_query_inputs(owner_id: &str, query: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        return Err(MemoryError::InvalidInput("owner id is empty".into()));
    }
    if query.trim().is_empty() {
        return Err(MemoryError::InvalidInput("query is empty".into()));
    }
    Ok(())
}

// ============================================================================
// DEGRADATION BOUNDARY
// ============================================================================

/// Await a lane under a timeout; failure and timeout both collapse to an
/// empty contribution, logged but never propagated.
async fn fetch_or_empty<T>(
    lane: &str,
    timeout: Duration,
    fut: impl Future<Output = Result<Vec<T>>>,
) -> Vec<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(items)) => items,
        Ok(Err(e)) => {
            tracing::warn!(lane, error = %e, "sub-fetch failed, contributing empty slot");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(lane, timeout_ms = timeout.as_millis() as u64, "sub-fetch timed out");
            Vec::new()
        }
    }
}

// ============================================================================
// MERGE
// ============================================================================

/// Combine the three lanes in fixed priority order and drop duplicate
/// content, keeping the first (highest-priority) occurrence.
pub fn merge_candidates(
    vector_hits: Vec<ScoredItem>,
    graph_hits: Vec<RelatedMemory>,
    conversation_hits: Vec<ScoredItem>,
) -> Vec<RetrievalCandidate> {
    let mut merged: Vec<RetrievalCandidate> = Vec::new();
    let mut seen_content: std::collections::HashSet<String> = std::collections::HashSet::new();

    let mut push = |candidate: RetrievalCandidate| {
        if seen_content.insert(candidate.content.clone()) {
            merged.push(candidate.clamped());
        }
    };

    for hit in vector_hits {
        push(RetrievalCandidate {
            content: hit.content,
            source: CandidateSource::VectorMemory,
            relevance: hit.similarity,
            importance: hit.importance,
            record_id: Some(hit.id),
        });
    }

    for hit in graph_hits {
        // Traversal carries no similarity; derive a comparable relevance
        // that decays with hop distance.
        let relevance = 1.0 / (1.0 + hit.distance as f32);
        push(RetrievalCandidate {
            content: hit.content,
            source: CandidateSource::GraphExpansion,
            relevance,
            importance: Some(hit.importance),
            record_id: Some(hit.id),
        });
    }

    for hit in conversation_hits {
        push(RetrievalCandidate {
            content: hit.content,
            source: CandidateSource::Conversation,
            relevance: hit.similarity,
            importance: None,
            record_id: Some(hit.id),
        });
    }

    merged
}

// ============================================================================
// TESTS
// ============================================================================
