//! Relationship builder.
//!
//! After a memory lands in the embedding store, its nearest neighbors above
//! a similarity threshold get materialized as typed graph edges. This is
//! best-effort enrichment: any failure here is logged and swallowed, and the
//! enclosing store operation still succeeds.

use crate::config::RELATED_SEARCH_LIMIT;
use crate::graph::{GraphStore, EDGE_SIMILAR};
use crate::store::EmbeddingStore;

// ============================================================================
// RELATIONSHIP BUILDER
// ============================================================================

/// Materializes similarity edges for freshly stored memories.
pub struct RelationshipBuilder {
    /// Strict lower bound: a neighbor at exactly this similarity is skipped
    threshold: f32,
}

impl RelationshipBuilder {
    /// Builder with the given edge-creation threshold.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Link `memory_id` to existing memories similar to `content`.
    ///
    /// Runs an owner-scoped neighbor search with the importance filter
    /// relaxed, then creates one directed `"similar"` edge per neighbor whose
    /// similarity is strictly above the threshold. Returns how many edges
    /// were created; zero on any failure.
    pub async fn link_similar(
        &self,
        embedding_store: &dyn EmbeddingStore,
        graph_store: &dyn GraphStore,
        owner_id: &str,
        memory_id: &str,
        content: &str,
    ) -> usize {
        let neighbors = match embedding_store
            .search_memories(owner_id, content, 1, RELATED_SEARCH_LIMIT)
            .await
        {
            Ok(neighbors) => neighbors,
            Err(e) => {
                tracing::warn!(error = %e, memory_id, "neighbor search failed, skipping edges");
                return 0;
            }
        };

        let mut created = 0;
        for neighbor in neighbors {
            if neighbor.id == memory_id || neighbor.similarity <= self.threshold {
                continue;
            }
            match graph_store
                .create_edge(memory_id, &neighbor.id, EDGE_SIMILAR, neighbor.similarity)
                .await
            {
                Ok(()) => created += 1,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        from = memory_id,
                        to = %neighbor.id,
                        "edge creation failed"
                    );
                }
            }
        }

        tracing::debug!(memory_id, edges = created, "similarity edges materialized");
        created
    }
}

// ============================================================================
// TESTS
// ============================================================================
