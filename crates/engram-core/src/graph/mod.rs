//! Relationship graph seam.
//!
//! The engine reaches the typed graph through the [`GraphStore`] trait:
//! memory / concept / conversation nodes, weighted typed edges, bounded
//! traversal, and concept frequency counters. Production backends wrap a
//! graph database; the in-process backend below keeps an adjacency map.

mod adjacency;

pub use adjacency::InMemoryGraphStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Edge type materialized by the relationship builder
pub const EDGE_SIMILAR: &str = "similar";

// ============================================================================
// RELATED MEMORY
// ============================================================================

/// One memory reached by graph traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedMemory {
    /// Memory id of the reached node
    pub id: String,
    /// Stored content
    pub content: String,
    /// Importance 1..=10
    pub importance: u8,
    /// Memory type tag
    pub memory_type: String,
    /// Hops from the seed (1 = direct neighbor)
    pub distance: usize,
}

// ============================================================================
// KNOWLEDGE SUMMARY
// ============================================================================

/// Aggregate view of one owner's graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSummary {
    /// Memory nodes owned
    pub memory_count: usize,
    /// Distinct concepts mentioned by those memories
    pub concept_count: usize,
    /// Conversation nodes owned
    pub conversation_count: usize,
    /// Most frequent concepts, (name, frequency), frequency descending
    pub top_concepts: Vec<(String, u64)>,
}

// ============================================================================
// GRAPH STORE
// ============================================================================

/// Typed relationship graph over memories, concepts, and conversations.
///
/// All writes are awaited for errors. Traversal is depth-bounded and
/// deterministic: importance descending, distance ascending, id ascending.
/// Connectivity loss surfaces as [`crate::MemoryError::GraphUnavailable`].
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Mirror a stored memory as a graph node.
    async fn create_memory_node(
        &self,
        id: &str,
        owner_id: &str,
        content: &str,
        memory_type: &str,
        importance: u8,
    ) -> Result<()>;

    /// Create a conversation node; upsert on repeated calls.
    async fn create_conversation_node(
        &self,
        conversation_id: &str,
        owner_id: &str,
        title: &str,
    ) -> Result<()>;

    /// Create or update a directed, weighted, typed edge. Idempotent; the
    /// last write wins on strength.
    async fn create_edge(
        &self,
        from_id: &str,
        to_id: &str,
        edge_type: &str,
        strength: f32,
    ) -> Result<()>;

    /// Create a concept with frequency 1, or increment its counter.
    async fn upsert_concept(&self, name: &str) -> Result<()>;

    /// Upsert each concept and record that the memory mentions it.
    async fn link_concepts_to_memory(&self, memory_id: &str, concepts: &[String]) -> Result<()>;

    /// Memories reachable from `seed_id` within `max_depth` hops, each at its
    /// shortest distance, seed excluded, at most `limit` entries.
    async fn find_related(
        &self,
        seed_id: &str,
        max_depth: usize,
        limit: usize,
    ) -> Result<Vec<RelatedMemory>>;

    /// Aggregate counts and top concepts for one owner.
    async fn knowledge_summary(&self, owner_id: &str) -> Result<KnowledgeSummary>;
}
