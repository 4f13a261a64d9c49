//! Embedding store seam.
//!
//! The engine talks to the vector similarity index through the
//! [`EmbeddingStore`] trait so production backends (a vector database behind
//! the network) and the in-process backend below are interchangeable — and
//! so tests can inject failing doubles.

mod embedder;
mod vector;

pub use embedder::{cosine_similarity, Embedder, HashEmbedder, EMBEDDING_DIMENSIONS};
pub use vector::InMemoryVectorStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::memory::MemoryMetadata;

// ============================================================================
// SCORED ITEM
// ============================================================================

/// One nearest-neighbor hit from the embedding store.
///
/// Similarity is 1 − distance, clamped to [0, 1] by the store before it
/// crosses this boundary.
#[derive(Debug, Clone)]
pub struct ScoredItem {
    /// Record id of the hit
    pub id: String,
    /// Stored content
    pub content: String,
    /// Similarity to the query in [0, 1]
    pub similarity: f32,
    /// Importance 1..=10, present for memory hits
    pub importance: Option<u8>,
    /// Memory type tag, present for memory hits
    pub memory_type: Option<String>,
    /// Conversation id, present for conversation hits
    pub conversation_id: Option<String>,
}

// ============================================================================
// EMBEDDING STORE
// ============================================================================

/// Vector similarity store for memories and conversation history.
///
/// Writes are awaited for errors; searches are side-effect free and return an
/// empty list, not an error, when nothing satisfies the filters. Connectivity
/// loss surfaces as [`crate::MemoryError::StoreUnavailable`].
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    /// Store a memory; returns the id assigned to it.
    async fn store_memory(
        &self,
        owner_id: &str,
        content: &str,
        memory_type: &str,
        importance: u8,
        metadata: MemoryMetadata,
    ) -> Result<String>;

    /// Store one conversation exchange; returns the chunk id.
    async fn store_conversation_chunk(
        &self,
        owner_id: &str,
        conversation_id: &str,
        content: &str,
        chunk_index: u64,
    ) -> Result<String>;

    /// Nearest memories to `query`, owner-scoped, importance-filtered,
    /// ordered by similarity descending. Never returns more than `limit`.
    async fn search_memories(
        &self,
        owner_id: &str,
        query: &str,
        min_importance: u8,
        limit: usize,
    ) -> Result<Vec<ScoredItem>>;

    /// Nearest conversation chunks to `query`, owner-scoped, optionally
    /// excluding one conversation, ordered by similarity descending.
    async fn search_conversations(
        &self,
        owner_id: &str,
        query: &str,
        exclude_conversation_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredItem>>;
}
