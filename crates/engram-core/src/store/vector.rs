//! In-process embedding store.
//!
//! Reference [`EmbeddingStore`] backend: hashed bag-of-words embeddings over
//! two collections (memories, conversation chunks) with an exhaustive cosine
//! scan. Owner scoping and importance filtering happen before ranking, so a
//! caller can never see another owner's rows regardless of similarity.
//!
//! Query embeddings are memoized in a small LRU cache; repeated queries in a
//! conversation are the common case.

use std::num::NonZeroUsize;
use std::sync::{Mutex, RwLock};

use lru::LruCache;

use async_trait::async_trait;

use crate::error::Result;
use crate::memory::{ConversationChunk, MemoryMetadata, MemoryRecord};

use super::embedder::{cosine_similarity, Embedder, HashEmbedder};
use super::{EmbeddingStore, ScoredItem};

/// Query embeddings memoized per store
const QUERY_CACHE_CAPACITY: usize = 100;

struct EmbeddedMemory {
    record: MemoryRecord,
    vector: Vec<f32>,
}

struct EmbeddedChunk {
    chunk: ConversationChunk,
    vector: Vec<f32>,
}

// ============================================================================
// IN-MEMORY VECTOR STORE
// ============================================================================

/// Embedding store backed by process memory.
///
/// Interior mutability keeps all methods `&self`, so the engine can hold the
/// store behind a plain `Arc`.
pub struct InMemoryVectorStore<E: Embedder = HashEmbedder> {
    embedder: E,
    memories: RwLock<Vec<EmbeddedMemory>>,
    conversations: RwLock<Vec<EmbeddedChunk>>,
    query_cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl Default for InMemoryVectorStore<HashEmbedder> {
    fn default() -> Self {
        Self::new(HashEmbedder)
    }
}

impl<E: Embedder> InMemoryVectorStore<E> {
    /// Create an empty store around the given embedder.
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            memories: RwLock::new(Vec::new()),
            conversations: RwLock::new(Vec::new()),
            query_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(QUERY_CACHE_CAPACITY).expect("capacity is non-zero"),
            )),
        }
    }

    /// Number of stored memories, across all owners.
    pub fn memory_count(&self) -> usize {
        self.memories.read().expect("memories lock").len()
    }

    /// Number of stored conversation chunks, across all owners.
    pub fn conversation_count(&self) -> usize {
        self.conversations.read().expect("conversations lock").len()
    }

    fn embed_query(&self, query: &str) -> Vec<f32> {
        let mut cache = self.query_cache.lock().expect("query cache lock");
        if let Some(vector) = cache.get(query) {
            return vector.clone();
        }
        let vector = self.embedder.embed(query);
        cache.put(query.to_string(), vector.clone());
        vector
    }
}

#[async_trait]
impl<E: Embedder> EmbeddingStore for InMemoryVectorStore<E> {
    async fn store_memory(
        &self,
        owner_id: &str,
        content: &str,
        memory_type: &str,
        importance: u8,
        metadata: MemoryMetadata,
    ) -> Result<String> {
        let record = MemoryRecord::new(owner_id, content, memory_type, importance, metadata);
        let id = record.id.clone();
        let vector = self.embedder.embed(content);

        self.memories
            .write()
            .expect("memories lock")
            .push(EmbeddedMemory { record, vector });

        tracing::debug!(memory_id = %id, owner_id, "memory stored in vector index");
        Ok(id)
    }

    async fn store_conversation_chunk(
        &self,
        owner_id: &str,
        conversation_id: &str,
        content: &str,
        chunk_index: u64,
    ) -> Result<String> {
        let chunk = ConversationChunk::new(owner_id, conversation_id, content, chunk_index);
        let id = chunk.id.clone();
        let vector = self.embedder.embed(content);

        self.conversations
            .write()
            .expect("conversations lock")
            .push(EmbeddedChunk { chunk, vector });

        tracing::debug!(chunk_id = %id, conversation_id, "conversation chunk stored");
        Ok(id)
    }

    async fn search_memories(
        &self,
        owner_id: &str,
        query: &str,
        min_importance: u8,
        limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let query_vector = self.embed_query(query);

        let memories = self.memories.read().expect("memories lock");
        let mut hits: Vec<ScoredItem> = memories
            .iter()
            .filter(|m| m.record.owner_id == owner_id && m.record.importance >= min_importance)
            .map(|m| ScoredItem {
                id: m.record.id.clone(),
                content: m.record.content.clone(),
                similarity: cosine_similarity(&query_vector, &m.vector).clamp(0.0, 1.0),
                importance: Some(m.record.importance),
                memory_type: Some(m.record.memory_type.clone()),
                conversation_id: None,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn search_conversations(
        &self,
        owner_id: &str,
        query: &str,
        exclude_conversation_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let query_vector = self.embed_query(query);

        let conversations = self.conversations.read().expect("conversations lock");
        let mut hits: Vec<ScoredItem> = conversations
            .iter()
            .filter(|c| c.chunk.owner_id == owner_id)
            .filter(|c| {
                exclude_conversation_id.is_none_or(|excluded| c.chunk.conversation_id != excluded)
            })
            .map(|c| ScoredItem {
                id: c.chunk.id.clone(),
                content: c.chunk.content.clone(),
                similarity: cosine_similarity(&query_vector, &c.vector).clamp(0.0, 1.0),
                importance: None,
                memory_type: None,
                conversation_id: Some(c.chunk.conversation_id.clone()),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }
}

// ============================================================================
// TESTS
// ============================================================================
