//! Store and extractor doubles.
//!
//! Each double exercises one failure shape: hard unavailability, stalls
//! that only a timeout resolves, scripted similarity scores, and call
//! counting for "no external calls were made" assertions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use engram_core::{
    ConceptExtractor, EmbeddingStore, GraphStore, KnowledgeSummary, MemoryError, MemoryMetadata,
    RelatedMemory, Result, ScoredItem,
};

// ============================================================================
// FAILING STORES
// ============================================================================

/// Embedding store whose every call fails with `StoreUnavailable`.
pub struct FailingVectorStore;

#[async_trait]
impl EmbeddingStore for FailingVectorStore {
    async fn store_memory(
        &self,
        _owner_id: &str,
        _content: &str,
        _memory_type: &str,
        _importance: u8,
        _metadata: MemoryMetadata,
    ) -> Result<String> {
        Err(MemoryError::StoreUnavailable("index offline".into()))
    }

    async fn store_conversation_chunk(
        &self,
        _owner_id: &str,
        _conversation_id: &str,
        _content: &str,
        _chunk_index: u64,
    ) -> Result<String> {
        Err(MemoryError::StoreUnavailable("index offline".into()))
    }

    async fn search_memories(
        &self,
        _owner_id: &str,
        _query: &str,
        _min_importance: u8,
        _limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        Err(MemoryError::StoreUnavailable("index offline".into()))
    }

    async fn search_conversations(
        &self,
        _owner_id: &str,
        _query: &str,
        _exclude_conversation_id: Option<&str>,
        _limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        Err(MemoryError::StoreUnavailable("index offline".into()))
    }
}

/// Graph store whose every call fails with `GraphUnavailable`.
pub struct FailingGraphStore;

#[async_trait]
impl GraphStore for FailingGraphStore {
    async fn create_memory_node(
        &self,
        _id: &str,
        _owner_id: &str,
        _content: &str,
        _memory_type: &str,
        _importance: u8,
    ) -> Result<()> {
        Err(MemoryError::GraphUnavailable("bolt handshake failed".into()))
    }

    async fn create_conversation_node(
        &self,
        _conversation_id: &str,
        _owner_id: &str,
        _title: &str,
    ) -> Result<()> {
        Err(MemoryError::GraphUnavailable("bolt handshake failed".into()))
    }

    async fn create_edge(
        &self,
        _from_id: &str,
        _to_id: &str,
        _edge_type: &str,
        _strength: f32,
    ) -> Result<()> {
        Err(MemoryError::GraphUnavailable("bolt handshake failed".into()))
    }

    async fn upsert_concept(&self, _name: &str) -> Result<()> {
        Err(MemoryError::GraphUnavailable("bolt handshake failed".into()))
    }

    async fn link_concepts_to_memory(
        &self,
        _memory_id: &str,
        _concepts: &[String],
    ) -> Result<()> {
        Err(MemoryError::GraphUnavailable("bolt handshake failed".into()))
    }

    async fn find_related(
        &self,
        _seed_id: &str,
        _max_depth: usize,
        _limit: usize,
    ) -> Result<Vec<RelatedMemory>> {
        Err(MemoryError::GraphUnavailable("bolt handshake failed".into()))
    }

    async fn knowledge_summary(&self, _owner_id: &str) -> Result<KnowledgeSummary> {
        Err(MemoryError::GraphUnavailable("bolt handshake failed".into()))
    }
}

// ============================================================================
// STALLED GRAPH STORE
// ============================================================================

/// Graph store whose traversal never answers; everything else delegates.
/// Exercises the per-sub-fetch timeout.
pub struct StalledGraphStore {
    inner: Arc<dyn GraphStore>,
}

impl StalledGraphStore {
    pub fn new(inner: Arc<dyn GraphStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl GraphStore for StalledGraphStore {
    async fn create_memory_node(
        &self,
        id: &str,
        owner_id: &str,
        content: &str,
        memory_type: &str,
        importance: u8,
    ) -> Result<()> {
        self.inner
            .create_memory_node(id, owner_id, content, memory_type, importance)
            .await
    }

    async fn create_conversation_node(
        &self,
        conversation_id: &str,
        owner_id: &str,
        title: &str,
    ) -> Result<()> {
        self.inner
            .create_conversation_node(conversation_id, owner_id, title)
            .await
    }

    async fn create_edge(
        &self,
        from_id: &str,
        to_id: &str,
        edge_type: &str,
        strength: f32,
    ) -> Result<()> {
        self.inner.create_edge(from_id, to_id, edge_type, strength).await
    }

    async fn upsert_concept(&self, name: &str) -> Result<()> {
        self.inner.upsert_concept(name).await
    }

    async fn link_concepts_to_memory(&self, memory_id: &str, concepts: &[String]) -> Result<()> {
        self.inner.link_concepts_to_memory(memory_id, concepts).await
    }

    async fn find_related(
        &self,
        _seed_id: &str,
        _max_depth: usize,
        _limit: usize,
    ) -> Result<Vec<RelatedMemory>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    async fn knowledge_summary(&self, owner_id: &str) -> Result<KnowledgeSummary> {
        self.inner.knowledge_summary(owner_id).await
    }
}

// ============================================================================
// CALL-COUNTING VECTOR STORE
// ============================================================================

/// Embedding store that counts calls before delegating.
pub struct CountingVectorStore {
    inner: Arc<dyn EmbeddingStore>,
    calls: AtomicUsize,
}

impl CountingVectorStore {
    pub fn new(inner: Arc<dyn EmbeddingStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Total calls observed across all methods.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingStore for CountingVectorStore {
    async fn store_memory(
        &self,
        owner_id: &str,
        content: &str,
        memory_type: &str,
        importance: u8,
        metadata: MemoryMetadata,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .store_memory(owner_id, content, memory_type, importance, metadata)
            .await
    }

    async fn store_conversation_chunk(
        &self,
        owner_id: &str,
        conversation_id: &str,
        content: &str,
        chunk_index: u64,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .store_conversation_chunk(owner_id, conversation_id, content, chunk_index)
            .await
    }

    async fn search_memories(
        &self,
        owner_id: &str,
        query: &str,
        min_importance: u8,
        limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .search_memories(owner_id, query, min_importance, limit)
            .await
    }

    async fn search_conversations(
        &self,
        owner_id: &str,
        query: &str,
        exclude_conversation_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .search_conversations(owner_id, query, exclude_conversation_id, limit)
            .await
    }
}

// ============================================================================
// SCRIPTED VECTOR STORE
// ============================================================================

/// Embedding store that answers memory searches from a fixed script.
///
/// Lets tests pin exact similarity scores, e.g. the 0.70 edge-threshold
/// boundary.
pub struct ScriptedVectorStore {
    hits: Vec<ScoredItem>,
}

impl ScriptedVectorStore {
    pub fn new(hits: Vec<ScoredItem>) -> Self {
        Self { hits }
    }

    /// Convenience: a memory hit with the given id and similarity.
    pub fn hit(id: &str, content: &str, similarity: f32) -> ScoredItem {
        ScoredItem {
            id: id.into(),
            content: content.into(),
            similarity,
            importance: Some(5),
            memory_type: Some("fact".into()),
            conversation_id: None,
        }
    }
}

#[async_trait]
impl EmbeddingStore for ScriptedVectorStore {
    async fn store_memory(
        &self,
        _owner_id: &str,
        _content: &str,
        _memory_type: &str,
        _importance: u8,
        _metadata: MemoryMetadata,
    ) -> Result<String> {
        Ok("scripted-memory".into())
    }

    async fn store_conversation_chunk(
        &self,
        _owner_id: &str,
        _conversation_id: &str,
        _content: &str,
        _chunk_index: u64,
    ) -> Result<String> {
        Ok("scripted-chunk".into())
    }

    async fn search_memories(
        &self,
        _owner_id: &str,
        _query: &str,
        min_importance: u8,
        limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        Ok(self
            .hits
            .iter()
            .filter(|h| h.importance.unwrap_or(1) >= min_importance)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search_conversations(
        &self,
        _owner_id: &str,
        _query: &str,
        _exclude_conversation_id: Option<&str>,
        _limit: usize,
    ) -> Result<Vec<ScoredItem>> {
        Ok(Vec::new())
    }
}

// ============================================================================
// EXTRACTORS
// ============================================================================

/// Extractor that always answers with the same labels.
pub struct StubExtractor(pub Vec<String>);

#[async_trait]
impl ConceptExtractor for StubExtractor {
    async fn extract(&self, _text: &str) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Extractor that always fails, forcing the heuristic fallback.
pub struct OfflineExtractor;

#[async_trait]
impl ConceptExtractor for OfflineExtractor {
    async fn extract(&self, _text: &str) -> Result<Vec<String>> {
        Err(MemoryError::ExtractionFailed("upstream 503".into()))
    }
}
