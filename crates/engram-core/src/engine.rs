//! Memory engine.
//!
//! The service façade over the injected store clients. Constructed once per
//! process and shared by handle; every call is otherwise stateless, so there
//! is no cross-request mutable state to guard.
//!
//! Ingest path: embedding store write, graph node mirror, concept linking,
//! similarity edges. The embedding write must succeed (no id, no memory);
//! everything after it is awaited best-effort enrichment — failures are
//! logged and the operation still succeeds.
//!
//! Query path: orchestrated fan-out, merge, then token-bounded assembly.

use std::sync::Arc;

use crate::concepts::{extract_with_fallback, ConceptExtractor};
use crate::config::EngineConfig;
use crate::context::build_context;
use crate::error::{MemoryError, Result};
use crate::graph::{GraphStore, KnowledgeSummary};
use crate::memory::{MemoryMetadata, RetrievedContext, StoredMemory};
use crate::relate::RelationshipBuilder;
use crate::retrieval::Orchestrator;
use crate::store::EmbeddingStore;
use crate::tokens::{HeuristicTokenCounter, TokenCounter};

// ============================================================================
// MEMORY ENGINE
// ============================================================================

/// Hybrid retrieval engine over an embedding store and a relationship graph.
pub struct MemoryEngine {
    embedding_store: Arc<dyn EmbeddingStore>,
    graph_store: Arc<dyn GraphStore>,
    extractor: Arc<dyn ConceptExtractor>,
    token_counter: Arc<dyn TokenCounter>,
    orchestrator: Orchestrator,
    relationship_builder: RelationshipBuilder,
    config: EngineConfig,
}

impl MemoryEngine {
    /// Engine over the given clients, with the default token estimator.
    pub fn new(
        embedding_store: Arc<dyn EmbeddingStore>,
        graph_store: Arc<dyn GraphStore>,
        extractor: Arc<dyn ConceptExtractor>,
        config: EngineConfig,
    ) -> Self {
        Self::with_token_counter(
            embedding_store,
            graph_store,
            extractor,
            Arc::new(HeuristicTokenCounter),
            config,
        )
    }

    /// Engine with an injected model-specific token counter.
    pub fn with_token_counter(
        embedding_store: Arc<dyn EmbeddingStore>,
        graph_store: Arc<dyn GraphStore>,
        extractor: Arc<dyn ConceptExtractor>,
        token_counter: Arc<dyn TokenCounter>,
        config: EngineConfig,
    ) -> Self {
        let orchestrator = Orchestrator::new(
            Arc::clone(&embedding_store),
            Arc::clone(&graph_store),
            config.fetch_timeout,
            config.max_graph_depth,
        );
        let relationship_builder = RelationshipBuilder::new(config.similarity_edge_threshold);

        Self {
            embedding_store,
            graph_store,
            extractor,
            token_counter,
            orchestrator,
            relationship_builder,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // INGEST PATH
    // ========================================================================

    /// Store a memory in both stores, link its concepts, and materialize
    /// similarity edges.
    ///
    /// Returns the assigned memory id and how many concepts were linked.
    /// Fails only when the input is invalid or the embedding store write
    /// itself fails; graph enrichment degrades to logging.
    pub async fn store_memory_with_context(
        &self,
        owner_id: &str,
        content: &str,
        memory_type: &str,
        importance: u8,
        metadata: MemoryMetadata,
    ) -> Result<StoredMemory> {
        if owner_id.trim().is_empty() {
            return Err(MemoryError::InvalidInput("owner id is empty".into()));
        }
        if content.trim().is_empty() {
            return Err(MemoryError::InvalidInput("content is empty".into()));
        }
        let importance = importance.clamp(1, 10);

        let memory_id = self
            .embedding_store
            .store_memory(owner_id, content, memory_type, importance, metadata)
            .await?;

        if let Err(e) = self
            .graph_store
            .create_memory_node(&memory_id, owner_id, content, memory_type, importance)
            .await
        {
            tracing::warn!(error = %e, memory_id = %memory_id, "graph node mirror failed");
        }

        let extraction = extract_with_fallback(
            self.extractor.as_ref(),
            content,
            self.config.extraction_timeout,
        )
        .await;
        let concepts = extraction.concepts();
        let mut concepts_extracted = 0;
        if !concepts.is_empty() {
            match self
                .graph_store
                .link_concepts_to_memory(&memory_id, concepts)
                .await
            {
                Ok(()) => concepts_extracted = concepts.len(),
                Err(e) => {
                    tracing::warn!(error = %e, memory_id = %memory_id, "concept linking failed");
                }
            }
        }

        self.relationship_builder
            .link_similar(
                self.embedding_store.as_ref(),
                self.graph_store.as_ref(),
                owner_id,
                &memory_id,
                content,
            )
            .await;

        tracing::info!(memory_id = %memory_id, concepts_extracted, "memory stored with context");
        Ok(StoredMemory {
            memory_id,
            concepts_extracted,
        })
    }

    /// Store one conversation exchange for later history retrieval.
    ///
    /// The graph conversation node is mirrored best-effort.
    pub async fn store_conversation_chunk(
        &self,
        owner_id: &str,
        conversation_id: &str,
        content: &str,
        chunk_index: u64,
    ) -> Result<String> {
        if owner_id.trim().is_empty() {
            return Err(MemoryError::InvalidInput("owner id is empty".into()));
        }
        if content.trim().is_empty() {
            return Err(MemoryError::InvalidInput("content is empty".into()));
        }

        let chunk_id = self
            .embedding_store
            .store_conversation_chunk(owner_id, conversation_id, content, chunk_index)
            .await?;

        if let Err(e) = self
            .graph_store
            .create_conversation_node(
                conversation_id,
                owner_id,
                &format!("Conversation {conversation_id}"),
            )
            .await
        {
            tracing::warn!(error = %e, conversation_id, "conversation node mirror failed");
        }

        Ok(chunk_id)
    }

    // ========================================================================
    // QUERY PATH
    // ========================================================================

    /// Retrieve relevant memories and pack them into a token-bounded context
    /// block.
    ///
    /// External-store failures degrade to empty slots with accurate zero
    /// counts; only an empty owner id or query is an error.
    pub async fn retrieve_context(
        &self,
        owner_id: &str,
        query: &str,
        exclude_conversation_id: Option<&str>,
        max_memories: usize,
        include_graph_context: bool,
    ) -> Result<RetrievedContext> {
        let (candidates, source_counts) = self
            .orchestrator
            .retrieve(
                owner_id,
                query,
                exclude_conversation_id,
                max_memories,
                include_graph_context,
            )
            .await?;

        let context = build_context(
            &candidates,
            self.config.max_context_tokens,
            self.token_counter.as_ref(),
        );

        Ok(RetrievedContext {
            context,
            source_counts,
            candidates,
        })
    }

    /// Aggregate view of one owner's graph. Degrades to an empty summary
    /// when the graph is unreachable.
    pub async fn knowledge_summary(&self, owner_id: &str) -> Result<KnowledgeSummary> {
        if owner_id.trim().is_empty() {
            return Err(MemoryError::InvalidInput("owner id is empty".into()));
        }
        match self.graph_store.knowledge_summary(owner_id).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracing::warn!(error = %e, owner_id, "knowledge summary unavailable");
                Ok(KnowledgeSummary::default())
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
