//! # Engram Core
//!
//! Hybrid memory retrieval engine for conversational agents:
//!
//! - **Vector Similarity**: owner-scoped nearest-neighbor search over
//!   memories and conversation history
//! - **Relationship Graph**: typed, weighted edges with bounded traversal
//!   and concept frequency counters
//! - **Hybrid Retrieval**: concurrent fan-out across both stores, merged
//!   with source-aware priority and content deduplication
//! - **Context Assembly**: greedy packing under a hard token budget with
//!   provenance labels
//! - **Graceful Degradation**: any store can fail or time out; retrieval
//!   still answers, with accurate per-source counts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use engram_core::prelude::*;
//!
//! let engine = MemoryEngine::new(
//!     Arc::new(InMemoryVectorStore::default()),
//!     Arc::new(InMemoryGraphStore::new()),
//!     Arc::new(my_extractor),
//!     EngineConfig::default(),
//! );
//!
//! // Ingest a memory
//! let stored = engine
//!     .store_memory_with_context("owner-1", "I love Italian food", "preference", 7, Default::default())
//!     .await?;
//!
//! // Retrieve a token-bounded context block for a query
//! let retrieved = engine
//!     .retrieve_context("owner-1", "What food do I like?", None, 5, true)
//!     .await?;
//! println!("{}", retrieved.context);
//! ```
//!
//! Production deployments implement [`EmbeddingStore`], [`GraphStore`], and
//! [`ConceptExtractor`] against their own backends; the in-process
//! implementations exist so the engine is exercisable without external
//! services.

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod concepts;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod memory;
pub mod relate;
pub mod retrieval;
pub mod store;
pub mod tokens;

mod engine;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Engine
pub use engine::MemoryEngine;

// Configuration
pub use config::{
    EngineConfig, CONVERSATION_CONTEXT_LIMIT, DEFAULT_MAX_CONTEXT_TOKENS, GRAPH_EXPANSION_LIMIT,
    GRAPH_SEED_COUNT, MAX_GRAPH_DEPTH, MIN_RETRIEVAL_IMPORTANCE, RELATED_SEARCH_LIMIT,
    SIMILARITY_EDGE_THRESHOLD,
};

// Errors
pub use error::{MemoryError, Result};

// Data model
pub use memory::{
    CandidateSource, ConversationChunk, MemoryMetadata, MemoryRecord, RetrievalCandidate,
    RetrievedContext, SourceCounts, StoredMemory,
};

// Store seams and in-process backends
pub use graph::{
    GraphStore, InMemoryGraphStore, KnowledgeSummary, RelatedMemory, EDGE_SIMILAR,
};
pub use store::{
    cosine_similarity, Embedder, EmbeddingStore, HashEmbedder, InMemoryVectorStore, ScoredItem,
    EMBEDDING_DIMENSIONS,
};

// Concept extraction
pub use concepts::{
    extract_with_fallback, heuristic_concepts, ConceptExtraction, ConceptExtractor, MAX_CONCEPTS,
};

// Context assembly
pub use context::{build_context, ContextBudget};

// Retrieval internals useful to backend authors
pub use relate::RelationshipBuilder;
pub use retrieval::{merge_candidates, Orchestrator};

// Token counting
pub use tokens::{HeuristicTokenCounter, TokenCounter};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CandidateSource, ConceptExtractor, EmbeddingStore, EngineConfig, GraphStore,
        InMemoryGraphStore, InMemoryVectorStore, MemoryEngine, MemoryError, MemoryMetadata,
        Result, RetrievedContext, SourceCounts, TokenCounter,
    };
}
