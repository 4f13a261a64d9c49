//! Engine configuration.
//!
//! All tuning constants live here, immutable for the lifetime of the engine.
//! Per-request state is created and dropped inside each call; the config is
//! the only thing the engine shares across requests besides the injected
//! store handles.

use std::time::Duration;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Similarity above which the relationship builder materializes a "similar"
/// edge. Strictly greater-than: a score of exactly 0.7 creates no edge.
pub const SIMILARITY_EDGE_THRESHOLD: f32 = 0.7;

/// Maximum traversal depth for graph expansion
pub const MAX_GRAPH_DEPTH: usize = 2;

/// Number of top vector hits used as graph-expansion seeds
pub const GRAPH_SEED_COUNT: usize = 2;

/// Related memories fetched per graph-expansion seed
pub const GRAPH_EXPANSION_LIMIT: usize = 3;

/// Conversation chunks fetched per retrieval
pub const CONVERSATION_CONTEXT_LIMIT: usize = 3;

/// Minimum importance for memories surfaced by retrieval
pub const MIN_RETRIEVAL_IMPORTANCE: u8 = 3;

/// Neighbors considered when linking a freshly stored memory
pub const RELATED_SEARCH_LIMIT: usize = 3;

/// Default token budget for an assembled context block
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 3000;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the memory engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Similarity threshold for automatic edge creation (strict lower bound)
    pub similarity_edge_threshold: f32,
    /// Maximum graph traversal depth during retrieval
    pub max_graph_depth: usize,
    /// Token budget for the assembled context string
    pub max_context_tokens: usize,
    /// How long a single sub-fetch (vector search, graph expansion) may run
    /// before it is treated as failed and contributes an empty slot
    pub fetch_timeout: Duration,
    /// How long the primary concept extractor may run before the local
    /// heuristic takes over
    pub extraction_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_edge_threshold: SIMILARITY_EDGE_THRESHOLD,
            max_graph_depth: MAX_GRAPH_DEPTH,
            max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
            fetch_timeout: Duration::from_secs(2),
            extraction_timeout: Duration::from_secs(5),
        }
    }
}

impl EngineConfig {
    /// Override the context token budget
    pub fn with_max_context_tokens(mut self, max_tokens: usize) -> Self {
        self.max_context_tokens = max_tokens;
        self
    }

    /// Override the per-sub-fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
