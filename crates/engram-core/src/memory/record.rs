//! Durable memory records.
//!
//! A [`MemoryRecord`] lives in the embedding store and is mirrored as a graph
//! node. A [`ConversationChunk`] lives in the embedding store only and is
//! written once per exchange, never mutated.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// METADATA
// ============================================================================

/// Optional metadata attached to a memory.
///
/// Well-known keys are typed fields; anything else rides along opaquely in
/// `extra` and is returned unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetadata {
    /// Where the memory came from (conversation, email, manual entry, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Tags for categorization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Unknown keys, passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl MemoryMetadata {
    /// Metadata with only a source set
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }

    /// True when no field carries data
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.tags.is_empty() && self.extra.is_empty()
    }
}

// ============================================================================
// MEMORY RECORD
// ============================================================================

/// A long-term memory owned by a single owner.
///
/// The id is assigned by the embedding store at write time and never changes;
/// the same id keys the mirrored graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owner the memory is scoped to
    pub owner_id: String,
    /// The remembered content
    pub content: String,
    /// Free-form type tag (preference, fact, conversation_extract, ...)
    pub memory_type: String,
    /// Importance from 1 (trivia) to 10 (defining)
    pub importance: u8,
    /// When the memory was stored
    pub created_at: DateTime<Utc>,
    /// Optional metadata
    #[serde(default, skip_serializing_if = "MemoryMetadata::is_empty")]
    pub metadata: MemoryMetadata,
}

impl MemoryRecord {
    /// Create a record with a fresh id, stamped now.
    pub fn new(
        owner_id: impl Into<String>,
        content: impl Into<String>,
        memory_type: impl Into<String>,
        importance: u8,
        metadata: MemoryMetadata,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            content: content.into(),
            memory_type: memory_type.into(),
            importance: importance.clamp(1, 10),
            created_at: Utc::now(),
            metadata,
        }
    }
}

// ============================================================================
// CONVERSATION CHUNK
// ============================================================================

/// One stored exchange of a conversation.
///
/// Chunk indices are monotonic per conversation so history can be replayed in
/// order even though retrieval only ever ranks by similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationChunk {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owner the chunk is scoped to
    pub owner_id: String,
    /// Conversation this chunk belongs to
    pub conversation_id: String,
    /// The exchange text
    pub content: String,
    /// Monotonic position within the conversation
    pub chunk_index: u64,
    /// When the chunk was stored
    pub created_at: DateTime<Utc>,
}

impl ConversationChunk {
    /// Create a chunk with a fresh id, stamped now.
    pub fn new(
        owner_id: impl Into<String>,
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        chunk_index: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            conversation_id: conversation_id.into(),
            content: content.into(),
            chunk_index,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// STORE RESULT
// ============================================================================

/// Outcome of storing a memory through the full ingest path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMemory {
    /// Id assigned by the embedding store
    pub memory_id: String,
    /// How many concepts were linked into the graph
    pub concepts_extracted: usize,
}

// ============================================================================
// TESTS
// ============================================================================
