//! Memory module - core types and data structures
//!
//! The durable records (memories, conversation chunks) and the ephemeral
//! retrieval types (candidates, source counts, assembled context) that flow
//! between the stores, the orchestrator, and the assembler.

mod candidate;
mod record;

pub use candidate::{
    CandidateSource, RetrievalCandidate, RetrievedContext, SourceCounts,
};
pub use record::{ConversationChunk, MemoryMetadata, MemoryRecord, StoredMemory};
