//! In-process relationship graph.
//!
//! Reference [`GraphStore`] backend over adjacency maps. Traversal treats
//! edges as undirected, mirroring the variable-length relationship match a
//! graph database would run, while edge records themselves stay directed.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

use super::{GraphStore, KnowledgeSummary, RelatedMemory};

/// Concepts reported by a knowledge summary
const TOP_CONCEPT_COUNT: usize = 10;

#[derive(Debug, Clone)]
struct MemoryNode {
    owner_id: String,
    content: String,
    memory_type: String,
    importance: u8,
}

#[derive(Debug, Clone)]
struct ConversationNode {
    owner_id: String,
    #[allow(dead_code)]
    title: String,
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    to: String,
    edge_type: String,
    strength: f32,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct GraphState {
    memories: HashMap<String, MemoryNode>,
    conversations: HashMap<String, ConversationNode>,
    /// Directed edge records, keyed by source node
    edges: HashMap<String, Vec<EdgeRecord>>,
    /// Undirected adjacency used for traversal
    neighbors: HashMap<String, HashSet<String>>,
    /// Concept name -> mention frequency
    concepts: HashMap<String, u64>,
    /// Memory id -> concepts it mentions
    mentions: HashMap<String, BTreeSet<String>>,
}

// ============================================================================
// IN-MEMORY GRAPH STORE
// ============================================================================

/// Relationship graph backed by process memory.
#[derive(Default)]
pub struct InMemoryGraphStore {
    state: RwLock<GraphState>,
}

impl InMemoryGraphStore {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strength of the directed edge `from -> to` with the given type.
    pub fn edge_strength(&self, from_id: &str, to_id: &str, edge_type: &str) -> Option<f32> {
        let state = self.state.read().expect("graph lock");
        state.edges.get(from_id).and_then(|edges| {
            edges
                .iter()
                .find(|e| e.to == to_id && e.edge_type == edge_type)
                .map(|e| e.strength)
        })
    }

    /// Current frequency counter for a concept.
    pub fn concept_frequency(&self, name: &str) -> Option<u64> {
        let state = self.state.read().expect("graph lock");
        state.concepts.get(&name.to_lowercase()).copied()
    }

    /// Total directed edges in the graph.
    pub fn edge_count(&self) -> usize {
        let state = self.state.read().expect("graph lock");
        state.edges.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn create_memory_node(
        &self,
        id: &str,
        owner_id: &str,
        content: &str,
        memory_type: &str,
        importance: u8,
    ) -> Result<()> {
        let mut state = self.state.write().expect("graph lock");
        state.memories.insert(
            id.to_string(),
            MemoryNode {
                owner_id: owner_id.to_string(),
                content: content.to_string(),
                memory_type: memory_type.to_string(),
                importance: importance.clamp(1, 10),
            },
        );
        tracing::debug!(memory_id = id, "memory node created");
        Ok(())
    }

    async fn create_conversation_node(
        &self,
        conversation_id: &str,
        owner_id: &str,
        title: &str,
    ) -> Result<()> {
        let mut state = self.state.write().expect("graph lock");
        state.conversations.insert(
            conversation_id.to_string(),
            ConversationNode {
                owner_id: owner_id.to_string(),
                title: title.to_string(),
            },
        );
        Ok(())
    }

    async fn create_edge(
        &self,
        from_id: &str,
        to_id: &str,
        edge_type: &str,
        strength: f32,
    ) -> Result<()> {
        let mut state = self.state.write().expect("graph lock");

        let edges = state.edges.entry(from_id.to_string()).or_default();
        match edges
            .iter_mut()
            .find(|e| e.to == to_id && e.edge_type == edge_type)
        {
            Some(existing) => {
                existing.strength = strength;
                existing.created_at = Utc::now();
            }
            None => edges.push(EdgeRecord {
                to: to_id.to_string(),
                edge_type: edge_type.to_string(),
                strength,
                created_at: Utc::now(),
            }),
        }

        state
            .neighbors
            .entry(from_id.to_string())
            .or_default()
            .insert(to_id.to_string());
        state
            .neighbors
            .entry(to_id.to_string())
            .or_default()
            .insert(from_id.to_string());

        tracing::debug!(from = from_id, to = to_id, edge_type, strength, "edge upserted");
        Ok(())
    }

    async fn upsert_concept(&self, name: &str) -> Result<()> {
        let mut state = self.state.write().expect("graph lock");
        *state.concepts.entry(name.to_lowercase()).or_insert(0) += 1;
        Ok(())
    }

    async fn link_concepts_to_memory(&self, memory_id: &str, concepts: &[String]) -> Result<()> {
        let mut state = self.state.write().expect("graph lock");
        for concept in concepts {
            let name = concept.to_lowercase();
            *state.concepts.entry(name.clone()).or_insert(0) += 1;
            state
                .mentions
                .entry(memory_id.to_string())
                .or_default()
                .insert(name);
        }
        Ok(())
    }

    async fn find_related(
        &self,
        seed_id: &str,
        max_depth: usize,
        limit: usize,
    ) -> Result<Vec<RelatedMemory>> {
        if max_depth == 0 || limit == 0 {
            return Ok(Vec::new());
        }

        let state = self.state.read().expect("graph lock");

        // Breadth-first walk; the first visit to a node is its shortest
        // distance, so revisits are skipped outright.
        let mut distances: HashMap<&str, usize> = HashMap::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        distances.insert(seed_id, 0);
        queue.push_back((seed_id, 0));

        while let Some((node, depth)) = queue.pop_front() {
            if depth == max_depth {
                continue;
            }
            if let Some(neighbors) = state.neighbors.get(node) {
                for neighbor in neighbors {
                    if !distances.contains_key(neighbor.as_str()) {
                        distances.insert(neighbor, depth + 1);
                        queue.push_back((neighbor, depth + 1));
                    }
                }
            }
        }

        let mut related: Vec<RelatedMemory> = distances
            .into_iter()
            .filter(|&(id, _)| id != seed_id)
            .filter_map(|(id, distance)| {
                state.memories.get(id).map(|node| RelatedMemory {
                    id: id.to_string(),
                    content: node.content.clone(),
                    importance: node.importance,
                    memory_type: node.memory_type.clone(),
                    distance,
                })
            })
            .collect();

        related.sort_by(|a, b| {
            b.importance
                .cmp(&a.importance)
                .then_with(|| a.distance.cmp(&b.distance))
                .then_with(|| a.id.cmp(&b.id))
        });
        related.truncate(limit);
        Ok(related)
    }

    async fn knowledge_summary(&self, owner_id: &str) -> Result<KnowledgeSummary> {
        let state = self.state.read().expect("graph lock");

        let owned: Vec<&str> = state
            .memories
            .iter()
            .filter(|(_, node)| node.owner_id == owner_id)
            .map(|(id, _)| id.as_str())
            .collect();

        let mut concept_names: BTreeSet<&str> = BTreeSet::new();
        for memory_id in &owned {
            if let Some(mentioned) = state.mentions.get(*memory_id) {
                concept_names.extend(mentioned.iter().map(String::as_str));
            }
        }

        let mut top_concepts: Vec<(String, u64)> = concept_names
            .iter()
            .map(|name| {
                (
                    (*name).to_string(),
                    state.concepts.get(*name).copied().unwrap_or(0),
                )
            })
            .collect();
        top_concepts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_concepts.truncate(TOP_CONCEPT_COUNT);

        Ok(KnowledgeSummary {
            memory_count: owned.len(),
            concept_count: concept_names.len(),
            conversation_count: state
                .conversations
                .values()
                .filter(|c| c.owner_id == owner_id)
                .count(),
            top_concepts,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
