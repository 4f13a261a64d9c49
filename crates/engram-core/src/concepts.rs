//! Concept extraction.
//!
//! The primary extractor is an external collaborator (usually an LLM call)
//! and is allowed to fail. Ingestion never blocks on it: after a timeout or
//! an error, a pure local heuristic takes over. Which path produced the
//! labels is reported explicitly so callers and logs can tell a degraded
//! extraction from a healthy one.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Upper bound on concepts per memory, whichever path produced them
pub const MAX_CONCEPTS: usize = 5;

/// Minimum token length the fallback heuristic considers meaningful
const HEURISTIC_MIN_TOKEN_LEN: usize = 4;

// ============================================================================
// CONCEPT EXTRACTOR
// ============================================================================

/// External topic-label extractor.
///
/// Returns at most [`MAX_CONCEPTS`] lowercase labels. Failure is expected and
/// handled by the caller; implementations should not retry internally.
#[async_trait]
pub trait ConceptExtractor: Send + Sync {
    /// Extract topic labels from `text`
    async fn extract(&self, text: &str) -> Result<Vec<String>>;
}

// ============================================================================
// EXTRACTION OUTCOME
// ============================================================================

/// Which path produced a set of concepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptExtraction {
    /// The primary extractor answered in time
    Extracted(Vec<String>),
    /// The extractor failed or timed out; the local heuristic answered
    Heuristic(Vec<String>),
}

impl ConceptExtraction {
    /// The labels, regardless of path
    pub fn concepts(&self) -> &[String] {
        match self {
            ConceptExtraction::Extracted(c) | ConceptExtraction::Heuristic(c) => c,
        }
    }

    /// True when the heuristic had to stand in
    pub fn is_degraded(&self) -> bool {
        matches!(self, ConceptExtraction::Heuristic(_))
    }
}

// ============================================================================
// EXTRACTION WITH FALLBACK
// ============================================================================

/// Run the primary extractor under a timeout; fall back to
/// [`heuristic_concepts`] on error or timeout.
///
/// Labels from either path are lowercased, deduplicated, and capped at
/// [`MAX_CONCEPTS`].
pub async fn extract_with_fallback(
    extractor: &dyn ConceptExtractor,
    text: &str,
    timeout: Duration,
) -> ConceptExtraction {
    match tokio::time::timeout(timeout, extractor.extract(text)).await {
        Ok(Ok(labels)) => ConceptExtraction::Extracted(normalize(labels)),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "concept extractor failed, using heuristic");
            ConceptExtraction::Heuristic(heuristic_concepts(text))
        }
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "concept extractor timed out, using heuristic");
            ConceptExtraction::Heuristic(heuristic_concepts(text))
        }
    }
}

/// Pure fallback: alphabetic tokens of at least four characters, lowercased,
/// ranked by frequency (ties alphabetical), capped at [`MAX_CONCEPTS`].
pub fn heuristic_concepts(text: &str) -> Vec<String> {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    for token in text.split(|c: char| !c.is_alphabetic()) {
        if token.len() >= HEURISTIC_MIN_TOKEN_LEN {
            *frequency.entry(token.to_lowercase()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(MAX_CONCEPTS);
    ranked.into_iter().map(|(token, _)| token).collect()
}

fn normalize(labels: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(MAX_CONCEPTS);
    for label in labels {
        let label = label.trim().to_lowercase();
        if !label.is_empty() && !seen.contains(&label) {
            seen.push(label);
        }
        if seen.len() == MAX_CONCEPTS {
            break;
        }
    }
    seen
}

// ============================================================================
// TESTS
// ============================================================================
