//! Context assembly.
//!
//! Walks an already-ranked candidate list and greedily packs items into a
//! single text block under a hard token budget. Items are never split: if
//! the next candidate would push the assembled block past the budget, the
//! walk stops. Budget exhaustion is the normal stopping condition, not an
//! error, and an empty result is a valid result.
//!
//! The budget is checked against the token count of the *whole assembled
//! string*, separators included, so the guarantee holds for any
//! [`TokenCounter`] regardless of how it rounds.

use crate::memory::{CandidateSource, RetrievalCandidate};
use crate::tokens::TokenCounter;

/// Blank line between packed items
const ITEM_SEPARATOR: &str = "\n\n";

// ============================================================================
// CONTEXT BUDGET
// ============================================================================

/// Running token budget for one assembly pass
#[derive(Debug, Clone, Copy)]
pub struct ContextBudget {
    max_tokens: usize,
    consumed: usize,
}

impl ContextBudget {
    /// Fresh budget of `max_tokens`.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            consumed: 0,
        }
    }

    /// Tokens consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Whether a total of `tokens` still fits; records it when it does.
    fn try_consume_total(&mut self, tokens: usize) -> bool {
        if tokens > self.max_tokens {
            return false;
        }
        self.consumed = tokens;
        true
    }
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Pack candidates into a token-bounded context block.
///
/// The output's token count never exceeds `max_tokens`; the empty string is
/// returned when the list is empty or the first candidate alone is over
/// budget.
pub fn build_context(
    candidates: &[RetrievalCandidate],
    max_tokens: usize,
    counter: &dyn TokenCounter,
) -> String {
    let mut assembled = String::new();
    let mut budget = ContextBudget::new(max_tokens);
    let mut included = 0usize;

    for candidate in candidates {
        let formatted = format_candidate(candidate);
        let tentative = if assembled.is_empty() {
            formatted
        } else {
            format!("{assembled}{ITEM_SEPARATOR}{formatted}")
        };

        if !budget.try_consume_total(counter.count(&tentative)) {
            break;
        }
        assembled = tentative;
        included += 1;
    }

    tracing::debug!(
        included,
        total = candidates.len(),
        tokens = budget.consumed(),
        max_tokens,
        "context assembled"
    );
    assembled
}

/// Label one candidate by provenance.
fn format_candidate(candidate: &RetrievalCandidate) -> String {
    match candidate.source {
        CandidateSource::Conversation => {
            format!("[Prior conversation]: {}", candidate.content)
        }
        source => format!(
            "[Memory - {}, importance: {}]: {}",
            source,
            candidate.importance.unwrap_or(0),
            candidate.content
        ),
    }
}

// ============================================================================
// TESTS
// ============================================================================
