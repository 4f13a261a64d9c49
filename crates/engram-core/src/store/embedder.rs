//! Text embedding.
//!
//! The in-process store embeds locally through the [`Embedder`] trait. The
//! default [`HashEmbedder`] is a hashed bag-of-words: each token lands in a
//! bucket of a fixed-width vector, which is then L2-normalized. Identical
//! texts embed identically (exact re-query scores 1.0) and token overlap
//! drives similarity, which is all the engine's ranking logic relies on.

// ============================================================================
// CONSTANTS
// ============================================================================

/// Buckets in a hashed bag-of-words vector
pub const EMBEDDING_DIMENSIONS: usize = 256;

// ============================================================================
// EMBEDDER
// ============================================================================

/// Text to fixed-width vector.
///
/// Must be deterministic: the same text always embeds to the same vector.
pub trait Embedder: Send + Sync {
    /// Embed one text
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Dimensionality of produced vectors
    fn dimensions(&self) -> usize;
}

/// Deterministic hashed bag-of-words embedder.
///
/// Tokenizes on non-alphanumeric boundaries, lowercases, hashes each token
/// into one of [`EMBEDDING_DIMENSIONS`] buckets (FNV-1a) and L2-normalizes
/// the bucket counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    fn bucket(token: &str) -> usize {
        // FNV-1a, 64-bit
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in token.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        (hash % EMBEDDING_DIMENSIONS as u64) as usize
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; EMBEDDING_DIMENSIONS];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector[Self::bucket(&token.to_lowercase())] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }
}

// ============================================================================
// SIMILARITY
// ============================================================================

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched dimensions or zero-norm inputs rather than
/// NaN, so callers can rank without special-casing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ============================================================================
// TESTS
// ============================================================================
