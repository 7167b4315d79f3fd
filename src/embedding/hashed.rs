//! Hash-based lexical embedder.
//!
//! Generates deterministic pseudo-embeddings from word and character-trigram
//! hashing. Similarity reflects lexical overlap, not semantics, which is
//! exactly what a reproducible evaluation harness needs: identical inputs
//! rank identically on every machine, with no model downloads.

use crate::Result;
use crate::embedding::Embedder;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic hash-based embedder.
///
/// Combines:
/// - Word-level hashing (primary signal, captures vocabulary)
/// - Character trigram hashing (secondary signal, tolerates small edits)
/// - L2 normalization so cosine similarity reduces to a dot product
///
/// # Examples
///
/// ```
/// use chunkbench::embedding::{Embedder, HashedEmbedder, DEFAULT_DIMENSIONS};
///
/// let embedder = HashedEmbedder::new(DEFAULT_DIMENSIONS);
/// let a = embedder.embed("hello world").unwrap();
/// let b = embedder.embed("hello world").unwrap();
/// assert_eq!(a, b); // Deterministic
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    /// Creates a new hashed embedder with the specified dimensions.
    #[must_use]
    pub const fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Hashes a string to a u64 value.
    fn hash_string(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Lowercases and strips non-alphanumeric characters.
    fn normalize(text: &str) -> String {
        text.chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() {
                    c.to_ascii_lowercase()
                } else {
                    ' '
                }
            })
            .collect()
    }

    /// Generates the pseudo-embedding for a text.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn generate(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let normalized = Self::normalize(text);

        // Word-level hashing (primary signal)
        for word in normalized.split_whitespace() {
            let hash = Self::hash_string(word);
            let idx = (hash as usize) % self.dimensions;
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            let magnitude = 1.0 + ((hash >> 16) & 0xFF) as f32 / 255.0;
            embedding[idx] += sign * magnitude;
        }

        // Character trigram hashing (secondary signal)
        let chars: Vec<char> = normalized.chars().collect();
        for window in chars.windows(3) {
            let trigram: String = window.iter().collect();
            let hash = Self::hash_string(&trigram);
            let idx = (hash as usize) % self.dimensions;
            let sign = if (hash >> 32) & 1 == 0 { 0.5 } else { -0.5 };
            embedding[idx] += sign;
        }

        // Unit length so cosine similarity is a dot product
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for val in &mut embedding {
                *val /= magnitude;
            }
        }

        embedding
    }
}

impl Embedder for HashedEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate(text))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        use rayon::prelude::*;

        Ok(texts.par_iter().map(|text| self.generate(text)).collect())
    }
}
