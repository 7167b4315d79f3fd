//! Vector-store trait definition.
//!
//! The evaluation core talks to retrieval backends through exactly two
//! capabilities - `upsert` and `query` - so alternative implementations
//! (a network service, an in-memory fake) substitute freely. Both
//! operations are treated as network-fallible; the core never retries.

use crate::core::Chunk;
use crate::error::Result;

/// A chunk as the store sees it: identifier plus text.
///
/// Offsets and document linkage stay with the core; the store only needs
/// enough to embed and return ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Stable chunk identifier.
    pub id: String,
    /// Chunk text to embed.
    pub text: String,
}

impl ChunkRecord {
    /// Creates a new chunk record.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl From<&Chunk> for ChunkRecord {
    fn from(chunk: &Chunk) -> Self {
        Self {
            id: chunk.id.clone(),
            text: chunk.text.clone(),
        }
    }
}

/// Trait for vector-store backends.
///
/// Implementations must be `Send + Sync`: queries run concurrently across
/// worker threads during scoring. Upserts must be idempotent by chunk id so
/// re-indexing identical boundaries leaves one record per chunk.
pub trait VectorStore: Send + Sync {
    /// Inserts or replaces chunk records in a collection.
    ///
    /// Called once per document with that document's chunks as one logical
    /// batch; partial-document state must never be visible to `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the batch.
    fn upsert(&self, collection: &str, records: &[ChunkRecord]) -> Result<()>;

    /// Returns the ids of the `top_k` chunks nearest to the query text,
    /// most relevant first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot serve the query.
    fn query(&self, collection: &str, query_text: &str, top_k: usize) -> Result<Vec<String>>;
}
