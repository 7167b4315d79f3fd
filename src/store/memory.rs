//! In-memory vector store.
//!
//! Backs tests and offline runs: no files, no network, fully
//! deterministic. Ranks by cosine similarity with a stable id tie-break so
//! equal scores never reorder between runs.

use crate::embedding::{Embedder, cosine_similarity};
use crate::error::{Result, StoreError};
use crate::store::traits::{ChunkRecord, VectorStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-memory vector store keyed by collection.
///
/// # Examples
///
/// ```
/// use chunkbench::embedding::create_embedder;
/// use chunkbench::store::{ChunkRecord, MemoryStore, VectorStore};
///
/// let store = MemoryStore::new(create_embedder());
/// store
///     .upsert("run1", &[ChunkRecord::new("c1", "the quick brown fox")])
///     .unwrap();
/// let ids = store.query("run1", "quick fox", 5).unwrap();
/// assert_eq!(ids, vec!["c1".to_string()]);
/// ```
pub struct MemoryStore {
    embedder: Box<dyn Embedder>,
    collections: Mutex<HashMap<String, BTreeMap<String, Vec<f32>>>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store using the given embedder.
    #[must_use]
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// Number of chunks stored in a collection.
    pub fn len(&self, collection: &str) -> Result<usize> {
        let collections = self.lock()?;
        Ok(collections.get(collection).map_or(0, BTreeMap::len))
    }

    /// Checks whether a collection is empty or absent.
    pub fn is_empty(&self, collection: &str) -> Result<bool> {
        Ok(self.len(collection)? == 0)
    }

    fn lock(
        &self,
    ) -> std::result::Result<
        std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, Vec<f32>>>>,
        StoreError,
    > {
        self.collections
            .lock()
            .map_err(|_| StoreError::Database("store mutex poisoned".to_string()))
    }
}

impl VectorStore for MemoryStore {
    fn upsert(&self, collection: &str, records: &[ChunkRecord]) -> Result<()> {
        // Embed outside the lock; the batch becomes visible atomically.
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;

        let mut collections = self.lock()?;
        let entry = collections.entry(collection.to_string()).or_default();
        for (record, embedding) in records.iter().zip(embeddings) {
            entry.insert(record.id.clone(), embedding);
        }
        Ok(())
    }

    fn query(&self, collection: &str, query_text: &str, top_k: usize) -> Result<Vec<String>> {
        let query_embedding = self.embedder.embed(query_text)?;

        let collections = self.lock()?;
        let Some(entry) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<(&String, f32)> = entry
            .iter()
            .map(|(id, embedding)| (id, cosine_similarity(&query_embedding, embedding)))
            .collect();

        // Sort by score descending; BTreeMap iteration already orders ids,
        // so equal scores keep a stable id order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored.into_iter().map(|(id, _)| id.clone()).collect())
    }
}
