//! `SQLite` vector-store implementation.
//!
//! Persists chunk records and their embeddings so collections survive
//! between runs; a re-run over identical boundaries reuses identical chunk
//! ids and replaces rows in place. Ranking is a full-scan cosine pass over
//! the collection.

// SQLite stores all integers as i64. These casts are intentional and safe
// because we only store non-negative values that fit in usize.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::embedding::{Embedder, cosine_similarity};
use crate::error::{Result, StoreError};
use crate::store::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::store::traits::{ChunkRecord, VectorStore};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// SQLite-backed vector store.
///
/// # Examples
///
/// ```no_run
/// use chunkbench::embedding::create_embedder;
/// use chunkbench::store::SqliteStore;
///
/// let store = SqliteStore::open("chunks.db", create_embedder()).unwrap();
/// ```
pub struct SqliteStore {
    /// `SQLite` connection, serialized behind a mutex so queries can run
    /// from worker threads.
    conn: Mutex<Connection>,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
    /// Embedder used for both chunk and query text.
    embedder: Box<dyn Embedder>,
}

impl SqliteStore {
    /// Opens or creates a `SQLite` database at the given path and
    /// initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(path: P, embedder: Box<dyn Embedder>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Database(e.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(StoreError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StoreError::from)?;
        // WAL mode for concurrent readers; returns a row, so query it
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StoreError::from)?;

        let store = Self {
            conn: Mutex::new(conn),
            path: Some(path),
            embedder,
        };
        store.init()?;
        Ok(store)
    }

    /// Creates an in-memory `SQLite` store.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory(embedder: Box<dyn Embedder>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let store = Self {
            conn: Mutex::new(conn),
            path: None,
            embedder,
        };
        store.init()?;
        Ok(store)
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Initializes the schema. Idempotent.
    fn init(&self) -> Result<()> {
        let conn = self.lock()?;
        let table_count: u32 = conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StoreError::from)?;

        if table_count > 0 {
            let version: Option<String> = conn
                .query_row(GET_VERSION_SQL, [], |row| row.get(0))
                .optional()
                .map_err(StoreError::from)?;
            if version.and_then(|v| v.parse::<u32>().ok()) == Some(CURRENT_SCHEMA_VERSION) {
                return Ok(());
            }
        }

        conn.execute_batch(SCHEMA_SQL).map_err(StoreError::from)?;
        conn.execute(SET_VERSION_SQL, params![CURRENT_SCHEMA_VERSION.to_string()])
            .map_err(StoreError::from)?;
        Ok(())
    }

    /// Number of chunks stored in a collection.
    pub fn len(&self, collection: &str) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )
            .map_err(StoreError::from)?;
        Ok(count as usize)
    }

    /// Checks whether a collection is empty or absent.
    pub fn is_empty(&self, collection: &str) -> Result<bool> {
        Ok(self.len(collection)? == 0)
    }

    /// Deletes all chunks in a collection.
    pub fn clear(&self, collection: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM chunks WHERE collection = ?1",
            params![collection],
        )
        .map_err(StoreError::from)?;
        Ok(())
    }

    fn lock(&self) -> std::result::Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection mutex poisoned".to_string()))
    }

    /// Returns current Unix timestamp.
    #[allow(clippy::cast_possible_wrap)]
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

impl VectorStore for SqliteStore {
    fn upsert(&self, collection: &str, records: &[ChunkRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        // Embed outside the connection lock
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        let dimensions = self.embedder.dimensions() as i64;
        let now = Self::now();

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO chunks
                     (collection, chunk_id, content, embedding, dimensions, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(StoreError::from)?;
            for (record, embedding) in records.iter().zip(&embeddings) {
                stmt.execute(params![
                    collection,
                    record.id,
                    record.text,
                    encode_embedding(embedding),
                    dimensions,
                    now,
                ])
                .map_err(StoreError::from)?;
            }
        }
        tx.commit().map_err(StoreError::from)?;

        debug!(collection, count = records.len(), "upserted chunk batch");
        Ok(())
    }

    fn query(&self, collection: &str, query_text: &str, top_k: usize) -> Result<Vec<String>> {
        let query_embedding = self.embedder.embed(query_text)?;
        let expected = self.embedder.dimensions();

        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT chunk_id, embedding FROM chunks WHERE collection = ?1 ORDER BY chunk_id")
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })
            .map_err(StoreError::from)?;

        let mut scored: Vec<(String, f32)> = Vec::new();
        for row in rows {
            let (chunk_id, blob) = row.map_err(StoreError::from)?;
            let embedding = decode_embedding(&blob)?;
            if embedding.len() != expected {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                }
                .into());
            }
            scored.push((chunk_id, cosine_similarity(&query_embedding, &embedding)));
        }

        // Rows arrive in id order, so equal scores keep a stable order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored.into_iter().map(|(id, _)| id).collect())
    }
}

/// Serializes an embedding as little-endian f32 bytes.
fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Deserializes little-endian f32 bytes into an embedding.
fn decode_embedding(bytes: &[u8]) -> std::result::Result<Vec<f32>, StoreError> {
    if bytes.len() % 4 != 0 {
        return Err(StoreError::Serialization(format!(
            "embedding blob length {} is not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
