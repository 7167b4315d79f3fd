//! Vector-store backends for chunk retrieval.
//!
//! The evaluation core talks to retrieval through the narrow
//! [`VectorStore`] capability set (`upsert`, `query`). Two backends ship:
//! an in-memory store for tests and offline runs, and a `SQLite`-backed
//! store that persists collections between runs.

pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ChunkRecord, VectorStore};

/// Default database path for the `SQLite` backend.
pub const DEFAULT_DB_PATH: &str = ".chunkbench/chunks.db";
