//! # chunkbench
//!
//! Retrieval-aware evaluation harness for text-chunking strategies.
//!
//! Given a corpus of documents and ground-truth reference excerpts,
//! chunkbench splits each document with a pluggable chunking strategy,
//! indexes the chunks in a vector store, retrieves the top-k chunks per
//! query and scores how well retrieved chunk boundaries cover the
//! reference excerpts.
//!
//! ## Features
//!
//! - **Span matching**: locates excerpts in documents even after
//!   re-wrapping or quote normalization, via approximate edit-distance search
//! - **Interval scoring**: precision/recall/IoU over unioned offset ranges,
//!   so overlapping chunks never double-count
//! - **Pluggable collaborators**: chunking strategies (`{split}`) and vector
//!   stores (`{upsert, query}`) behind narrow traits
//! - **Honest aggregates**: unresolved/failed/skipped counts always travel
//!   with the headline metrics

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped corpus reads (memmap2)
#![warn(unsafe_code)]

pub mod chunking;
pub mod cli;
pub mod core;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod indexing;
pub mod matching;
pub mod runner;
pub mod scoring;
pub mod store;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types (self:: disambiguates from the core crate)
pub use self::core::{Chunk, Document, QueryMetrics, ReferenceExcerpt, ResolvedSpan, RunSummary};

// Re-export matching types
pub use matching::{MatcherConfig, ResolutionCache, SpanMatcher};

// Re-export chunking types
pub use chunking::{
    ChunkingStrategy, FixedSplitter, RecursiveSplitter, available_strategies, create_strategy,
};

// Re-export scoring types
pub use scoring::{Aggregator, ScoreOutcome, score_query};

// Re-export store types
pub use store::{ChunkRecord, DEFAULT_DB_PATH, MemoryStore, SqliteStore, VectorStore};

// Re-export embedding types
pub use embedding::{DEFAULT_DIMENSIONS, Embedder, HashedEmbedder, cosine_similarity, create_embedder};

// Re-export runner types
pub use runner::{DEFAULT_TOP_K, Evaluator, RunReport};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
