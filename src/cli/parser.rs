//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::chunking::{DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::matching::{DEFAULT_LENGTH_TOLERANCE, DEFAULT_MIN_SIMILARITY};
use crate::runner::DEFAULT_TOP_K;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chunkbench: retrieval-aware evaluation of text-chunking strategies.
///
/// Splits corpus documents with a chunking strategy, indexes the chunks in
/// a vector store, retrieves top-k chunks per query and scores how well
/// retrieved boundaries cover ground-truth excerpts.
#[derive(Parser, Debug)]
#[command(name = "chunkbench")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a chunking strategy against a corpus and query set.
    Evaluate {
        /// Path to the corpus: a directory of text files or a single file.
        #[arg(short, long)]
        corpus: PathBuf,

        /// Path to the JSON query file.
        #[arg(short, long)]
        queries: PathBuf,

        /// Chunking strategy to evaluate.
        #[arg(short, long, default_value = "recursive")]
        strategy: String,

        /// Target chunk size in bytes.
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Overlap between consecutive chunks (fixed strategy).
        #[arg(long, default_value_t = DEFAULT_OVERLAP)]
        overlap: usize,

        /// Number of chunks to retrieve per query.
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Minimum similarity for approximate excerpt matching.
        #[arg(long, default_value_t = DEFAULT_MIN_SIMILARITY)]
        min_similarity: f64,

        /// Window-length tolerance for approximate excerpt matching.
        #[arg(long, default_value_t = DEFAULT_LENGTH_TOLERANCE)]
        length_tolerance: f64,

        /// Persist chunks in a SQLite database at this path instead of the
        /// in-memory store.
        #[arg(long, env = "CHUNKBENCH_DB_PATH")]
        db_path: Option<PathBuf>,

        /// Store collection name. Defaults to
        /// "<strategy>_<chunk_size>_<overlap>".
        #[arg(long)]
        collection: Option<String>,

        /// Include per-query metrics in the output.
        #[arg(long)]
        detail: bool,
    },

    /// List available chunking strategies.
    Strategies,

    /// Split a file with a strategy and print the chunk boundaries.
    Chunk {
        /// Path to the text file to split.
        file: PathBuf,

        /// Chunking strategy to use.
        #[arg(short, long, default_value = "recursive")]
        strategy: String,

        /// Target chunk size in bytes.
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Overlap between consecutive chunks (fixed strategy).
        #[arg(long, default_value_t = DEFAULT_OVERLAP)]
        overlap: usize,
    },

    /// Locate an excerpt inside a document and print the resolved span.
    Resolve {
        /// Path to the document file.
        file: PathBuf,

        /// Excerpt text to locate.
        excerpt: String,

        /// Minimum similarity for approximate matching.
        #[arg(long, default_value_t = DEFAULT_MIN_SIMILARITY)]
        min_similarity: f64,

        /// Window-length tolerance for approximate matching.
        #[arg(long, default_value_t = DEFAULT_LENGTH_TOLERANCE)]
        length_tolerance: f64,
    },
}
