//! Chunking strategies for chunkbench.
//!
//! This module provides the narrow strategy interface the evaluation core
//! consumes, plus two deterministic implementations:
//!
//! - **Fixed**: fixed-size windows with configurable overlap
//! - **Recursive**: delimiter-aware splitting (paragraph > line > sentence > word)
//!
//! The evaluation core never splits text itself; it consumes whatever
//! boundary ranges a strategy produces.

pub mod fixed;
pub mod recursive;
pub mod traits;

pub use fixed::FixedSplitter;
pub use recursive::RecursiveSplitter;
pub use traits::ChunkingStrategy;

use crate::error::StrategyError;

/// Default chunk size in bytes (~100 tokens at 4 bytes/token), a common
/// retrieval-chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 400;

/// Default overlap between consecutive fixed windows.
pub const DEFAULT_OVERLAP: usize = 50;

/// Maximum allowed chunk size.
pub const MAX_CHUNK_SIZE: usize = 65_536;

/// Creates a strategy by name.
///
/// # Arguments
///
/// * `name` - Strategy name: "fixed" or "recursive".
/// * `chunk_size` - Target chunk size in bytes.
/// * `overlap` - Overlap between windows (fixed strategy only).
///
/// # Errors
///
/// Returns [`StrategyError::Unknown`] if the name is not recognized.
pub fn create_strategy(
    name: &str,
    chunk_size: usize,
    overlap: usize,
) -> crate::error::Result<Box<dyn ChunkingStrategy>> {
    match name.to_lowercase().as_str() {
        "fixed" => Ok(Box::new(FixedSplitter::with_size_and_overlap(
            chunk_size, overlap,
        ))),
        "recursive" => Ok(Box::new(RecursiveSplitter::with_size(chunk_size))),
        _ => Err(StrategyError::Unknown {
            name: name.to_string(),
        }
        .into()),
    }
}

/// Lists available strategy names.
#[must_use]
pub fn available_strategies() -> Vec<&'static str> {
    vec!["fixed", "recursive"]
}
