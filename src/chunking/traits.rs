//! Chunking-strategy trait definition.
//!
//! Defines the narrow `{split}` interface the evaluation core invokes;
//! concrete splitting algorithms live behind it and can be substituted
//! freely.

use crate::error::Result;
use std::ops::Range;

/// Trait for splitting document text into chunk boundary ranges.
///
/// Implementations must be `Send + Sync` to support concurrent indexing
/// across documents, and must be deterministic: evaluation runs are only
/// reproducible if identical text always yields identical boundaries. The
/// core documents this precondition but does not enforce it.
///
/// Returned ranges need not be contiguous or non-overlapping - strategies
/// may overlap by design - but each must be a valid substring range of the
/// input.
///
/// # Examples
///
/// ```
/// use chunkbench::chunking::{ChunkingStrategy, FixedSplitter};
///
/// let splitter = FixedSplitter::with_size(16);
/// let boundaries = splitter.split(&"word ".repeat(20)).unwrap();
/// assert!(!boundaries.is_empty());
/// ```
pub trait ChunkingStrategy: std::fmt::Debug + Send + Sync {
    /// Splits the input text into an ordered list of boundary ranges.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid splitter configuration.
    fn split(&self, text: &str) -> Result<Vec<Range<usize>>>;

    /// Returns the name of the strategy.
    fn name(&self) -> &'static str;

    /// Returns a description of the strategy.
    fn description(&self) -> &'static str {
        "No description available"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal strategy exercising the default trait implementations.
    #[derive(Debug)]
    struct MinimalStrategy;

    impl ChunkingStrategy for MinimalStrategy {
        fn split(&self, text: &str) -> Result<Vec<Range<usize>>> {
            if text.is_empty() {
                Ok(vec![])
            } else {
                Ok(vec![0..text.len()])
            }
        }

        fn name(&self) -> &'static str {
            "minimal"
        }
    }

    #[test]
    fn test_default_description() {
        let strategy = MinimalStrategy;
        assert_eq!(strategy.description(), "No description available");
    }

    #[test]
    fn test_minimal_split() {
        let strategy = MinimalStrategy;
        assert_eq!(strategy.split("abc").unwrap(), vec![0..3]);
        assert!(strategy.split("").unwrap().is_empty());
    }
}
