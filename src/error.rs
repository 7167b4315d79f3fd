//! Error types for chunkbench operations.
//!
//! This module provides a comprehensive error hierarchy using `thiserror` for
//! all evaluation operations including span matching, indexing, storage, and
//! dataset loading.

use thiserror::Error;

/// Result type alias for chunkbench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for evaluation operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Span-matching errors (excerpt resolution).
    #[error("matching error: {0}")]
    Match(#[from] MatchError),

    /// Chunking-strategy errors (splitting configuration).
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),

    /// Chunk-indexing errors (boundary validation).
    #[error("indexing error: {0}")]
    Index(#[from] IndexError),

    /// Vector-store errors (persistence backend).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Retrieval errors (query-time failures).
    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Dataset errors (corpus and query loading).
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Span-matching errors for excerpt resolution.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Excerpt text is empty; resolution is undefined.
    #[error("excerpt text is empty")]
    EmptyExcerpt,

    /// Similarity threshold outside the `[0, 1]` range.
    #[error("similarity threshold {value} must be within [0, 1]")]
    InvalidThreshold {
        /// The rejected threshold value.
        value: f64,
    },

    /// Length tolerance outside the `[0, 1]` range.
    #[error("length tolerance {value} must be within [0, 1]")]
    InvalidTolerance {
        /// The rejected tolerance value.
        value: f64,
    },
}

/// Chunking-strategy errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// Invalid splitter configuration.
    #[error("invalid strategy configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },

    /// Requested chunk size exceeds the maximum allowed.
    #[error("chunk size {size} exceeds maximum {max}")]
    ChunkTooLarge {
        /// Requested chunk size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Overlap must be strictly smaller than the chunk size.
    #[error("overlap {overlap} must be less than chunk size {size}")]
    OverlapTooLarge {
        /// Overlap size.
        overlap: usize,
        /// Chunk size.
        size: usize,
    },

    /// Unknown chunking strategy name.
    #[error("unknown chunking strategy: {name}")]
    Unknown {
        /// Name of the unknown strategy.
        name: String,
    },
}

/// Chunk-indexing errors for boundary validation.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Boundary pair lies outside the document or is inverted.
    #[error("invalid boundary {start}..{end} for document '{document_id}' ({len} bytes)")]
    InvalidBoundary {
        /// Document the boundary was produced for.
        document_id: String,
        /// Start offset of the offending pair.
        start: usize,
        /// End offset of the offending pair.
        end: usize,
        /// Document length in bytes.
        len: usize,
    },

    /// Boundary offset does not fall on a UTF-8 character boundary.
    #[error("boundary offset {offset} in document '{document_id}' splits a UTF-8 character")]
    MisalignedBoundary {
        /// Document the boundary was produced for.
        document_id: String,
        /// The offending offset.
        offset: usize,
    },
}

/// Vector-store errors for persistence backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Embedding serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stored embedding dimensions do not match the embedder.
    #[error("embedding dimensions {actual} do not match expected {expected}")]
    DimensionMismatch {
        /// Dimensions the embedder produces.
        expected: usize,
        /// Dimensions found in the store.
        actual: usize,
    },
}

/// Retrieval errors surfaced at query time.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The vector store could not serve the request.
    #[error("vector store unavailable: {reason}")]
    Unavailable {
        /// Underlying failure description.
        reason: String,
    },

    /// The store returned a chunk id the run never indexed.
    #[error("retrieved unknown chunk id: {id}")]
    UnknownChunk {
        /// The unrecognized chunk id.
        id: String,
    },
}

/// Dataset errors for corpus and query loading.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Corpus path does not exist.
    #[error("corpus not found: {path}")]
    CorpusNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Corpus path contained no readable documents.
    #[error("corpus is empty: {path}")]
    EmptyCorpus {
        /// Path that was scanned.
        path: String,
    },

    /// Failed to read a corpus or query file.
    #[error("failed to read {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping a large document failed.
    #[error("memory mapping failed for {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Query file could not be parsed.
    #[error("failed to parse {path}: {reason}")]
    ParseFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// A reference names a document absent from the corpus.
    #[error("query '{query_id}' references unknown document '{document_id}'")]
    UnknownDocument {
        /// Query owning the reference.
        query_id: String,
        /// Document id that was not found.
        document_id: String,
    },

    /// A reference carries an empty excerpt.
    #[error("query '{query_id}' has an empty reference excerpt")]
    EmptyExcerpt {
        /// Query owning the reference.
        query_id: String,
    },
}

// Implement From traits for library errors

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(StoreError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config {
            message: "bad config".to_string(),
        };
        assert_eq!(err.to_string(), "configuration error: bad config");
    }

    #[test]
    fn test_match_error_display() {
        let err = MatchError::EmptyExcerpt;
        assert_eq!(err.to_string(), "excerpt text is empty");

        let err = MatchError::InvalidThreshold { value: 1.5 };
        assert_eq!(
            err.to_string(),
            "similarity threshold 1.5 must be within [0, 1]"
        );
    }

    #[test]
    fn test_strategy_error_display() {
        let err = StrategyError::OverlapTooLarge {
            overlap: 100,
            size: 50,
        };
        assert_eq!(
            err.to_string(),
            "overlap 100 must be less than chunk size 50"
        );

        let err = StrategyError::Unknown {
            name: "foobar".to_string(),
        };
        assert!(err.to_string().contains("foobar"));
    }

    #[test]
    fn test_index_error_display() {
        let err = IndexError::InvalidBoundary {
            document_id: "doc1".to_string(),
            start: 10,
            end: 5,
            len: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("10..5"));
        assert!(msg.contains("doc1"));
        assert!(msg.contains("100"));

        let err = IndexError::MisalignedBoundary {
            document_id: "doc1".to_string(),
            offset: 7,
        };
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_retrieval_error_display() {
        let err = RetrievalError::Unavailable {
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));

        let err = RetrievalError::UnknownChunk {
            id: "doc1:0..10".to_string(),
        };
        assert!(err.to_string().contains("doc1:0..10"));
    }

    #[test]
    fn test_dataset_error_display() {
        let err = DatasetError::UnknownDocument {
            query_id: "q0001".to_string(),
            document_id: "missing".to_string(),
        };
        assert!(err.to_string().contains("q0001"));
        assert!(err.to_string().contains("missing"));

        let err = DatasetError::CorpusNotFound {
            path: "/tmp/corpus".to_string(),
        };
        assert_eq!(err.to_string(), "corpus not found: /tmp/corpus");
    }

    #[test]
    fn test_error_from_match() {
        let err: Error = MatchError::EmptyExcerpt.into();
        assert!(matches!(err, Error::Match(_)));
    }

    #[test]
    fn test_error_from_index() {
        let err: Error = IndexError::MisalignedBoundary {
            document_id: "d".to_string(),
            offset: 1,
        }
        .into();
        assert!(matches!(err, Error::Index(_)));
    }

    #[test]
    fn test_error_from_retrieval() {
        let err: Error = RetrievalError::Unavailable {
            reason: "down".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Retrieval(_)));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: Error = rusqlite_err.into();
        assert!(matches!(err, Error::Store(StoreError::Database(_))));

        let rusqlite_err = rusqlite::Error::InvalidQuery;
        let err: StoreError = rusqlite_err.into();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("oops").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_store_error_dimension_mismatch() {
        let err = StoreError::DimensionMismatch {
            expected: 256,
            actual: 384,
        };
        assert!(err.to_string().contains("256"));
        assert!(err.to_string().contains("384"));
    }
}
