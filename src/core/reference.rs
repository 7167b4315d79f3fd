//! Reference excerpts and resolved spans.
//!
//! A reference excerpt is ground-truth text a retrieval system should
//! surface for a query. Excerpts carry no offsets when loaded; the span
//! matcher resolves them into document coordinates lazily.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Ground-truth excerpt supplied by the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceExcerpt {
    /// Query this excerpt belongs to.
    pub query_id: String,

    /// Document the excerpt should be found in.
    pub document_id: String,

    /// Raw excerpt text; may differ from the document verbatim
    /// (re-wrapped lines, normalized quotes).
    pub text: String,
}

impl ReferenceExcerpt {
    /// Creates a new reference excerpt.
    #[must_use]
    pub fn new(
        query_id: impl Into<String>,
        document_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            document_id: document_id.into(),
            text: text.into(),
        }
    }
}

/// The located offset span of a reference excerpt within its document.
///
/// Offsets are in the original document coordinate space, never the
/// normalized search space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    /// Query the resolved excerpt belongs to.
    pub query_id: String,

    /// Document the span points into.
    pub document_id: String,

    /// Byte range in the original document.
    pub byte_range: Range<usize>,
}

impl ResolvedSpan {
    /// Creates a new resolved span.
    #[must_use]
    pub fn new(
        query_id: impl Into<String>,
        document_id: impl Into<String>,
        byte_range: Range<usize>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            document_id: document_id.into(),
            byte_range,
        }
    }

    /// Returns the span length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.byte_range.end - self.byte_range.start
    }

    /// Checks if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.byte_range.start >= self.byte_range.end
    }
}
