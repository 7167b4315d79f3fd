//! Chunk representation.
//!
//! Chunks are contiguous offset ranges of a document produced by a chunking
//! strategy. Identifiers are derived from the document id and the byte range
//! so that re-indexing identical boundaries yields identical ids.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A chunk of a document, owned by the indexer for one evaluation run.
///
/// Chunks from one strategy run need not be contiguous or non-overlapping;
/// strategies may overlap by design. Each chunk is always a valid substring
/// range of its document.
///
/// # Examples
///
/// ```
/// use chunkbench::core::Chunk;
///
/// let chunk = Chunk::new("doc1", 0..13, "Hello, world!".to_string());
/// assert_eq!(chunk.id, "doc1:0..13");
/// assert_eq!(chunk.len(), 13);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier derived from `(document_id, start, end)`.
    pub id: String,

    /// ID of the document this chunk was cut from.
    pub document_id: String,

    /// Byte range in the original document.
    pub byte_range: Range<usize>,

    /// Chunk text, equal to the document substring at `byte_range`.
    pub text: String,
}

impl Chunk {
    /// Creates a new chunk with a derived stable identifier.
    #[must_use]
    pub fn new(document_id: impl Into<String>, byte_range: Range<usize>, text: String) -> Self {
        let document_id = document_id.into();
        let id = Self::derive_id(&document_id, byte_range.start, byte_range.end);
        Self {
            id,
            document_id,
            byte_range,
            text,
        }
    }

    /// Derives the stable chunk identifier for a boundary pair.
    ///
    /// Identical `(document_id, start, end)` inputs always produce identical
    /// ids, which makes re-indexing idempotent.
    #[must_use]
    pub fn derive_id(document_id: &str, start: usize, end: usize) -> String {
        format!("{document_id}:{start}..{end}")
    }

    /// Returns the chunk length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.byte_range.end - self.byte_range.start
    }

    /// Checks if the chunk covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.byte_range.start >= self.byte_range.end
    }

    /// Returns the start byte offset in the original document.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.byte_range.start
    }

    /// Returns the end byte offset in the original document.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.byte_range.end
    }

    /// Checks if this chunk's byte range overlaps another range.
    #[must_use]
    pub const fn overlaps_with(&self, other: &Range<usize>) -> bool {
        self.byte_range.start < other.end && other.start < self.byte_range.end
    }

    /// Returns a preview of the chunk text (first `max_len` bytes, backed up
    /// to a character boundary).
    #[must_use]
    pub fn preview(&self, max_len: usize) -> &str {
        if self.text.len() <= max_len {
            &self.text
        } else {
            let end = crate::core::find_char_boundary(&self.text, max_len);
            &self.text[..end]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_new() {
        let chunk = Chunk::new("doc1", 7..12, "world".to_string());
        assert_eq!(chunk.document_id, "doc1");
        assert_eq!(chunk.byte_range, 7..12);
        assert_eq!(chunk.text, "world");
        assert_eq!(chunk.start(), 7);
        assert_eq!(chunk.end(), 12);
    }

    #[test]
    fn test_chunk_id_stable() {
        let a = Chunk::new("doc1", 0..10, "0123456789".to_string());
        let b = Chunk::new("doc1", 0..10, "0123456789".to_string());
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, "doc1:0..10");
    }

    #[test]
    fn test_chunk_id_distinct() {
        let a = Chunk::new("doc1", 0..10, String::new());
        let b = Chunk::new("doc1", 0..11, String::new());
        let c = Chunk::new("doc2", 0..10, String::new());
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_chunk_len() {
        let chunk = Chunk::new("doc1", 10..25, "x".repeat(15));
        assert_eq!(chunk.len(), 15);
        assert!(!chunk.is_empty());
    }

    #[test]
    fn test_chunk_overlaps_with() {
        let chunk = Chunk::new("doc1", 10..20, String::new());
        assert!(chunk.overlaps_with(&(15..25)));
        assert!(chunk.overlaps_with(&(5..15)));
        assert!(!chunk.overlaps_with(&(20..30)));
        assert!(!chunk.overlaps_with(&(0..10)));
    }

    #[test]
    fn test_chunk_preview() {
        let chunk = Chunk::new("doc1", 0..13, "Hello, world!".to_string());
        assert_eq!(chunk.preview(5), "Hello");
        assert_eq!(chunk.preview(100), "Hello, world!");
    }

    #[test]
    fn test_chunk_preview_multibyte() {
        let chunk = Chunk::new("doc1", 0..7, "a世b世".to_string());
        // Cutting at byte 2 would split '世'; preview backs up
        assert_eq!(chunk.preview(2), "a");
    }

    #[test]
    fn test_chunk_serialization() {
        let chunk = Chunk::new("doc1", 0..4, "test".to_string());
        let json = serde_json::to_string(&chunk);
        assert!(json.is_ok());

        let deserialized: Result<Chunk, _> = serde_json::from_str(&json.unwrap());
        assert!(deserialized.is_ok());
        assert_eq!(deserialized.unwrap().id, "doc1:0..4");
    }
}
