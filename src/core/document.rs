//! Document representation.
//!
//! A document is an immutable text blob with a unique identifier. Every
//! offset referenced by a chunk or resolved span over a document must lie
//! within `[0, len)` and fall on a UTF-8 character boundary.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An immutable corpus document.
///
/// # Examples
///
/// ```
/// use chunkbench::core::Document;
///
/// let doc = Document::new("doc1", "The quick brown fox");
/// assert_eq!(doc.len(), 19);
/// assert_eq!(doc.slice(&(4..9)), Some("quick"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,

    /// Raw document text.
    pub text: String,
}

impl Document {
    /// Creates a new document.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Returns the document length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Checks whether the document text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Checks whether a byte range is a valid substring range of this
    /// document: in bounds, non-inverted and character-boundary aligned.
    #[must_use]
    pub fn contains_range(&self, range: &Range<usize>) -> bool {
        range.start < range.end
            && range.end <= self.text.len()
            && self.text.is_char_boundary(range.start)
            && self.text.is_char_boundary(range.end)
    }

    /// Returns the substring covered by a range, or `None` if the range is
    /// not a valid substring range.
    #[must_use]
    pub fn slice(&self, range: &Range<usize>) -> Option<&str> {
        self.contains_range(range)
            .then(|| &self.text[range.clone()])
    }
}

/// Finds a valid UTF-8 character boundary at or before the given position.
///
/// # Examples
///
/// ```
/// use chunkbench::core::find_char_boundary;
///
/// let s = "Hello 世界";
/// assert_eq!(find_char_boundary(s, 6), 6); // Before '世'
/// assert_eq!(find_char_boundary(s, 7), 6); // Middle of '世', backs up
/// ```
#[must_use]
pub const fn find_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let bytes = s.as_bytes();
    let mut boundary = pos;
    // UTF-8 continuation bytes start with 10xxxxxx (0x80-0xBF)
    while boundary > 0 && (bytes[boundary] & 0xC0) == 0x80 {
        boundary -= 1;
    }
    boundary
}
