//! Recursive-delimiter splitting strategy.
//!
//! Splits at the strongest delimiter available near the target size,
//! preferring paragraph breaks over line breaks over sentence boundaries
//! over word boundaries, falling back to character boundaries.

use crate::chunking::traits::ChunkingStrategy;
use crate::chunking::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::core::find_char_boundary;
use crate::error::{Result, StrategyError};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Recursive-delimiter splitter producing non-overlapping ranges that
/// cover the whole input.
///
/// # Examples
///
/// ```
/// use chunkbench::chunking::{ChunkingStrategy, RecursiveSplitter};
///
/// let splitter = RecursiveSplitter::with_size(64);
/// let text = "First sentence. Second sentence.\n\nNew paragraph starts here.";
/// let boundaries = splitter.split(text).unwrap();
/// assert!(!boundaries.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    /// Target chunk size in bytes.
    chunk_size: usize,
    /// Minimum chunk size; avoids tiny trailing chunks.
    min_chunk_size: usize,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveSplitter {
    /// Creates a recursive splitter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_chunk_size: 24,
        }
    }

    /// Creates a recursive splitter with a custom target size.
    #[must_use]
    pub const fn with_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            min_chunk_size: 24,
        }
    }

    /// Sets the minimum chunk size.
    #[must_use]
    pub const fn min_chunk_size(mut self, size: usize) -> Self {
        self.min_chunk_size = size;
        self
    }

    /// Validates the splitter configuration.
    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(StrategyError::InvalidConfig {
                reason: "chunk_size must be > 0".to_string(),
            }
            .into());
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(StrategyError::ChunkTooLarge {
                size: self.chunk_size,
                max: MAX_CHUNK_SIZE,
            }
            .into());
        }
        Ok(())
    }

    /// Finds the best split point at or before the target position.
    ///
    /// Preference: paragraph break > line break > sentence boundary >
    /// word boundary > character boundary. The search window extends back
    /// 25% of the chunk size from the target.
    fn find_best_boundary(&self, text: &str, target_pos: usize) -> usize {
        if target_pos >= text.len() {
            return text.len();
        }

        let search_start =
            find_char_boundary(text, target_pos.saturating_sub(self.chunk_size / 4));
        let search_end = find_char_boundary(text, target_pos);

        if search_start >= search_end {
            return find_char_boundary(text, target_pos);
        }

        let region = &text[search_start..search_end];

        // Paragraph break (double newline)
        if let Some(pos) = region.rfind("\n\n") {
            let boundary = search_start + pos + 2;
            if boundary > search_start {
                return boundary;
            }
        }

        // Single newline
        if let Some(pos) = region.rfind('\n') {
            let boundary = search_start + pos + 1;
            if boundary > search_start {
                return boundary;
            }
        }

        // Unicode sentence boundary
        let mut sentence_end = search_start;
        let mut best_sentence = None;
        for sentence in region.split_sentence_bounds() {
            sentence_end += sentence.len();
            if sentence_end < search_end {
                best_sentence = Some(sentence_end);
            }
        }
        if let Some(boundary) = best_sentence
            && boundary > search_start
        {
            return boundary;
        }

        // Word boundary
        if let Some(pos) = region.rfind(' ') {
            let boundary = search_start + pos + 1;
            if boundary > search_start {
                return boundary;
            }
        }

        // Character boundary
        find_char_boundary(text, target_pos)
    }
}

impl ChunkingStrategy for RecursiveSplitter {
    fn split(&self, text: &str) -> Result<Vec<Range<usize>>> {
        self.validate()?;

        if text.is_empty() {
            return Ok(vec![]);
        }
        if text.len() <= self.chunk_size {
            return Ok(vec![0..text.len()]);
        }

        let mut boundaries = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let target_end = (start + self.chunk_size).min(text.len());
            let mut end = if target_end >= text.len() {
                text.len()
            } else {
                self.find_best_boundary(text, target_end)
            };

            // Force progress when the delimiter search collapses to start
            if end <= start {
                end = find_char_boundary(text, (start + self.chunk_size).min(text.len()));
                if end <= start {
                    end = text.len();
                }
            }

            // Absorb a tiny trailing remainder into the final chunk
            if text.len() - end < self.min_chunk_size && end < text.len() {
                let extended = text.len();
                if extended - start <= self.chunk_size + self.min_chunk_size {
                    end = extended;
                }
            }

            boundaries.push(start..end);
            start = end;
        }

        Ok(boundaries)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }

    fn description(&self) -> &'static str {
        "Recursive delimiter split: paragraph > line > sentence > word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let splitter = RecursiveSplitter::with_size(100);
        let boundaries = splitter.split("short text").unwrap();
        assert_eq!(boundaries, vec![0..10]);
    }

    #[test]
    fn test_empty_text() {
        let splitter = RecursiveSplitter::with_size(100);
        assert!(splitter.split("").unwrap().is_empty());
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let splitter = RecursiveSplitter::with_size(40).min_chunk_size(1);
        // Paragraph break sits inside the lookback window before byte 40
        let text = "A first paragraph of suitable size.\n\nSecond paragraph follows with more text.";
        let boundaries = splitter.split(text).unwrap();
        // First boundary lands right after the double newline
        assert_eq!(boundaries[0].end, text.find("Second").unwrap());
    }

    #[test]
    fn test_prefers_sentence_over_word() {
        let splitter = RecursiveSplitter::with_size(40).min_chunk_size(1);
        let text = "One sentence here. Another sentence that keeps going well past the target.";
        let boundaries = splitter.split(text).unwrap();
        // The first split should land after "here. "
        let first_end = boundaries[0].end;
        assert!(text[..first_end].contains("here."));
    }

    #[test]
    fn test_full_coverage_no_gaps() {
        let splitter = RecursiveSplitter::with_size(32);
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                    Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
        let boundaries = splitter.split(text).unwrap();
        assert_eq!(boundaries.first().map(|r| r.start), Some(0));
        assert_eq!(boundaries.last().map(|r| r.end), Some(text.len()));
        for pair in boundaries.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "chunks must be contiguous");
        }
    }

    #[test]
    fn test_respects_char_boundaries() {
        let splitter = RecursiveSplitter::with_size(8).min_chunk_size(1);
        let text = "世界世界 世界世界 世界世界";
        let boundaries = splitter.split(text).unwrap();
        for range in &boundaries {
            assert!(text.is_char_boundary(range.start));
            assert!(text.is_char_boundary(range.end));
        }
    }

    #[test]
    fn test_deterministic() {
        let splitter = RecursiveSplitter::with_size(32);
        let text = "Sentence one. Sentence two. Sentence three. Sentence four. Sentence five.";
        assert_eq!(splitter.split(text).unwrap(), splitter.split(text).unwrap());
    }

    #[test]
    fn test_absorbs_tiny_remainder() {
        let splitter = RecursiveSplitter::with_size(40).min_chunk_size(16);
        // 47 bytes: the natural split near 40 would leave a 12-byte tail,
        // which gets absorbed into the final chunk instead
        let text = "Plain words only here with nothing special yet.";
        let boundaries = splitter.split(text).unwrap();
        assert_eq!(boundaries, vec![0..text.len()]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let splitter = RecursiveSplitter::with_size(0);
        assert!(splitter.split("abc").is_err());
    }
}
