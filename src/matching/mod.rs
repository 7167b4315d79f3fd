//! Span matching: locating reference excerpts in documents.
//!
//! Excerpt text may differ from the document verbatim - re-wrapped lines,
//! collapsed whitespace, typographic quotes. The matcher tries exact
//! substring search first and falls back to a sliding-window approximate
//! search scored by normalized edit distance. Reported offsets are always
//! in the original document coordinate space.

pub mod similarity;

pub use similarity::{levenshtein, normalize_for_match, normalized_similarity};

use crate::core::find_char_boundary;
use crate::error::{MatchError, Result};
use similarity::similarity_at_least;
use std::collections::HashMap;
use std::ops::Range;

/// Default minimum similarity an approximate window must reach.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.85;

/// Default window-length tolerance as a fraction of the excerpt length.
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.25;

/// Configuration for the span matcher.
///
/// The similarity threshold is a policy knob, not a constant: datasets with
/// heavy formatting drift may need a looser threshold, clean datasets a
/// stricter one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Minimum normalized similarity an approximate match must reach.
    pub min_similarity: f64,
    /// Window length tolerance as a fraction of the excerpt length.
    pub length_tolerance: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            length_tolerance: DEFAULT_LENGTH_TOLERANCE,
        }
    }
}

impl MatcherConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum similarity threshold.
    #[must_use]
    pub const fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Sets the window-length tolerance.
    #[must_use]
    pub const fn with_length_tolerance(mut self, length_tolerance: f64) -> Self {
        self.length_tolerance = length_tolerance;
        self
    }

    /// Validates that both knobs lie in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidThreshold`] or
    /// [`MatchError::InvalidTolerance`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(MatchError::InvalidThreshold {
                value: self.min_similarity,
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.length_tolerance) {
            return Err(MatchError::InvalidTolerance {
                value: self.length_tolerance,
            }
            .into());
        }
        Ok(())
    }
}

/// Locates reference excerpts within documents.
///
/// Pure function of its inputs; resolution has no side effects. Use
/// [`ResolutionCache`] to memoize repeated lookups within one run.
///
/// # Examples
///
/// ```
/// use chunkbench::matching::SpanMatcher;
///
/// let matcher = SpanMatcher::default();
/// let doc = "The quick brown fox jumps over the lazy dog";
/// let span = matcher.resolve(doc, "brown fox jumps").unwrap();
/// assert_eq!(span, Some(10..25));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpanMatcher {
    config: MatcherConfig,
}

impl SpanMatcher {
    /// Creates a matcher with the given configuration.
    #[must_use]
    pub const fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Returns the matcher configuration.
    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Resolves an excerpt to its byte range in the document.
    ///
    /// Tries exact substring search first; on failure slides approximate
    /// windows of `excerpt.len() ± tolerance` over the document, scoring
    /// each by normalized edit distance between normalized forms. The best
    /// window at or above the similarity threshold wins; ties break to the
    /// earliest offset, then the shorter window.
    ///
    /// Returns `None` when no window clears the threshold. Callers must
    /// treat `None` as "unresolved" and exclude the excerpt from recall
    /// denominators - never as zero-overlap.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::EmptyExcerpt`] for an empty excerpt and
    /// configuration errors for out-of-range thresholds.
    pub fn resolve(&self, document: &str, excerpt: &str) -> Result<Option<Range<usize>>> {
        if excerpt.is_empty() {
            return Err(MatchError::EmptyExcerpt.into());
        }
        self.config.validate()?;

        // Exact search: cheap, exact, earliest occurrence wins.
        if let Some(start) = document.find(excerpt) {
            return Ok(Some(start..start + excerpt.len()));
        }

        Ok(self.resolve_approximate(document, excerpt))
    }

    /// Sliding-window approximate search.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn resolve_approximate(&self, document: &str, excerpt: &str) -> Option<Range<usize>> {
        if document.is_empty() {
            return None;
        }

        let target = normalize_for_match(excerpt);
        if target.is_empty() {
            return None;
        }

        let base_len = excerpt.len().min(document.len());
        let tolerance = ((base_len as f64 * self.config.length_tolerance).round() as usize).max(1);
        let min_len = base_len.saturating_sub(tolerance).max(1);
        let max_len = base_len + tolerance;
        // Step window lengths coarsely; the exact excerpt length and the
        // tolerance extremes are always included.
        let step = (tolerance / 4).max(1);
        let mut lengths: Vec<usize> = (min_len..=max_len).step_by(step).collect();
        lengths.push(base_len);
        lengths.push(max_len);
        lengths.sort_unstable();
        lengths.dedup();

        let mut best: Option<(f64, Range<usize>)> = None;
        for start in candidate_starts(document, &target) {
            let mut last_end = start;
            for &len in &lengths {
                if start + len > document.len() + tolerance {
                    break;
                }
                let end = find_char_boundary(document, (start + len).min(document.len()));
                if end <= last_end {
                    continue;
                }
                last_end = end;
                let window = normalize_for_match(&document[start..end]);
                if let Some(score) =
                    similarity_at_least(&window, &target, self.config.min_similarity)
                    && best.as_ref().is_none_or(|(b, _)| score > *b)
                {
                    best = Some((score, start..end));
                }
            }
        }

        best.map(|(_, range)| range)
    }
}

/// Candidate window starts for approximate matching.
///
/// Prefilters to occurrences of the excerpt's first token when the token
/// occurs in the document at all; otherwise every word boundary is a
/// candidate. Positions are byte offsets on character boundaries.
fn candidate_starts(document: &str, normalized_excerpt: &str) -> Vec<usize> {
    let first_token = normalized_excerpt
        .split_whitespace()
        .next()
        .unwrap_or_default();

    if !first_token.is_empty() && first_token.is_ascii() {
        let doc_lower = document.to_ascii_lowercase();
        let token_lower = first_token.to_ascii_lowercase();
        let hits: Vec<usize> = doc_lower
            .match_indices(&token_lower)
            .map(|(pos, _)| pos)
            .filter(|&pos| is_word_start(document, pos))
            .collect();
        if !hits.is_empty() {
            return hits;
        }
    }

    word_starts(document)
}

/// Checks whether a byte offset starts a word.
fn is_word_start(text: &str, pos: usize) -> bool {
    if !text.is_char_boundary(pos) {
        return false;
    }
    pos == 0
        || text[..pos]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace)
}

/// All word-start byte offsets in the text.
fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut prev_was_space = true;
    for (pos, c) in text.char_indices() {
        if prev_was_space && !c.is_whitespace() {
            starts.push(pos);
        }
        prev_was_space = c.is_whitespace();
    }
    starts
}

/// Memoizes span resolutions for one evaluation run.
///
/// Keyed by `(document_id, excerpt_text)`; an optimization only, never a
/// correctness requirement. Local to one run, no shared state.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<(String, String), Option<Range<usize>>>,
}

impl ResolutionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves through the cache, computing and memoizing on miss.
    ///
    /// # Errors
    ///
    /// Propagates matcher errors; errors are not cached.
    pub fn resolve(
        &mut self,
        matcher: &SpanMatcher,
        document_id: &str,
        document_text: &str,
        excerpt: &str,
    ) -> Result<Option<Range<usize>>> {
        let key = (document_id.to_string(), excerpt.to_string());
        if let Some(cached) = self.entries.get(&key) {
            return Ok(cached.clone());
        }
        let resolved = matcher.resolve(document_text, excerpt)?;
        self.entries.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Number of memoized resolutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
