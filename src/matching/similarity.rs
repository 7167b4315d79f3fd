//! Edit-distance similarity for approximate span matching.
//!
//! Scoring compares whitespace/punctuation-normalized text so that
//! re-wrapped lines and typographic quotes do not defeat matching, while
//! callers keep offsets in the original document coordinate space.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a compile-time constant
    Regex::new(r"\s+").unwrap()
});

/// Normalizes text for similarity scoring.
///
/// Folds typographic quotes and dashes to ASCII, collapses whitespace runs
/// to single spaces and trims the ends. Normalization is scoring-only;
/// reported offsets always refer to the original text.
#[must_use]
pub fn normalize_for_match(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{00A0}' => ' ',
            _ => c,
        })
        .collect();
    WHITESPACE_RUN.replace_all(folded.trim(), " ").into_owned()
}

/// Computes the Levenshtein distance between two strings in characters.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    levenshtein_within(a, b, usize::MAX).unwrap_or(usize::MAX)
}

/// Computes the Levenshtein distance if it does not exceed `limit`.
///
/// Uses the classic two-row dynamic program and abandons early once every
/// cell of the current row exceeds the limit, which keeps hopeless window
/// comparisons cheap.
///
/// Returns `None` when the distance is greater than `limit`.
#[must_use]
pub fn levenshtein_within(a: &str, b: &str, limit: usize) -> Option<usize> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.len().abs_diff(b_chars.len()) > limit {
        return None;
    }
    if a_chars.is_empty() {
        return (b_chars.len() <= limit).then_some(b_chars.len());
    }
    if b_chars.is_empty() {
        return (a_chars.len() <= limit).then_some(a_chars.len());
    }

    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut curr_row = Vec::with_capacity(b_chars.len() + 1);
        curr_row.push(i + 1);
        let mut row_min = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            let cell = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
            row_min = row_min.min(cell);
            curr_row.push(cell);
        }
        if row_min > limit {
            return None;
        }
        prev_row = curr_row;
    }

    let distance = *prev_row.last().unwrap_or(&0);
    (distance <= limit).then_some(distance)
}

/// Computes normalized similarity between two strings as
/// `1 - distance / max(chars)`.
///
/// Two empty strings are fully similar.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Computes normalized similarity only if it reaches `min_similarity`.
///
/// Derives a distance limit from the threshold so the comparison can stop
/// as soon as the window cannot clear it.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn similarity_at_least(a: &str, b: &str, min_similarity: f64) -> Option<f64> {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return Some(1.0);
    }
    let limit = ((1.0 - min_similarity) * max_len as f64).floor() as usize;
    levenshtein_within(a, b, limit).map(|d| 1.0 - d as f64 / max_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", "", 0; "both empty")]
    #[test_case("abc", "abc", 0; "identical")]
    #[test_case("abc", "abd", 1; "substitution")]
    #[test_case("abc", "ab", 1; "deletion")]
    #[test_case("ab", "abc", 1; "insertion")]
    #[test_case("kitten", "sitting", 3; "classic")]
    fn test_levenshtein(a: &str, b: &str, expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
    }

    #[test]
    fn test_levenshtein_unicode() {
        // One character substitution, not three byte edits
        assert_eq!(levenshtein("a世c", "aXc"), 1);
    }

    #[test]
    fn test_levenshtein_within_limit() {
        assert_eq!(levenshtein_within("kitten", "sitting", 3), Some(3));
        assert_eq!(levenshtein_within("kitten", "sitting", 2), None);
        assert_eq!(levenshtein_within("abc", "abc", 0), Some(0));
    }

    #[test]
    fn test_levenshtein_within_length_shortcut() {
        // Length difference alone exceeds the limit
        assert_eq!(levenshtein_within("a", "abcdefgh", 3), None);
    }

    #[test]
    fn test_normalized_similarity() {
        assert!((normalized_similarity("abc", "abc") - 1.0).abs() < f64::EPSILON);
        assert!((normalized_similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!((normalized_similarity("abcd", "abcx") - 0.75).abs() < 1e-12);
        assert!(normalized_similarity("abc", "xyz").abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_at_least() {
        assert!(similarity_at_least("abcd", "abcx", 0.75).is_some());
        assert!(similarity_at_least("abcd", "abxx", 0.75).is_none());
        assert_eq!(similarity_at_least("", "", 0.9), Some(1.0));
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            normalize_for_match("brown  fox\n jumps\t over"),
            "brown fox jumps over"
        );
        assert_eq!(normalize_for_match("  padded  "), "padded");
    }

    #[test]
    fn test_normalize_folds_typography() {
        assert_eq!(normalize_for_match("\u{201C}quoted\u{201D}"), "\"quoted\"");
        assert_eq!(normalize_for_match("it\u{2019}s"), "it's");
        assert_eq!(normalize_for_match("em\u{2014}dash"), "em-dash");
        assert_eq!(normalize_for_match("non\u{00A0}breaking"), "non breaking");
    }

    #[test]
    fn test_normalized_forms_match_after_rewrap() {
        let original = "brown fox jumps";
        let rewrapped = "brown\nfox  jumps";
        assert_eq!(
            normalize_for_match(original),
            normalize_for_match(rewrapped)
        );
    }
}
