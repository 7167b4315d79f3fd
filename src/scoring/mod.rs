//! Scoring: reconciling retrieved chunks against reference spans.
//!
//! For each query, the retrieved chunk ranges (`R`) and the resolved
//! reference ranges (`G`) are unioned per document and compared by
//! character-offset length:
//!
//! - `precision = |R ∩ G| / |R|`
//! - `recall = |R ∩ G| / |G|`
//! - `iou = |R ∩ G| / |R ∪ G|`
//!
//! Queries whose references all failed to resolve are excluded from
//! aggregation, never scored as zero - unresolved ground truth must not
//! deflate (or inflate) the metrics.

pub mod aggregate;
pub mod intervals;

pub use aggregate::Aggregator;

use crate::core::{Chunk, QueryMetrics, ResolvedSpan};
use intervals::{intersect, total_len, union};
use std::collections::BTreeMap;
use std::ops::Range;

/// Outcome of scoring one query.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    /// The query was scorable and produced metrics.
    Scored(QueryMetrics),

    /// Every reference excerpt for the query was unresolved; the query is
    /// excluded from aggregate metrics and counted separately.
    Unresolved {
        /// The affected query.
        query_id: String,
    },
}

impl ScoreOutcome {
    /// The query this outcome belongs to.
    #[must_use]
    pub fn query_id(&self) -> &str {
        match self {
            Self::Scored(metrics) => &metrics.query_id,
            Self::Unresolved { query_id } => query_id,
        }
    }

    /// Checks whether the query produced metrics.
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        matches!(self, Self::Scored(_))
    }
}

/// Scores one query's retrieved chunks against its resolved references.
///
/// Both sides are grouped by document and unioned before measuring, so
/// overlapping chunks count once and chunks from other documents count
/// nothing. `retrieved` is expected to be the top-k retrieval result;
/// rank order does not affect the interval metrics.
///
/// Edge cases (see module docs): no retrieved coverage scores 0.0 across
/// the board; no resolved references yields [`ScoreOutcome::Unresolved`].
///
/// # Examples
///
/// ```
/// use chunkbench::core::{Chunk, ResolvedSpan};
/// use chunkbench::scoring::{ScoreOutcome, score_query};
///
/// let doc = "The quick brown fox jumps over the lazy dog.";
/// let retrieved = vec![
///     Chunk::new("doc1", 0..20, doc[0..20].to_string()),
///     Chunk::new("doc1", 20..44, doc[20..44].to_string()),
/// ];
/// let references = vec![ResolvedSpan::new("q1", "doc1", 10..25)];
///
/// let ScoreOutcome::Scored(metrics) = score_query("q1", &retrieved, &references) else {
///     unreachable!();
/// };
/// assert!((metrics.recall - 1.0).abs() < 1e-9);
/// assert!((metrics.precision - 15.0 / 44.0).abs() < 1e-9);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_query(
    query_id: &str,
    retrieved: &[Chunk],
    references: &[ResolvedSpan],
) -> ScoreOutcome {
    let reference_cover = union_by_document(
        references
            .iter()
            .map(|span| (span.document_id.as_str(), span.byte_range.clone())),
    );
    let g_total: usize = reference_cover.values().map(|r| total_len(r)).sum();

    if g_total == 0 {
        return ScoreOutcome::Unresolved {
            query_id: query_id.to_string(),
        };
    }

    let retrieved_cover = union_by_document(
        retrieved
            .iter()
            .map(|chunk| (chunk.document_id.as_str(), chunk.byte_range.clone())),
    );
    let r_total: usize = retrieved_cover.values().map(|r| total_len(r)).sum();

    if r_total == 0 {
        return ScoreOutcome::Scored(QueryMetrics::new(query_id, 0.0, 0.0, 0.0));
    }

    let mut i_total = 0usize;
    for (document_id, retrieved_ranges) in &retrieved_cover {
        if let Some(reference_ranges) = reference_cover.get(document_id) {
            i_total += total_len(&intersect(retrieved_ranges, reference_ranges));
        }
    }

    let precision = i_total as f64 / r_total as f64;
    let recall = i_total as f64 / g_total as f64;
    let union_total = r_total + g_total - i_total;
    let iou = i_total as f64 / union_total as f64;

    ScoreOutcome::Scored(QueryMetrics::new(query_id, precision, recall, iou))
}

/// Groups ranges by document id and unions each group.
fn union_by_document<'a, I>(ranges: I) -> BTreeMap<&'a str, Vec<Range<usize>>>
where
    I: Iterator<Item = (&'a str, Range<usize>)>,
{
    let mut grouped: BTreeMap<&str, Vec<Range<usize>>> = BTreeMap::new();
    for (document_id, range) in ranges {
        grouped.entry(document_id).or_default().push(range);
    }
    grouped
        .into_iter()
        .map(|(document_id, group)| (document_id, union(&group)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "The quick brown fox jumps over the lazy dog.";

    fn chunk(document_id: &str, range: Range<usize>) -> Chunk {
        Chunk::new(document_id, range.clone(), "x".repeat(range.end - range.start))
    }

    fn span(query_id: &str, document_id: &str, range: Range<usize>) -> ResolvedSpan {
        ResolvedSpan::new(query_id, document_id, range)
    }

    fn scored(outcome: ScoreOutcome) -> QueryMetrics {
        match outcome {
            ScoreOutcome::Scored(metrics) => metrics,
            ScoreOutcome::Unresolved { query_id } => {
                unreachable!("query {query_id} unexpectedly unresolved")
            }
        }
    }

    #[test]
    fn test_spec_scenario_fox_document() {
        // Document of 44 chars, excerpt at 10..25, retrieved spans cover all
        assert_eq!(DOC.len(), 44);
        let retrieved = vec![chunk("doc1", 0..20), chunk("doc1", 20..44)];
        let references = vec![span("q1", "doc1", 10..25)];

        let metrics = scored(score_query("q1", &retrieved, &references));
        assert!((metrics.precision - 15.0 / 44.0).abs() < 1e-9);
        assert!((metrics.recall - 1.0).abs() < 1e-9);
        assert!((metrics.intersection_over_union - 15.0 / 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_retrieval_scores_zero() {
        let references = vec![span("q1", "doc1", 10..25)];
        let metrics = scored(score_query("q1", &[], &references));
        assert!(metrics.precision.abs() < f64::EPSILON);
        assert!(metrics.recall.abs() < f64::EPSILON);
        assert!(metrics.intersection_over_union.abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_references_unresolved() {
        let retrieved = vec![chunk("doc1", 0..20)];
        let outcome = score_query("q1", &retrieved, &[]);
        assert_eq!(
            outcome,
            ScoreOutcome::Unresolved {
                query_id: "q1".to_string()
            }
        );
        assert!(!outcome.is_scored());
        assert_eq!(outcome.query_id(), "q1");
    }

    #[test]
    fn test_overlapping_chunks_not_double_counted() {
        // Two identical chunks: |R| must stay 20, not 40
        let retrieved = vec![chunk("doc1", 0..20), chunk("doc1", 0..20)];
        let references = vec![span("q1", "doc1", 0..20)];

        let metrics = scored(score_query("q1", &retrieved, &references));
        assert!((metrics.precision - 1.0).abs() < 1e-9);
        assert!((metrics.recall - 1.0).abs() < 1e-9);
        assert!((metrics.intersection_over_union - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_disjoint_references_merged() {
        let retrieved = vec![chunk("doc1", 0..30)];
        let references = vec![span("q1", "doc1", 0..10), span("q1", "doc1", 20..30)];

        let metrics = scored(score_query("q1", &retrieved, &references));
        // |G| = 20, intersection = 20, |R| = 30
        assert!((metrics.recall - 1.0).abs() < 1e-9);
        assert!((metrics.precision - 20.0 / 30.0).abs() < 1e-9);
        assert!((metrics.intersection_over_union - 20.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_document_chunks_score_nothing() {
        let retrieved = vec![chunk("other_doc", 10..25)];
        let references = vec![span("q1", "doc1", 10..25)];

        let metrics = scored(score_query("q1", &retrieved, &references));
        assert!(metrics.precision.abs() < f64::EPSILON);
        assert!(metrics.recall.abs() < f64::EPSILON);
    }

    #[test]
    fn test_multi_document_query() {
        let retrieved = vec![chunk("doc1", 0..10), chunk("doc2", 0..10)];
        let references = vec![span("q1", "doc1", 0..10), span("q1", "doc2", 5..10)];

        let metrics = scored(score_query("q1", &retrieved, &references));
        // intersection = 10 + 5 = 15, |R| = 20, |G| = 15
        assert!((metrics.precision - 15.0 / 20.0).abs() < 1e-9);
        assert!((metrics.recall - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_recall_monotonic_in_coverage() {
        let references = vec![span("q1", "doc1", 10..30)];

        let few = vec![chunk("doc1", 0..15)];
        let more = vec![chunk("doc1", 0..15), chunk("doc1", 15..25)];
        let all = vec![
            chunk("doc1", 0..15),
            chunk("doc1", 15..25),
            chunk("doc1", 25..44),
        ];

        let recall_few = scored(score_query("q1", &few, &references)).recall;
        let recall_more = scored(score_query("q1", &more, &references)).recall;
        let recall_all = scored(score_query("q1", &all, &references)).recall;

        assert!(recall_few <= recall_more);
        assert!(recall_more <= recall_all);
        assert!(recall_all <= 1.0);
        assert!((recall_all - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_bounded() {
        let retrieved = vec![chunk("doc1", 5..15), chunk("doc1", 12..40)];
        let references = vec![span("q1", "doc1", 0..20)];

        let metrics = scored(score_query("q1", &retrieved, &references));
        for value in [
            metrics.precision,
            metrics.recall,
            metrics.intersection_over_union,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
