//! Aggregation of per-query metrics into a run summary.
//!
//! Aggregation is deterministic: outcomes are sorted by query id before
//! reduction so floating-point sums do not depend on completion order.
//! Unresolved and failed counts always travel with the headline means.

use crate::core::{MetricSummary, QueryMetrics, RunSummary};
use crate::scoring::ScoreOutcome;

/// Builds a [`RunSummary`] from per-query score outcomes.
///
/// # Examples
///
/// ```
/// use chunkbench::core::QueryMetrics;
/// use chunkbench::scoring::{Aggregator, ScoreOutcome};
///
/// let outcomes = vec![
///     ScoreOutcome::Unresolved { query_id: "q1".to_string() },
///     ScoreOutcome::Scored(QueryMetrics::new("q2", 0.5, 0.8, 0.45)),
/// ];
/// let summary = Aggregator::new("fixed", "demo", 5).aggregate(&outcomes);
/// assert_eq!(summary.scored_queries, 1);
/// assert!((summary.recall.mean - 0.8).abs() < 1e-9);
/// assert!((summary.unresolved_fraction - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Aggregator {
    strategy: String,
    corpus: String,
    top_k: usize,
    failed_queries: usize,
    skipped_documents: usize,
    unresolved_excerpts: usize,
    incomplete: bool,
}

impl Aggregator {
    /// Creates an aggregator for one (corpus, strategy) run.
    #[must_use]
    pub fn new(strategy: impl Into<String>, corpus: impl Into<String>, top_k: usize) -> Self {
        Self {
            strategy: strategy.into(),
            corpus: corpus.into(),
            top_k,
            failed_queries: 0,
            skipped_documents: 0,
            unresolved_excerpts: 0,
            incomplete: false,
        }
    }

    /// Records queries that failed at retrieval time.
    #[must_use]
    pub const fn with_failed_queries(mut self, count: usize) -> Self {
        self.failed_queries = count;
        self
    }

    /// Records documents skipped during indexing.
    #[must_use]
    pub const fn with_skipped_documents(mut self, count: usize) -> Self {
        self.skipped_documents = count;
        self
    }

    /// Records individual reference excerpts that failed to resolve.
    #[must_use]
    pub const fn with_unresolved_excerpts(mut self, count: usize) -> Self {
        self.unresolved_excerpts = count;
        self
    }

    /// Marks the run as cut short.
    #[must_use]
    pub const fn with_incomplete(mut self, incomplete: bool) -> Self {
        self.incomplete = incomplete;
        self
    }

    /// Aggregates score outcomes into a run summary.
    ///
    /// Scorable queries contribute to the metric means; unresolved queries
    /// are counted and surfaced as a fraction of all attempted queries.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aggregate(&self, outcomes: &[ScoreOutcome]) -> RunSummary {
        // Stable order keeps floating-point reduction reproducible
        let mut sorted: Vec<&ScoreOutcome> = outcomes.iter().collect();
        sorted.sort_by(|a, b| a.query_id().cmp(b.query_id()));

        let scored: Vec<&QueryMetrics> = sorted
            .iter()
            .filter_map(|outcome| match outcome {
                ScoreOutcome::Scored(metrics) => Some(metrics),
                ScoreOutcome::Unresolved { .. } => None,
            })
            .collect();
        let unresolved_queries = sorted.len() - scored.len();

        let precisions: Vec<f64> = scored.iter().map(|m| m.precision).collect();
        let recalls: Vec<f64> = scored.iter().map(|m| m.recall).collect();
        let ious: Vec<f64> = scored.iter().map(|m| m.intersection_over_union).collect();

        let total = scored.len() + unresolved_queries + self.failed_queries;
        let unresolved_fraction = if total == 0 {
            0.0
        } else {
            unresolved_queries as f64 / total as f64
        };

        RunSummary {
            strategy: self.strategy.clone(),
            corpus: self.corpus.clone(),
            top_k: self.top_k,
            precision: MetricSummary::from_values(&precisions),
            recall: MetricSummary::from_values(&recalls),
            iou: MetricSummary::from_values(&ious),
            scored_queries: scored.len(),
            unresolved_queries,
            unresolved_fraction,
            failed_queries: self.failed_queries,
            skipped_documents: self.skipped_documents,
            unresolved_excerpts: self.unresolved_excerpts,
            incomplete: self.incomplete,
        }
    }
}
