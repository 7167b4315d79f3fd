//! Per-query metrics and run summaries.
//!
//! `QueryMetrics` is computed once by the scorer and never mutated;
//! `RunSummary` aggregates one (corpus, strategy) evaluation run and is
//! serialized for reporting.

use serde::{Deserialize, Serialize};

/// Retrieval-quality metrics for a single query.
///
/// All values lie in `[0, 1]`. Computed over unioned character-offset
/// intervals, so overlapping retrieved chunks are never double-counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    /// Query these metrics were computed for.
    pub query_id: String,

    /// `|R ∩ G| / |R|` - how much of the retrieved coverage is ground truth.
    pub precision: f64,

    /// `|R ∩ G| / |G|` - how much of the ground truth was retrieved.
    pub recall: f64,

    /// `|R ∩ G| / |R ∪ G|` over unioned offset ranges.
    pub intersection_over_union: f64,
}

impl QueryMetrics {
    /// Creates new query metrics.
    #[must_use]
    pub fn new(
        query_id: impl Into<String>,
        precision: f64,
        recall: f64,
        intersection_over_union: f64,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            precision,
            recall,
            intersection_over_union,
        }
    }
}

/// Mean and population standard deviation of one metric across queries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Arithmetic mean over scorable queries.
    pub mean: f64,
    /// Population standard deviation over scorable queries.
    pub std_dev: f64,
}

impl MetricSummary {
    /// Computes mean and population standard deviation of a sample.
    ///
    /// Returns the zero summary for an empty sample.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

/// Aggregate of query metrics for one (corpus, chunking-strategy) run.
///
/// Created once per evaluation run and immutable thereafter. Headline
/// metrics are always accompanied by their completeness context: counts of
/// unresolved, failed and skipped items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Chunking strategy evaluated.
    pub strategy: String,

    /// Corpus the run was evaluated against.
    pub corpus: String,

    /// Top-k retrieval cutoff used for every query.
    pub top_k: usize,

    /// Precision statistics over scorable queries.
    pub precision: MetricSummary,

    /// Recall statistics over scorable queries.
    pub recall: MetricSummary,

    /// Intersection-over-union statistics over scorable queries.
    pub iou: MetricSummary,

    /// Number of queries that produced metrics.
    pub scored_queries: usize,

    /// Queries excluded because every reference excerpt was unresolved.
    pub unresolved_queries: usize,

    /// Fraction of queries excluded as unresolved; a diagnostic of
    /// strategy/dataset mismatch, surfaced separately from the means.
    pub unresolved_fraction: f64,

    /// Queries that failed at retrieval time.
    pub failed_queries: usize,

    /// Documents skipped during indexing (invalid boundaries).
    pub skipped_documents: usize,

    /// Individual reference excerpts that could not be located.
    pub unresolved_excerpts: usize,

    /// True when the run was cut short (vector store became unreachable).
    pub incomplete: bool,
}

impl RunSummary {
    /// Total number of queries the run attempted.
    #[must_use]
    pub const fn total_queries(&self) -> usize {
        self.scored_queries + self.unresolved_queries + self.failed_queries
    }
}
