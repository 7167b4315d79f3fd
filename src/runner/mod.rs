//! Evaluation runner: one (corpus, strategy) run end to end.
//!
//! Indexing walks the corpus one document at a time, upserting each
//! document's chunks as one batch. Reference resolution runs serially
//! through the per-run cache. Retrieval and scoring run in parallel across
//! queries - they share no mutable state - and aggregation sorts by query
//! id so the summary never depends on completion order.
//!
//! Failure isolation follows the error design: an invalid boundary skips
//! that document; a retrieval failure fails that query; a store failure
//! during indexing marks the whole run incomplete but still reports
//! whatever completed.

use crate::chunking::ChunkingStrategy;
use crate::core::{Chunk, QueryMetrics, ResolvedSpan, RunSummary};
use crate::dataset::{Corpus, EvalQuery};
use crate::error::{DatasetError, Error, Result, RetrievalError};
use crate::indexing::index_document;
use crate::matching::{MatcherConfig, ResolutionCache, SpanMatcher};
use crate::scoring::{Aggregator, ScoreOutcome, score_query};
use crate::store::VectorStore;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Default number of chunks to retrieve per query.
pub const DEFAULT_TOP_K: usize = 5;

/// A document skipped during indexing, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    /// Document that was skipped.
    pub document_id: String,
    /// Why indexing failed.
    pub reason: String,
}

/// A query that failed at retrieval time, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryFailure {
    /// Query that failed.
    pub query_id: String,
    /// Why retrieval failed.
    pub reason: String,
}

/// Full result of one evaluation run: the summary plus per-query detail.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Aggregate summary for reporting.
    pub summary: RunSummary,
    /// Per-query metrics, sorted by query id.
    pub query_metrics: Vec<QueryMetrics>,
    /// Queries excluded because no reference resolved, sorted by query id.
    pub unresolved: Vec<String>,
    /// Per-query retrieval failures, sorted by query id.
    pub failures: Vec<QueryFailure>,
    /// Documents skipped during indexing.
    pub skipped: Vec<SkippedDocument>,
}

/// Runs chunking-strategy evaluations against a vector store.
pub struct Evaluator<'a> {
    store: &'a dyn VectorStore,
    strategy: &'a dyn ChunkingStrategy,
    matcher: SpanMatcher,
    top_k: usize,
    collection: String,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator.
    ///
    /// # Arguments
    ///
    /// * `store` - Vector store receiving chunks and serving queries.
    /// * `strategy` - Chunking strategy under evaluation.
    /// * `matcher_config` - Span matcher configuration.
    /// * `top_k` - Chunks retrieved per query.
    /// * `collection` - Store collection for this run.
    #[must_use]
    pub fn new(
        store: &'a dyn VectorStore,
        strategy: &'a dyn ChunkingStrategy,
        matcher_config: MatcherConfig,
        top_k: usize,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            strategy,
            matcher: SpanMatcher::new(matcher_config),
            top_k,
            collection: collection.into(),
        }
    }

    /// Runs one evaluation over a corpus and query set.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid strategy or matcher configuration and
    /// for queries referencing documents absent from the corpus. Indexing
    /// and retrieval failures are isolated per document/query and recorded
    /// in the report instead.
    pub fn run(&self, corpus: &Corpus, queries: &[EvalQuery]) -> Result<RunReport> {
        let (chunk_map, skipped, incomplete) = self.index_corpus(corpus)?;
        let (spans_by_query, unresolved_excerpts) = self.resolve_references(corpus, queries)?;

        info!(
            strategy = self.strategy.name(),
            corpus = %corpus.name,
            chunks = chunk_map.len(),
            skipped = skipped.len(),
            unresolved_excerpts,
            "indexing and resolution complete"
        );

        // Queries are independent once indexing is done; score in parallel.
        let results: Vec<std::result::Result<ScoreOutcome, QueryFailure>> = queries
            .par_iter()
            .map(|query| self.score_one(query, &chunk_map, &spans_by_query))
            .collect();

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(failure) => failures.push(failure),
            }
        }
        failures.sort_by(|a, b| a.query_id.cmp(&b.query_id));

        let summary = Aggregator::new(self.strategy.name(), corpus.name.clone(), self.top_k)
            .with_failed_queries(failures.len())
            .with_skipped_documents(skipped.len())
            .with_unresolved_excerpts(unresolved_excerpts)
            .with_incomplete(incomplete)
            .aggregate(&outcomes);

        let mut query_metrics: Vec<QueryMetrics> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ScoreOutcome::Scored(metrics) => Some(metrics.clone()),
                ScoreOutcome::Unresolved { .. } => None,
            })
            .collect();
        query_metrics.sort_by(|a, b| a.query_id.cmp(&b.query_id));

        let mut unresolved: Vec<String> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ScoreOutcome::Unresolved { query_id } => Some(query_id.clone()),
                ScoreOutcome::Scored(_) => None,
            })
            .collect();
        unresolved.sort();

        Ok(RunReport {
            summary,
            query_metrics,
            unresolved,
            failures,
            skipped,
        })
    }

    /// Indexes every corpus document, isolating per-document failures.
    ///
    /// Returns the chunk-id map, the skipped documents, and whether the
    /// store failed mid-run.
    #[allow(clippy::type_complexity)]
    fn index_corpus(
        &self,
        corpus: &Corpus,
    ) -> Result<(HashMap<String, Chunk>, Vec<SkippedDocument>, bool)> {
        let mut chunk_map = HashMap::new();
        let mut skipped = Vec::new();
        let mut incomplete = false;

        for document in corpus {
            match index_document(self.store, &self.collection, document, self.strategy) {
                Ok(chunks) => {
                    for chunk in chunks {
                        chunk_map.insert(chunk.id.clone(), chunk);
                    }
                }
                Err(Error::Index(e)) => {
                    warn!(document = %document.id, error = %e, "skipping document");
                    skipped.push(SkippedDocument {
                        document_id: document.id.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(err @ Error::Strategy(_)) => return Err(err),
                Err(e) => {
                    // Store unreachable: stop indexing, report what we have
                    warn!(error = %e, "vector store failed mid-run, marking incomplete");
                    incomplete = true;
                    break;
                }
            }
        }

        Ok((chunk_map, skipped, incomplete))
    }

    /// Resolves every query's references through the per-run cache.
    ///
    /// Returns resolved spans grouped by query id and the count of
    /// individual excerpts that could not be located.
    fn resolve_references(
        &self,
        corpus: &Corpus,
        queries: &[EvalQuery],
    ) -> Result<(HashMap<String, Vec<ResolvedSpan>>, usize)> {
        let mut cache = ResolutionCache::new();
        let mut spans_by_query: HashMap<String, Vec<ResolvedSpan>> = HashMap::new();
        let mut unresolved_excerpts = 0;

        for query in queries {
            let spans = spans_by_query.entry(query.id.clone()).or_default();
            for reference in &query.references {
                let document = corpus.get(&reference.document_id).ok_or_else(|| {
                    Error::Dataset(DatasetError::UnknownDocument {
                        query_id: query.id.clone(),
                        document_id: reference.document_id.clone(),
                    })
                })?;

                match cache.resolve(
                    &self.matcher,
                    &document.id,
                    &document.text,
                    &reference.text,
                )? {
                    Some(range) => {
                        spans.push(ResolvedSpan::new(
                            query.id.clone(),
                            document.id.clone(),
                            range,
                        ));
                    }
                    None => {
                        warn!(
                            query = %query.id,
                            document = %document.id,
                            "reference excerpt unresolved"
                        );
                        unresolved_excerpts += 1;
                    }
                }
            }
        }

        Ok((spans_by_query, unresolved_excerpts))
    }

    /// Retrieves and scores one query.
    fn score_one(
        &self,
        query: &EvalQuery,
        chunk_map: &HashMap<String, Chunk>,
        spans_by_query: &HashMap<String, Vec<ResolvedSpan>>,
    ) -> std::result::Result<ScoreOutcome, QueryFailure> {
        let empty = Vec::new();
        let spans = spans_by_query.get(&query.id).unwrap_or(&empty);

        let ids = self
            .store
            .query(&self.collection, &query.question, self.top_k)
            .map_err(|e| QueryFailure {
                query_id: query.id.clone(),
                reason: RetrievalError::Unavailable {
                    reason: e.to_string(),
                }
                .to_string(),
            })?;

        let mut retrieved = Vec::with_capacity(ids.len());
        for id in &ids {
            match chunk_map.get(id) {
                Some(chunk) => retrieved.push(chunk.clone()),
                None => {
                    // Stale collection contents would skew every metric
                    return Err(QueryFailure {
                        query_id: query.id.clone(),
                        reason: RetrievalError::UnknownChunk { id: id.clone() }.to_string(),
                    });
                }
            }
        }

        Ok(score_query(&query.id, &retrieved, spans))
    }
}
