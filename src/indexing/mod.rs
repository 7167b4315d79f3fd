//! Chunk indexing: boundary validation and store delegation.
//!
//! The indexer turns strategy-provided boundary pairs into validated
//! [`Chunk`] records with stable identifiers, then hands each document's
//! chunks to the vector store as one logical batch. It never computes
//! embeddings itself.

use crate::chunking::ChunkingStrategy;
use crate::core::{Chunk, Document};
use crate::error::{IndexError, Result};
use crate::store::{ChunkRecord, VectorStore};
use std::ops::Range;
use tracing::debug;

/// Builds chunk records from a document and boundary ranges.
///
/// Boundaries may overlap and need not be monotonic - strategies overlap by
/// design - but each pair must be a valid substring range: `start < end`,
/// `end <= len`, both offsets on UTF-8 character boundaries. Violations
/// fail with an error identifying the offending pair; nothing is built.
///
/// Chunk ids derive from `(document_id, start, end)`, so rebuilding
/// identical boundaries yields identical ids.
///
/// # Errors
///
/// Returns [`IndexError::InvalidBoundary`] or
/// [`IndexError::MisalignedBoundary`] for the first invalid pair.
///
/// # Examples
///
/// ```
/// use chunkbench::core::Document;
/// use chunkbench::indexing::build;
///
/// let doc = Document::new("doc1", "The quick brown fox");
/// let chunks = build(&doc, &[0..9, 4..15]).unwrap();
/// assert_eq!(chunks[0].text, "The quick");
/// assert_eq!(chunks[1].text, "quick brown");
/// ```
pub fn build(document: &Document, boundaries: &[Range<usize>]) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::with_capacity(boundaries.len());
    for range in boundaries {
        if range.start >= range.end || range.end > document.len() {
            return Err(IndexError::InvalidBoundary {
                document_id: document.id.clone(),
                start: range.start,
                end: range.end,
                len: document.len(),
            }
            .into());
        }
        for offset in [range.start, range.end] {
            if !document.text.is_char_boundary(offset) {
                return Err(IndexError::MisalignedBoundary {
                    document_id: document.id.clone(),
                    offset,
                }
                .into());
            }
        }
        let text = document.text[range.clone()].to_string();
        chunks.push(Chunk::new(document.id.clone(), range.clone(), text));
    }
    Ok(chunks)
}

/// Splits a document with a strategy, builds its chunks and upserts them to
/// the store as one batch.
///
/// Returns the built chunks so callers can keep the id-to-span mapping for
/// scoring.
///
/// # Errors
///
/// Propagates strategy, validation and store errors; on any error nothing
/// from this document is visible in the store.
pub fn index_document(
    store: &dyn VectorStore,
    collection: &str,
    document: &Document,
    strategy: &dyn ChunkingStrategy,
) -> Result<Vec<Chunk>> {
    let boundaries = strategy.split(&document.text)?;
    let chunks = build(document, &boundaries)?;

    let records: Vec<ChunkRecord> = chunks.iter().map(ChunkRecord::from).collect();
    store.upsert(collection, &records)?;

    debug!(
        document = %document.id,
        strategy = strategy.name(),
        chunks = chunks.len(),
        "indexed document"
    );
    Ok(chunks)
}
