//! Core domain types for chunkbench.
//!
//! Documents and reference excerpts are read-only evaluation inputs; chunks,
//! resolved spans and metrics are created by the core for the lifetime of one
//! evaluation run.

pub mod chunk;
pub mod document;
pub mod metrics;
pub mod reference;

pub use chunk::Chunk;
pub use document::{Document, find_char_boundary};
pub use metrics::{MetricSummary, QueryMetrics, RunSummary};
pub use reference::{ReferenceExcerpt, ResolvedSpan};
