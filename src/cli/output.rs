//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats. Summary output always carries
//! the completeness counts next to the headline metrics.

use crate::core::RunSummary;
use crate::error::Error;
use crate::runner::RunReport;
use serde::Serialize;
use std::fmt::Write;
use std::ops::Range;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a run report.
///
/// With `detail`, per-query metrics and failure lists are included;
/// otherwise only the summary is rendered.
#[must_use]
pub fn format_report(report: &RunReport, detail: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_report_text(report, detail),
        OutputFormat::Json => {
            if detail {
                format_json(report)
            } else {
                format_json(&report.summary)
            }
        }
    }
}

fn format_report_text(report: &RunReport, detail: bool) -> String {
    let mut output = format_summary_text(&report.summary);

    if detail {
        if !report.query_metrics.is_empty() {
            output.push('\n');
            output.push_str("Per-query metrics:\n");
            let _ = writeln!(
                output,
                "{:<16} {:>10} {:>10} {:>10}",
                "Query", "Precision", "Recall", "IoU"
            );
            output.push_str(&"-".repeat(50));
            output.push('\n');
            for metrics in &report.query_metrics {
                let _ = writeln!(
                    output,
                    "{:<16} {:>10.4} {:>10.4} {:>10.4}",
                    truncate(&metrics.query_id, 16),
                    metrics.precision,
                    metrics.recall,
                    metrics.intersection_over_union
                );
            }
        }

        if !report.unresolved.is_empty() {
            output.push('\n');
            let _ = writeln!(output, "Unresolved queries: {}", report.unresolved.join(", "));
        }

        for failure in &report.failures {
            let _ = writeln!(output, "Failed: {} ({})", failure.query_id, failure.reason);
        }

        for skipped in &report.skipped {
            let _ = writeln!(output, "Skipped: {} ({})", skipped.document_id, skipped.reason);
        }
    }

    output
}

/// Formats a run summary as text.
#[must_use]
pub fn format_summary_text(summary: &RunSummary) -> String {
    let mut output = String::new();
    output.push_str("Evaluation Summary\n");
    output.push_str("==================\n\n");
    let _ = writeln!(output, "  Strategy:     {}", summary.strategy);
    let _ = writeln!(output, "  Corpus:       {}", summary.corpus);
    let _ = writeln!(output, "  Top-k:        {}", summary.top_k);
    output.push('\n');
    let _ = writeln!(
        output,
        "  Precision:    {:.4} (std {:.4})",
        summary.precision.mean, summary.precision.std_dev
    );
    let _ = writeln!(
        output,
        "  Recall:       {:.4} (std {:.4})",
        summary.recall.mean, summary.recall.std_dev
    );
    let _ = writeln!(
        output,
        "  IoU:          {:.4} (std {:.4})",
        summary.iou.mean, summary.iou.std_dev
    );
    output.push('\n');
    let _ = writeln!(output, "  Scored queries:      {}", summary.scored_queries);
    let _ = writeln!(
        output,
        "  Unresolved queries:  {} ({:.1}%)",
        summary.unresolved_queries,
        summary.unresolved_fraction * 100.0
    );
    let _ = writeln!(output, "  Failed queries:      {}", summary.failed_queries);
    let _ = writeln!(output, "  Skipped documents:   {}", summary.skipped_documents);
    let _ = writeln!(
        output,
        "  Unresolved excerpts: {}",
        summary.unresolved_excerpts
    );
    if summary.incomplete {
        output.push_str("\n  WARNING: run incomplete (vector store failed mid-run)\n");
    }
    output
}

/// Formats the strategy listing.
#[must_use]
pub fn format_strategies(strategies: &[(&str, &str)], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str("Available strategies:\n");
            for (name, description) in strategies {
                let _ = writeln!(output, "  {name:<12} {description}");
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Strategy<'a> {
                name: &'a str,
                description: &'a str,
            }
            let list: Vec<Strategy<'_>> = strategies
                .iter()
                .map(|&(name, description)| Strategy { name, description })
                .collect();
            format_json(&list)
        }
    }
}

/// Formats chunk boundaries produced by a strategy.
#[must_use]
pub fn format_boundaries(boundaries: &[Range<usize>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{} chunks:", boundaries.len());
            for (i, range) in boundaries.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "  [{i}] {}..{} ({} bytes)",
                    range.start,
                    range.end,
                    range.end - range.start
                );
            }
            output
        }
        OutputFormat::Json => {
            let pairs: Vec<(usize, usize)> =
                boundaries.iter().map(|r| (r.start, r.end)).collect();
            format_json(&pairs)
        }
    }
}

/// Formats a span resolution result.
#[must_use]
pub fn format_resolution(
    resolved: Option<&Range<usize>>,
    matched_text: Option<&str>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => resolved.map_or_else(
            || "Excerpt not found above the similarity threshold.\n".to_string(),
            |range| {
                let mut output = String::new();
                let _ = writeln!(output, "Resolved span: {}..{}", range.start, range.end);
                if let Some(text) = matched_text {
                    let _ = writeln!(output, "  {}", truncate(&text.replace('\n', "\\n"), 70));
                }
                output
            },
        ),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Resolution<'a> {
                resolved: bool,
                start: Option<usize>,
                end: Option<usize>,
                matched_text: Option<&'a str>,
            }
            format_json(&Resolution {
                resolved: resolved.is_some(),
                start: resolved.map(|r| r.start),
                end: resolved.map(|r| r.end),
                matched_text,
            })
        }
    }
}

/// Formats an error for the selected output format.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{cut}...")
    }
}
