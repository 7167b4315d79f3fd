//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::chunking::{available_strategies, create_strategy};
use crate::cli::output::{
    OutputFormat, format_boundaries, format_report, format_resolution, format_strategies,
};
use crate::cli::parser::{Cli, Commands};
use crate::dataset::{Corpus, load_queries, read_file};
use crate::error::Result;
use crate::matching::{MatcherConfig, SpanMatcher};
use crate::runner::Evaluator;
use crate::store::{MemoryStore, SqliteStore, VectorStore};
use std::path::{Path, PathBuf};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Evaluate {
            corpus,
            queries,
            strategy,
            chunk_size,
            overlap,
            top_k,
            min_similarity,
            length_tolerance,
            db_path,
            collection,
            detail,
        } => cmd_evaluate(&EvaluateArgs {
            corpus_path: corpus.clone(),
            queries_path: queries.clone(),
            strategy: strategy.clone(),
            chunk_size: *chunk_size,
            overlap: *overlap,
            top_k: *top_k,
            min_similarity: *min_similarity,
            length_tolerance: *length_tolerance,
            db_path: db_path.clone(),
            collection: collection.clone(),
            detail: *detail,
            format,
        }),
        Commands::Strategies => cmd_strategies(format),
        Commands::Chunk {
            file,
            strategy,
            chunk_size,
            overlap,
        } => cmd_chunk(file, strategy, *chunk_size, *overlap, format),
        Commands::Resolve {
            file,
            excerpt,
            min_similarity,
            length_tolerance,
        } => cmd_resolve(file, excerpt, *min_similarity, *length_tolerance, format),
    }
}

/// Arguments for the evaluate command.
struct EvaluateArgs {
    corpus_path: PathBuf,
    queries_path: PathBuf,
    strategy: String,
    chunk_size: usize,
    overlap: usize,
    top_k: usize,
    min_similarity: f64,
    length_tolerance: f64,
    db_path: Option<PathBuf>,
    collection: Option<String>,
    detail: bool,
    format: OutputFormat,
}

fn cmd_evaluate(args: &EvaluateArgs) -> Result<String> {
    let corpus = Corpus::load(&args.corpus_path)?;
    let queries = load_queries(&args.queries_path, &corpus)?;
    let strategy = create_strategy(&args.strategy, args.chunk_size, args.overlap)?;

    let matcher_config = MatcherConfig::new()
        .with_min_similarity(args.min_similarity)
        .with_length_tolerance(args.length_tolerance);
    matcher_config.validate()?;

    let collection = args.collection.clone().unwrap_or_else(|| {
        format!("{}_{}_{}", args.strategy, args.chunk_size, args.overlap)
    });

    let store: Box<dyn VectorStore> = match &args.db_path {
        Some(path) => Box::new(SqliteStore::open(path, crate::embedding::create_embedder())?),
        None => Box::new(MemoryStore::new(crate::embedding::create_embedder())),
    };

    let evaluator = Evaluator::new(
        store.as_ref(),
        strategy.as_ref(),
        matcher_config,
        args.top_k,
        collection,
    );
    let report = evaluator.run(&corpus, &queries)?;

    Ok(format_report(&report, args.detail, args.format))
}

fn cmd_strategies(format: OutputFormat) -> Result<String> {
    let mut strategies: Vec<(&str, &str)> = Vec::new();
    for name in available_strategies() {
        let strategy = create_strategy(name, crate::chunking::DEFAULT_CHUNK_SIZE, 0)?;
        strategies.push((name, strategy.description()));
    }
    Ok(format_strategies(&strategies, format))
}

fn cmd_chunk(
    file: &Path,
    strategy_name: &str,
    chunk_size: usize,
    overlap: usize,
    format: OutputFormat,
) -> Result<String> {
    let text = read_file(file)?;
    let strategy = create_strategy(strategy_name, chunk_size, overlap)?;
    let boundaries = strategy.split(&text)?;
    Ok(format_boundaries(&boundaries, format))
}

fn cmd_resolve(
    file: &Path,
    excerpt: &str,
    min_similarity: f64,
    length_tolerance: f64,
    format: OutputFormat,
) -> Result<String> {
    let text = read_file(file)?;
    let matcher = SpanMatcher::new(
        MatcherConfig::new()
            .with_min_similarity(min_similarity)
            .with_length_tolerance(length_tolerance),
    );
    let resolved = matcher.resolve(&text, excerpt)?;
    let matched_text = resolved.as_ref().map(|range| &text[range.clone()]);
    Ok(format_resolution(resolved.as_ref(), matched_text, format))
}
