//! CLI layer for chunkbench.
//!
//! Provides the command-line interface using clap, with commands for
//! evaluating strategies, listing them, and inspecting chunk boundaries
//! and span resolutions.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
