//! Command line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Course retrieval over a JSON corpus: sparse, dense or hybrid.
#[derive(Parser, Debug, Clone)]
#[command(name = "coursedb", version, about)]
pub struct Cli {
    /// Corpus file or directory (overrides `corpus.path`)
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the indices and report their sizes
    Health,

    /// Records most similar to an existing record
    Similar {
        record_id: String,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Free-text search
    Search {
        text: String,
        /// coarse (whole records) or fine (single units)
        #[arg(short, long)]
        granularity: Option<String>,
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Number of results (clamped to `search.max_top_k`)
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    pub top_k: Option<i64>,

    /// sparse | dense | hybrid
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Dense weight for hybrid mode, within [0, 1]
    #[arg(short, long, allow_negative_numbers = true)]
    pub alpha: Option<f32>,
}
