//! coursedb: build the course indices from a corpus and query them.
//!
//! ```bash
//! coursedb health
//! coursedb search "machine learning" -k 5 --mode hybrid --alpha 0.4
//! coursedb search "gradient descent" --granularity fine --json
//! coursedb similar 02451 --mode sparse
//! ```
//!
//! Indices are built in memory on every start. Set `APP_USE_FAKE_EMBEDDINGS=1`
//! to run without a local model.

mod args;
mod output;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use coursedb_core::config::{expand_path, Config, EmbeddingSettings, Settings};
use coursedb_core::corpus::load_corpus;
use coursedb_core::traits::Retriever;
use coursedb_core::types::{parse_top_k, Granularity, RetrievalMode};
use coursedb_core::Error;
use coursedb_hybrid::RetrieverHandle;
use coursedb_vector::{EmbedProvider, LocalProvider};

use args::{Cli, Command, QueryArgs};
use output::JsonOutput;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = Config::load()?.settings()?;
    let corpus_path = cli
        .corpus
        .clone()
        .unwrap_or_else(|| expand_path(&settings.corpus.path));
    let handle = build(&corpus_path, &settings).await?;

    match &cli.command {
        Command::Health => {
            let report = handle.health()?;
            let out = if cli.json {
                output::format_health_json(&report)
            } else {
                output::format_health(&report)
            };
            println!("{out}");
        }
        Command::Similar { record_id, query } => {
            let (top_k, mode) = resolve_query(query, &settings)?;
            let results = handle.similar_async(record_id.clone(), top_k, mode).await?;
            if cli.json {
                let mut json = JsonOutput::new(mode, top_k, &results);
                json.record_id = Some(record_id.as_str());
                println!("{}", json.render());
            } else {
                let header = format!("records like {record_id} ({mode})");
                println!("{}", output::format_human(&header, &results));
            }
        }
        Command::Search {
            text,
            granularity,
            query,
        } => {
            let (top_k, mode) = resolve_query(query, &settings)?;
            let granularity: Granularity = granularity.as_deref().unwrap_or("coarse").parse()?;
            let results = handle
                .search_async(text.clone(), top_k, mode, granularity)
                .await?;
            if cli.json {
                let mut json = JsonOutput::new(mode, top_k, &results);
                json.query = Some(text.as_str());
                json.granularity = Some(granularity.family_name());
                println!("{}", json.render());
            } else {
                let header = format!("\"{text}\" ({mode}, {granularity})");
                println!("{}", output::format_human(&header, &results));
            }
        }
    }
    Ok(())
}

async fn build(corpus_path: &Path, settings: &Settings) -> Result<RetrieverHandle> {
    info!(corpus = %corpus_path.display(), "loading corpus");
    let records = load_corpus(corpus_path)
        .with_context(|| format!("loading corpus from {}", corpus_path.display()))?;
    let provider = load_provider(&settings.embedding).await?;
    info!(embedder = provider.embedder_id(), dim = provider.dim(), "embedding provider ready");
    let handle = RetrieverHandle::new();
    handle
        .build_in_background(records, Arc::new(provider), settings.clone())
        .await?;
    Ok(handle)
}

/// Model loading reads weights from disk; keep it off the runtime threads.
async fn load_provider(settings: &EmbeddingSettings) -> Result<LocalProvider> {
    let embedding = settings.clone();
    let provider = tokio::task::spawn_blocking(move || LocalProvider::new(&embedding))
        .await
        .context("embedding provider loader panicked")?
        .map_err(Error::build)?;
    Ok(provider)
}

/// Apply configured defaults, then validate at the boundary.
fn resolve_query(query: &QueryArgs, settings: &Settings) -> Result<(usize, RetrievalMode)> {
    let raw_top_k = query.top_k.unwrap_or(settings.search.default_top_k as i64);
    let top_k = parse_top_k(raw_top_k, settings.search.max_top_k)?;
    let mode = RetrievalMode::from_parts(
        query.mode.as_deref().unwrap_or(&settings.search.default_mode),
        query.alpha.unwrap_or(settings.search.default_alpha),
    )?;
    Ok((top_k, mode))
}
