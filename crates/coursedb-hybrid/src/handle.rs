use std::sync::{Arc, OnceLock};

use tracing::info;

use coursedb_core::config::Settings;
use coursedb_core::traits::Retriever;
use coursedb_core::types::{Granularity, HealthReport, Record, RetrievalMode, ScoredResult};
use coursedb_core::{Error, Result};
use coursedb_vector::EmbedProvider;

use crate::retriever::HybridRetriever;

/// Shared handle to a retriever that may not be built yet.
///
/// Starts empty; every query fails with `IndexNotReady` until a fully built
/// retriever is installed. Installation happens at most once.
#[derive(Clone, Default)]
pub struct RetrieverHandle {
    slot: Arc<OnceLock<HybridRetriever>>,
}

impl RetrieverHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn get(&self) -> Result<&HybridRetriever> {
        self.slot.get().ok_or(Error::IndexNotReady)
    }

    pub fn install(&self, retriever: HybridRetriever) -> Result<()> {
        self.slot
            .set(retriever)
            .map_err(|_| Error::BuildFailure("a retriever is already installed".into()))
    }

    /// Build on a blocking worker and install the result.
    pub async fn build_in_background(
        &self,
        records: Vec<Record>,
        provider: Arc<dyn EmbedProvider>,
        settings: Settings,
    ) -> Result<()> {
        if self.is_ready() {
            return Err(Error::BuildFailure("a retriever is already installed".into()));
        }
        let build = move || HybridRetriever::build(records, provider, &settings);
        let retriever = tokio::task::spawn_blocking(build)
            .await
            .map_err(Error::build)??;
        self.install(retriever)?;
        info!("retriever installed");
        Ok(())
    }

    pub async fn search_async(
        &self,
        query: String,
        top_k: usize,
        mode: RetrievalMode,
        granularity: Granularity,
    ) -> Result<Vec<ScoredResult>> {
        self.get()?;
        let slot = Arc::clone(&self.slot);
        tokio::task::spawn_blocking(move || {
            let retriever = slot.get().ok_or(Error::IndexNotReady)?;
            retriever.search(&query, top_k, mode, granularity)
        })
        .await
        .map_err(|e| Error::Embedding(format!("query worker failed: {e}")))?
    }

    pub async fn similar_async(
        &self,
        record_id: String,
        top_k: usize,
        mode: RetrievalMode,
    ) -> Result<Vec<ScoredResult>> {
        self.get()?;
        let slot = Arc::clone(&self.slot);
        tokio::task::spawn_blocking(move || {
            let retriever = slot.get().ok_or(Error::IndexNotReady)?;
            retriever.similar(&record_id, top_k, mode)
        })
        .await
        .map_err(|e| Error::Embedding(format!("query worker failed: {e}")))?
    }
}

impl Retriever for RetrieverHandle {
    fn similar(
        &self,
        record_id: &str,
        top_k: usize,
        mode: RetrievalMode,
    ) -> Result<Vec<ScoredResult>> {
        self.get()?.similar(record_id, top_k, mode)
    }

    fn search(
        &self,
        query: &str,
        top_k: usize,
        mode: RetrievalMode,
        granularity: Granularity,
    ) -> Result<Vec<ScoredResult>> {
        self.get()?.search(query, top_k, mode, granularity)
    }

    fn health(&self) -> Result<HealthReport> {
        self.get()?.health()
    }
}
