use crate::error::Result;
use crate::types::{Granularity, HealthReport, RetrievalMode, ScoredResult};

/// Text → fixed-length vector. Used identically at build and query time.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}

/// The query surface consumed by presentation layers (HTTP handlers, RAG
/// orchestrators). Implementations are read-only and safe to share.
pub trait Retriever: Send + Sync {
    fn similar(
        &self,
        record_id: &str,
        top_k: usize,
        mode: RetrievalMode,
    ) -> Result<Vec<ScoredResult>>;
    fn search(
        &self,
        query: &str,
        top_k: usize,
        mode: RetrievalMode,
        granularity: Granularity,
    ) -> Result<Vec<ScoredResult>>;
    fn health(&self) -> Result<HealthReport>;
}
