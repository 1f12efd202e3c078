//! Local embedding provider on top of `coursedb-embed`.
//!
//! Respects `APP_USE_FAKE_EMBEDDINGS=1` (through `get_default_embedder`) to
//! switch to the FakeEmbedder for fast and deterministic outputs.

use anyhow::Result;
use coursedb_core::config::EmbeddingSettings;
use coursedb_core::traits::Embedder as CoreEmbedder;
use coursedb_embed::{get_default_embedder, uses_fake};

use super::EmbedProvider;

pub struct LocalProvider {
    inner: Box<dyn CoreEmbedder>,
    id: String,
}

impl LocalProvider {
    /// Create a provider from settings, loading the configured embedder.
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        let label = if uses_fake(settings) {
            "fake"
        } else {
            settings.model_name.as_str()
        };
        let inner = get_default_embedder(settings)?;
        Ok(Self::from_embedder(inner, label))
    }

    /// Wrap an already constructed embedder under `label`.
    pub fn from_embedder(inner: Box<dyn CoreEmbedder>, label: &str) -> Self {
        let id = format!("local:{}:d{}", label, inner.dim());
        Self { inner, id }
    }
}

impl EmbedProvider for LocalProvider {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn max_len(&self) -> usize {
        self.inner.max_len()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.inner.embed_batch(texts)
    }
}
