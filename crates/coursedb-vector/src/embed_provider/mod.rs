//! Embedding provider abstraction used by the dense index build.
//!
//! A provider wraps an embedder together with a stable identifier. The index
//! remembers the identifier it was built with and refuses queries encoded by
//! a different one.

use anyhow::Result;

pub trait EmbedProvider: Send + Sync {
    /// Stable identifier for the provider/model (e.g., `local:fake:d384`).
    fn embedder_id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Maximum token length for this provider.
    fn max_len(&self) -> usize;
    /// Compute embeddings for a batch of input texts, one vector per text.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

pub mod local;
