//! In-memory dense index: one embedding row per document, stored row-major
//! with precomputed norms for cosine scoring.

use anyhow::{anyhow, Result};
use tracing::info;

use coursedb_core::similarity::{cosine_with_norms, norm};
use coursedb_core::types::Document;
use coursedb_core::Error;

use crate::backfill::{embed_texts, progress_bar};
use crate::cache::EmbeddingCache;
use crate::embed_provider::EmbedProvider;

#[derive(Debug, Clone)]
pub struct DenseIndex {
    embedder_id: String,
    dim: usize,
    data: Vec<f32>,
    norms: Vec<f32>,
}

impl DenseIndex {
    /// Embed every document text with `provider`, reusing `cache` across calls.
    pub fn build(
        documents: &[Document],
        provider: &dyn EmbedProvider,
        batch_size: usize,
        cache: &mut EmbeddingCache,
    ) -> Result<Self> {
        let family = documents
            .first()
            .map(|d| d.granularity.family_name())
            .unwrap_or("empty");
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let pb = progress_bar(texts.len(), &format!("{family} embeddings"));
        let vectors = embed_texts(&texts, provider, cache, batch_size, &pb)?;
        pb.finish_and_clear();
        let index = Self::from_vectors(provider.embedder_id(), provider.dim(), vectors)?;
        info!(
            family,
            rows = index.len(),
            dim = index.dim,
            embedder = %index.embedder_id,
            "dense index built"
        );
        Ok(index)
    }

    pub fn from_vectors(embedder_id: &str, dim: usize, vectors: Vec<Vec<f32>>) -> Result<Self> {
        let mut data = Vec::with_capacity(vectors.len() * dim);
        let mut norms = Vec::with_capacity(vectors.len());
        for (i, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(anyhow!("row {} has dim {} expected {}", i, v.len(), dim));
            }
            norms.push(norm(v));
            data.extend_from_slice(v);
        }
        Ok(Self {
            embedder_id: embedder_id.to_string(),
            dim,
            data,
            norms,
        })
    }

    pub fn len(&self) -> usize {
        self.norms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn embedder_id(&self) -> &str {
        &self.embedder_id
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.len() {
            return None;
        }
        Some(&self.data[i * self.dim..(i + 1) * self.dim])
    }

    /// Encode a query with the same provider the index was built with.
    pub fn encode_query(
        &self,
        provider: &dyn EmbedProvider,
        text: &str,
    ) -> coursedb_core::Result<Vec<f32>> {
        if provider.embedder_id() != self.embedder_id {
            return Err(Error::ProviderMismatch {
                expected: self.embedder_id.clone(),
                actual: provider.embedder_id().to_string(),
            });
        }
        let mut embs = provider
            .embed_batch(&[text.to_string()])
            .map_err(|e| Error::Embedding(format!("{e:#}")))?;
        let v = embs.pop().ok_or_else(|| Error::Embedding("embedder returned no vector".into()))?;
        if v.len() != self.dim {
            return Err(Error::Embedding(format!("query dim {} expected {}", v.len(), self.dim)));
        }
        Ok(v)
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn score_all(&self, query: &[f32]) -> Vec<f32> {
        if self.dim == 0 {
            return vec![0.0; self.len()];
        }
        let qn = norm(query);
        self.data
            .chunks_exact(self.dim)
            .zip(&self.norms)
            .map(|(row, &rn)| cosine_with_norms(query, qn, row, rn))
            .collect()
    }
}
