//! Batched embedding with a write-through cache.
//!
//! Texts are hashed, cache hits are reused, and only misses are sent to the
//! provider in chunks of `batch_size`. Every returned vector is checked
//! against the provider's dimension.

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::cache::{hash_content, CacheEntry, EmbeddingCache};
use crate::embed_provider::EmbedProvider;

pub fn progress_bar(len: usize, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(label.to_string());
    pb
}

/// Embed `texts` in order, one vector per text.
pub fn embed_texts(
    texts: &[String],
    provider: &dyn EmbedProvider,
    cache: &mut EmbeddingCache,
    batch_size: usize,
    pb: &ProgressBar,
) -> Result<Vec<Vec<f32>>> {
    let batch_size = batch_size.max(1);
    let dim = provider.dim();
    let embedder_id = provider.embedder_id().to_string();
    let mut out: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

    for chunk in texts.chunks(batch_size) {
        let hashes: Vec<String> = chunk.iter().map(|t| hash_content(t)).collect();
        let cache_map = cache.get_many(&embedder_id, &hashes);
        let mut misses: Vec<String> = Vec::new();
        let mut miss_hashes: Vec<String> = Vec::new();
        for (text, h) in chunk.iter().zip(&hashes) {
            if !cache_map.contains_key(h) && !miss_hashes.contains(h) {
                misses.push(text.clone());
                miss_hashes.push(h.clone());
            }
        }
        let mut fresh = std::collections::HashMap::new();
        if !misses.is_empty() {
            let embs = provider.embed_batch(&misses)?;
            if embs.len() != misses.len() {
                return Err(anyhow!(
                    "embedder returned {} vectors for {} texts",
                    embs.len(),
                    misses.len()
                ));
            }
            let mut new_entries = Vec::with_capacity(embs.len());
            for (h, v) in miss_hashes.into_iter().zip(embs) {
                if v.len() != dim {
                    return Err(anyhow!("dim mismatch: got {} expected {}", v.len(), dim));
                }
                new_entries.push(CacheEntry {
                    content_hash: h.clone(),
                    embedder_id: embedder_id.clone(),
                    vector: v.clone(),
                });
                fresh.insert(h, v);
            }
            cache.put_many(new_entries);
        }
        debug!(
            batch = chunk.len(),
            hits = cache_map.len(),
            misses = fresh.len(),
            "embedded batch"
        );
        for h in &hashes {
            let v = cache_map
                .get(h)
                .or_else(|| fresh.get(h))
                .ok_or_else(|| anyhow!("missing vector for content hash {}", h))?;
            out.push(v.clone());
        }
        pb.inc(chunk.len() as u64);
    }
    Ok(out)
}
