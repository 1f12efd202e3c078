//! In-memory embedding cache keyed by `(embedder_id, content_hash)`.
//!
//! Consulted before calling a provider and written through on misses, so a
//! text shared by several documents (or by both index families) is embedded once.

use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub content_hash: String,
    pub embedder_id: String,
    pub vector: Vec<f32>,
}

pub fn hash_content(s: &str) -> String {
    blake3::hash(s.as_bytes()).to_hex().to_string()
}

#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: HashMap<(String, String), Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached vectors for `hashes` under `embedder_id`, keyed by hash. Misses are absent.
    pub fn get_many(&self, embedder_id: &str, hashes: &[String]) -> HashMap<String, Vec<f32>> {
        let mut out = HashMap::new();
        for h in hashes {
            if let Some(v) = self.entries.get(&(embedder_id.to_string(), h.clone())) {
                out.insert(h.clone(), v.clone());
            }
        }
        out
    }

    pub fn put_many(&mut self, entries: Vec<CacheEntry>) {
        for e in entries {
            self.entries.insert((e.embedder_id, e.content_hash), e.vector);
        }
    }
}
