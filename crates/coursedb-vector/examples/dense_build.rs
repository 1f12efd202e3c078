use std::path::Path;

use coursedb_core::config::Config;
use coursedb_core::corpus::load_corpus;
use coursedb_core::documents::build_documents;
use coursedb_core::types::Granularity;
use coursedb_vector::{DenseIndex, EmbeddingCache, LocalProvider};

// Build both dense families for the configured corpus and report cache reuse.
//   APP_USE_FAKE_EMBEDDINGS=1 cargo run -p coursedb-vector --example dense_build

fn main() -> anyhow::Result<()> {
    let settings = Config::load()?.settings()?;
    let records = load_corpus(Path::new(&settings.corpus.path))?;
    let docs = build_documents(&records)?;
    let provider = LocalProvider::new(&settings.embedding)?;
    let mut cache = EmbeddingCache::new();
    for g in [Granularity::Coarse, Granularity::Fine] {
        let batch_size = settings.embedding.batch_size;
        let index = DenseIndex::build(docs.family(g), &provider, batch_size, &mut cache)?;
        println!("{}: rows={} dim={}", g, index.len(), index.dim());
    }
    println!("cached vectors: {}", cache.len());
    Ok(())
}
