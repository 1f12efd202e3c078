use coursedb_core::config::EmbeddingSettings;
use coursedb_core::traits::Embedder;
use coursedb_embed::get_default_embedder;

// Embed two strings with the configured model (or the fake one with APP_USE_FAKE_EMBEDDINGS=1).
//   cargo run -p coursedb-embed --example embed

fn main() -> anyhow::Result<()> {
    let embedder = get_default_embedder(&EmbeddingSettings::default())?;
    let texts = vec!["machine learning".to_string(), "maskinlæring".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={}", embs.len(), embedder.dim());
    Ok(())
}
