use coursedb_core::config::EmbeddingSettings;
use coursedb_core::similarity::cosine;
use coursedb_core::traits::Embedder;
use coursedb_embed::{get_default_embedder, FakeEmbedder};

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading large model
    let settings = EmbeddingSettings {
        use_fake: true,
        fake_dim: 256,
        ..EmbeddingSettings::default()
    };

    let embedder = get_default_embedder(&settings).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 256, "embedding dim follows settings");
    assert_eq!(embedder.dim(), 256);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "fake vectors are unit length (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn fake_embedder_is_case_and_punctuation_insensitive() {
    let e = FakeEmbedder::new(128);
    let a = e.embed_text("Machine Learning!").expect("a");
    let b = e.embed_text("machine learning").expect("b");
    assert!((cosine(&a, &b) - 1.0).abs() < 1e-5);
}

#[test]
fn shared_tokens_score_higher_than_disjoint() {
    let e = FakeEmbedder::new(1024);
    let q = e.embed_text("gradient descent").expect("q");
    let near = e.embed_text("stochastic gradient descent").expect("near");
    let far = e.embed_text("hypothesis testing").expect("far");
    assert!(cosine(&q, &near) > cosine(&q, &far));
}

#[test]
fn empty_batch_is_empty() {
    let e = FakeEmbedder::new(8);
    assert!(e.embed_batch(&[]).expect("batch").is_empty());
}
