use std::sync::atomic::{AtomicUsize, Ordering};

use coursedb_core::documents::{build_documents, DocumentSet};
use coursedb_core::similarity::cosine;
use coursedb_core::types::{Granularity, Record};
use coursedb_core::Error;
use coursedb_embed::FakeEmbedder;
use coursedb_vector::{DenseIndex, EmbedProvider, EmbeddingCache, LocalProvider};

fn records() -> Vec<Record> {
    vec![
        Record::new(
            "01005",
            "Advanced Engineering Mathematics",
            vec!["Solve differential equations".into(), "Use linear algebra".into()],
        ),
        Record::new(
            "02450",
            "Introduction to Machine Learning",
            vec!["Apply gradient descent".into()],
        ),
        Record::new("02451", "Machine Learning Foundations", vec![]),
    ]
}

fn provider(dim: usize) -> LocalProvider {
    LocalProvider::from_embedder(Box::new(FakeEmbedder::new(dim)), "fake")
}

/// Coarse family index with a fresh cache.
fn coarse_index(
    docs: &DocumentSet,
    provider: &dyn EmbedProvider,
    batch_size: usize,
) -> anyhow::Result<DenseIndex> {
    let family = docs.family(Granularity::Coarse);
    DenseIndex::build(family, provider, batch_size, &mut EmbeddingCache::new())
}

/// Counts how many texts reach the embedder.
struct Counting {
    inner: LocalProvider,
    calls: AtomicUsize,
}

impl Counting {
    fn new(dim: usize) -> Self {
        Self {
            inner: provider(dim),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbedProvider for Counting {
    fn embedder_id(&self) -> &str {
        self.inner.embedder_id()
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn max_len(&self) -> usize {
        self.inner.max_len()
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }
}

/// Returns vectors of the wrong width.
struct Broken;

impl EmbedProvider for Broken {
    fn embedder_id(&self) -> &str {
        "broken"
    }

    fn dim(&self) -> usize {
        8
    }

    fn max_len(&self) -> usize {
        8
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0; 3]).collect())
    }
}

/// Returns the same non-unit vector for every text.
struct Fixed;

impl EmbedProvider for Fixed {
    fn embedder_id(&self) -> &str {
        "fixed"
    }

    fn dim(&self) -> usize {
        2
    }

    fn max_len(&self) -> usize {
        8
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![3.0, 4.0]).collect())
    }
}

#[test]
fn provider_id_names_label_and_dim() {
    assert_eq!(provider(64).embedder_id(), "local:fake:d64");
}

#[test]
fn builds_one_row_per_document() {
    let docs = build_documents(&records()).expect("docs");
    let p = provider(64);
    let mut cache = EmbeddingCache::new();
    let coarse =
        DenseIndex::build(docs.family(Granularity::Coarse), &p, 2, &mut cache).expect("coarse");
    let fine = DenseIndex::build(docs.family(Granularity::Fine), &p, 2, &mut cache).expect("fine");
    assert_eq!(coarse.len(), 3);
    assert_eq!(fine.len(), 3);
    assert_eq!(coarse.dim(), 64);
    assert_eq!(coarse.embedder_id(), "local:fake:d64");
}

#[test]
fn rows_match_direct_embedding() {
    let docs = build_documents(&records()).expect("docs");
    let p = provider(32);
    let index = coarse_index(&docs, &p, 1).expect("index");
    let direct = p.embed_batch(&[docs.coarse[1].text.clone()]).expect("embed");
    assert!((cosine(index.row(1).expect("row"), &direct[0]) - 1.0).abs() < 1e-5);
    assert!(index.row(3).is_none());
}

#[test]
fn cache_skips_repeated_texts() {
    let docs = build_documents(&records()).expect("docs");
    let p = Counting::new(32);
    let mut cache = EmbeddingCache::new();
    DenseIndex::build(docs.family(Granularity::Coarse), &p, 8, &mut cache).expect("coarse");
    assert_eq!(p.calls(), 3);
    DenseIndex::build(docs.family(Granularity::Fine), &p, 8, &mut cache).expect("fine");
    assert_eq!(p.calls(), 6);
    DenseIndex::build(docs.family(Granularity::Coarse), &p, 8, &mut cache).expect("again");
    assert_eq!(p.calls(), 6);
    assert_eq!(cache.len(), 6);
}

#[test]
fn identical_texts_embed_once() {
    let twins = vec![
        Record::new("A1", "Same Title", vec![]),
        Record::new("B2", "Same Title", vec![]),
    ];
    let docs = build_documents(&twins).expect("docs");
    let p = Counting::new(16);
    let index = coarse_index(&docs, &p, 8).expect("index");
    assert_eq!(index.len(), 2);
    assert_eq!(p.calls(), 1);
    assert_eq!(index.row(0), index.row(1));
}

#[test]
fn wrong_dimension_fails_the_build() {
    let docs = build_documents(&records()).expect("docs");
    let err = coarse_index(&docs, &Broken, 4).unwrap_err();
    assert!(err.to_string().contains("dim mismatch"), "{err}");
}

#[test]
fn query_scores_follow_shared_tokens() {
    let docs = build_documents(&records()).expect("docs");
    let p = provider(1024);
    let index = coarse_index(&docs, &p, 4).expect("index");
    let q = index.encode_query(&p, "differential equations").expect("query");
    let scores = index.score_all(&q);
    assert_eq!(scores.len(), 3);
    assert!(scores[0] > scores[1] && scores[0] > scores[2], "{scores:?}");
    assert!(scores.iter().all(|s| (-1.0..=1.0 + 1e-6).contains(s)));
}

#[test]
fn query_from_other_provider_is_refused() {
    let docs = build_documents(&records()).expect("docs");
    let index = coarse_index(&docs, &provider(32), 4).expect("index");
    match index.encode_query(&provider(16), "anything") {
        Err(Error::ProviderMismatch { expected, actual }) => {
            assert_eq!(expected, "local:fake:d32");
            assert_eq!(actual, "local:fake:d16");
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn stored_rows_are_not_normalized() {
    let docs = build_documents(&records()).expect("docs");
    let index = coarse_index(&docs, &Fixed, 2).expect("index");
    for i in 0..index.len() {
        assert_eq!(index.row(i), Some(&[3.0f32, 4.0][..]));
    }
    // Scoring normalizes on the fly: a parallel query still scores 1.0.
    let scores = index.score_all(&[0.6, 0.8]);
    assert!(scores.iter().all(|s| (s - 1.0).abs() < 1e-6), "{scores:?}");
    assert_eq!(index.row(0), Some(&[3.0f32, 4.0][..]));

    let raw = DenseIndex::from_vectors("x", 2, vec![vec![3.0, 4.0], vec![-0.5, 10.0]])
        .expect("raw");
    assert_eq!(raw.row(1), Some(&[-0.5f32, 10.0][..]));
}

#[test]
fn zero_query_scores_zero() {
    let rows = vec![vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]];
    let index = DenseIndex::from_vectors("x", 3, rows).expect("index");
    assert_eq!(index.score_all(&[0.0, 0.0, 0.0]), vec![0.0, 0.0]);
    assert_eq!(index.score_all(&[2.0, 0.0, 0.0]), vec![1.0, 0.0]);
    assert!(DenseIndex::from_vectors("x", 3, vec![vec![1.0]]).is_err());
}
