use coursedb_core::config::SparseSettings;
use coursedb_core::documents::build_documents;
use coursedb_core::types::Record;
use coursedb_text::SparseIndex;

fn settings() -> SparseSettings {
    SparseSettings::default()
}

fn courses() -> Vec<Record> {
    vec![
        Record::new(
            "02451",
            "Intro to ML",
            vec!["neural networks".into(), "gradient descent".into()],
        ),
        Record::new("02402", "Statistics", vec!["hypothesis testing".into()]),
        Record::new(
            "02450",
            "Machine Learning and Data Mining",
            vec!["neural networks for classification".into()],
        ),
    ]
}

#[test]
fn one_row_per_document_and_dimension_is_vocabulary() {
    let docs = build_documents(&courses()).expect("documents");
    let coarse = SparseIndex::build(&docs.coarse, &settings());
    let fine = SparseIndex::build(&docs.fine, &settings());
    assert_eq!(coarse.len(), docs.coarse.len());
    assert_eq!(fine.len(), docs.fine.len());
    for i in 0..coarse.len() {
        let row = coarse.row(i).expect("row");
        assert!(row.iter().all(|(col, _)| (col as usize) < coarse.vocabulary_size()));
    }
}

#[test]
fn smooth_idf_matches_formula() {
    let texts = ["neural networks", "neural nets", "statistics"];
    let index = SparseIndex::build_from_texts(&texts, &settings());
    let n = 3.0f32;
    let neural = index.idf("neural").expect("neural in vocab");
    assert!((neural - (((1.0 + n) / (1.0 + 2.0)).ln() + 1.0)).abs() < 1e-6);
    let stats = index.idf("statistics").expect("statistics in vocab");
    assert!((stats - (((1.0 + n) / (1.0 + 1.0)).ln() + 1.0)).abs() < 1e-6);
    assert!(index.idf("neural networks").is_some(), "bigrams are indexed");
}

#[test]
fn vocabulary_columns_are_sorted_terms() {
    let index = SparseIndex::build_from_texts(&["zeta alpha", "beta"], &settings());
    assert_eq!(index.column("alpha"), Some(0));
    assert_eq!(index.column("beta"), Some(1));
    assert_eq!(index.column("zeta"), Some(2));
    assert_eq!(index.column("zeta alpha"), Some(3));
}

#[test]
fn max_features_keeps_most_frequent_terms() {
    let s = SparseSettings {
        max_features: 2,
        ..SparseSettings::default()
    };
    let texts = ["common common rare", "common shared", "shared"];
    let index = SparseIndex::build_from_texts(&texts, &s);
    assert_eq!(index.vocabulary_size(), 2);
    assert!(index.column("common").is_some());
    assert!(index.column("shared").is_some());
    assert!(index.column("rare").is_none());
}

#[test]
fn query_encoding_drops_unknown_terms_without_growing_vocabulary() {
    let docs = build_documents(&courses()).expect("documents");
    let index = SparseIndex::build(&docs.coarse, &settings());
    let before = index.vocabulary_size();
    let q = index.encode("quantum chromodynamics");
    assert!(q.is_zero());
    assert_eq!(index.vocabulary_size(), before);
    assert!(index.score_all(&q).iter().all(|&s| s == 0.0));
}

#[test]
fn lexical_match_ranks_expected_record_first() {
    let docs = build_documents(&courses()).expect("documents");
    let index = SparseIndex::build(&docs.coarse, &settings());
    let scores = index.score_all(&index.encode("hypothesis testing"));
    let best = scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(docs.coarse[best].record_id, "02402");
    assert!(scores[best] > 0.0);
}

#[test]
fn stop_word_only_document_gets_zero_vector() {
    let index = SparseIndex::build_from_texts(&["the of and", "gradient descent"], &settings());
    assert!(index.row(0).expect("row").is_zero());
    let scores = index.score_all(&index.encode("the gradient"));
    assert_eq!(scores[0], 0.0);
    assert!(scores[1] > 0.0);
}

#[test]
fn row_self_similarity_is_one() {
    let docs = build_documents(&courses()).expect("documents");
    let index = SparseIndex::build(&docs.fine, &settings());
    for i in 0..index.len() {
        let row = index.row(i).expect("row");
        assert!((row.cosine(row) - 1.0).abs() < 1e-5);
    }
}

#[test]
fn empty_family_builds() {
    let index = SparseIndex::build(&[], &settings());
    assert!(index.is_empty());
    assert_eq!(index.vocabulary_size(), 0);
    assert!(index.score_all(&index.encode("anything")).is_empty());
}
