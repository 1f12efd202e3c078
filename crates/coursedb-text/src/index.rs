use std::collections::HashMap;

use tracing::{debug, info};

use coursedb_core::config::SparseSettings;
use coursedb_core::types::Document;

use crate::analyzer::Analyzer;
use crate::vector::SparseVector;

/// TF-IDF vector space over one document family.
///
/// Vocabulary and IDF weights are fixed at build time. Query encoding reuses
/// them and silently drops out-of-vocabulary terms.
#[derive(Clone)]
pub struct SparseIndex {
    analyzer: Analyzer,
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
    rows: Vec<SparseVector>,
}

impl SparseIndex {
    pub fn build(documents: &[Document], settings: &SparseSettings) -> Self {
        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        Self::build_from_texts(&texts, settings)
    }

    pub fn build_from_texts(texts: &[&str], settings: &SparseSettings) -> Self {
        let analyzer = Analyzer::new(settings.min_token_len);
        let per_doc: Vec<HashMap<String, u32>> =
            texts.iter().map(|t| term_counts(&analyzer, t)).collect();

        let mut doc_freq: HashMap<&str, u32> = HashMap::new();
        let mut corpus_freq: HashMap<&str, u64> = HashMap::new();
        for counts in &per_doc {
            for (term, &c) in counts {
                *doc_freq.entry(term.as_str()).or_default() += 1;
                *corpus_freq.entry(term.as_str()).or_default() += u64::from(c);
            }
        }

        let mut kept: Vec<&str> = corpus_freq.keys().copied().collect();
        if settings.max_features > 0 && kept.len() > settings.max_features {
            kept.sort_unstable_by(|a, b| {
                corpus_freq[b]
                    .cmp(&corpus_freq[a])
                    .then_with(|| a.cmp(b))
            });
            kept.truncate(settings.max_features);
        }
        kept.sort_unstable();

        let n = texts.len() as f32;
        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (col, term) in kept.iter().enumerate() {
            vocabulary.insert((*term).to_string(), col as u32);
            idf.push(smooth_idf(n, doc_freq[term] as f32));
        }

        let rows: Vec<SparseVector> = per_doc
            .iter()
            .map(|counts| weigh(counts, &vocabulary, &idf))
            .collect();
        let empty_rows = rows.iter().filter(|r| r.is_zero()).count();
        info!(
            documents = rows.len(),
            vocabulary = vocabulary.len(),
            empty_rows,
            "built sparse index"
        );
        Self {
            analyzer,
            vocabulary,
            idf,
            rows,
        }
    }

    /// Project free text into this index's space; unknown terms contribute nothing.
    pub fn encode(&self, text: &str) -> SparseVector {
        let counts = term_counts(&self.analyzer, text);
        let vector = weigh(&counts, &self.vocabulary, &self.idf);
        debug!(terms = counts.len(), in_vocab = vector.nnz(), "encoded sparse query");
        vector
    }

    /// Cosine of `query` against every row, in family order.
    pub fn score_all(&self, query: &SparseVector) -> Vec<f32> {
        self.rows.iter().map(|row| query.cosine(row)).collect()
    }

    pub fn row(&self, doc: usize) -> Option<&SparseVector> {
        self.rows.get(doc)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn column(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.column(term).map(|c| self.idf[c as usize])
    }
}

/// `ln((1 + n) / (1 + df)) + 1`: never zero, so terms present in every document still count.
fn smooth_idf(n_docs: f32, df: f32) -> f32 {
    ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
}

fn term_counts(analyzer: &Analyzer, text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for term in analyzer.terms(text) {
        *counts.entry(term).or_insert(0u32) += 1;
    }
    counts
}

fn weigh(
    counts: &HashMap<String, u32>,
    vocabulary: &HashMap<String, u32>,
    idf: &[f32],
) -> SparseVector {
    let pairs = counts
        .iter()
        .filter_map(|(term, &tf)| {
            let col = *vocabulary.get(term)?;
            Some((col, tf as f32 * idf[col as usize]))
        })
        .collect();
    SparseVector::from_pairs(pairs)
}
