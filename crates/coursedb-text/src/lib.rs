//! coursedb-text
//!
//! Sparse lexical retrieval: a tantivy-analyzer tokenizer (unigrams + bigrams)
//! feeding an in-memory TF-IDF vector space with cosine scoring.

pub mod analyzer;
pub mod index;
pub mod vector;

pub use analyzer::Analyzer;
pub use index::SparseIndex;
pub use vector::SparseVector;
