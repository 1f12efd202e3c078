//! coursedb-vector
//!
//! Dense side of the retriever: embedding providers, a content-hash cache
//! and the in-memory dense index.

pub mod backfill;
pub mod cache;
pub mod embed_provider;
pub mod index;

pub use cache::EmbeddingCache;
pub use embed_provider::{local::LocalProvider, EmbedProvider};
pub use index::DenseIndex;
