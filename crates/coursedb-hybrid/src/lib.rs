//! coursedb-hybrid
//!
//! The query path: encode a query into a family's sparse and dense spaces,
//! fuse the cosine scores by mode, rank, and expose it all through
//! [`HybridRetriever`] and the lazily populated [`RetrieverHandle`].

pub mod encoder;
pub mod family;
pub mod handle;
pub mod ranker;
pub mod retriever;
pub mod scorer;

pub use encoder::{encode_for, QueryVectors};
pub use family::FamilyIndex;
pub use handle::RetrieverHandle;
pub use retriever::HybridRetriever;
