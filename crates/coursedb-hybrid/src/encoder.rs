use coursedb_core::types::RetrievalMode;
use coursedb_core::{Error, Result};
use coursedb_text::SparseVector;
use coursedb_vector::EmbedProvider;

use crate::family::FamilyIndex;

/// A query projected into one family's spaces. A side is `None` when the
/// mode in use does not read it.
#[derive(Debug, Clone, Default)]
pub struct QueryVectors {
    pub sparse: Option<SparseVector>,
    pub dense: Option<Vec<f32>>,
}

/// Trimmed query text, or `EmptyQuery`.
pub fn check_query(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyQuery);
    }
    Ok(trimmed)
}

/// Encode only the spaces `mode` scores with; sparse mode never calls the embedder.
pub fn encode_for(
    text: &str,
    family: &FamilyIndex,
    provider: &dyn EmbedProvider,
    mode: RetrievalMode,
) -> Result<QueryVectors> {
    let text = check_query(text)?;
    let sparse = if mode.needs_sparse() {
        Some(family.sparse.encode(text))
    } else {
        None
    };
    let dense = if mode.needs_dense() {
        Some(family.dense.encode_query(provider, text)?)
    } else {
        None
    };
    Ok(QueryVectors { sparse, dense })
}
