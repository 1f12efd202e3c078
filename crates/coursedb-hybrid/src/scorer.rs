use coursedb_core::types::RetrievalMode;
use coursedb_core::{Error, Result};

use crate::encoder::QueryVectors;
use crate::family::FamilyIndex;

/// Score every document of `family`, returning `(document_index, score)` in family order.
pub fn score(
    query: &QueryVectors,
    family: &FamilyIndex,
    mode: RetrievalMode,
) -> Result<Vec<(usize, f32)>> {
    let scores = match mode {
        RetrievalMode::Sparse => sparse_scores(query, family)?,
        RetrievalMode::Dense => dense_scores(query, family)?,
        RetrievalMode::Hybrid { alpha } => {
            check_mode(mode)?;
            let dense = dense_scores(query, family)?;
            let sparse = sparse_scores(query, family)?;
            fuse(&dense, &sparse, alpha)
        }
    };
    Ok(scores.into_iter().enumerate().collect())
}

/// `alpha * dense + (1 - alpha) * sparse`, element-wise.
pub fn fuse(dense: &[f32], sparse: &[f32], alpha: f32) -> Vec<f32> {
    dense.iter().zip(sparse).map(|(d, s)| alpha * d + (1.0 - alpha) * s).collect()
}

/// Rejects a hybrid mode whose alpha is outside `[0.0, 1.0]`.
pub fn check_mode(mode: RetrievalMode) -> Result<()> {
    match mode {
        RetrievalMode::Hybrid { alpha } => check_alpha(alpha),
        RetrievalMode::Sparse | RetrievalMode::Dense => Ok(()),
    }
}

fn check_alpha(alpha: f32) -> Result<()> {
    if alpha.is_nan() || !(0.0..=1.0).contains(&alpha) {
        return Err(Error::invalid(format!("alpha must be within [0.0, 1.0], got {alpha}")));
    }
    Ok(())
}

fn sparse_scores(query: &QueryVectors, family: &FamilyIndex) -> Result<Vec<f32>> {
    let q = query.sparse.as_ref().ok_or_else(|| Error::invalid("query has no sparse vector"))?;
    Ok(family.sparse.score_all(q))
}

fn dense_scores(query: &QueryVectors, family: &FamilyIndex) -> Result<Vec<f32>> {
    let q = query.dense.as_ref().ok_or_else(|| Error::invalid("query has no dense vector"))?;
    Ok(family.dense.score_all(q))
}
