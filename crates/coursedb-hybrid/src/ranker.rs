use std::cmp::Ordering;

use coursedb_core::{Error, Result};

/// Best `top_k` (clamped to `max_top_k`) by descending score. Equal scores
/// keep their input order.
pub fn rank(
    scored: Vec<(usize, f32)>,
    top_k: usize,
    max_top_k: usize,
) -> Result<Vec<(usize, f32)>> {
    rank_excluding(scored, top_k, max_top_k, |_| false)
}

/// Like [`rank`], dropping documents for which `exclude` holds before truncating.
pub fn rank_excluding<F>(
    scored: Vec<(usize, f32)>,
    top_k: usize,
    max_top_k: usize,
    exclude: F,
) -> Result<Vec<(usize, f32)>>
where
    F: Fn(usize) -> bool,
{
    if top_k == 0 {
        return Err(Error::invalid("top_k must be a positive integer, got 0"));
    }
    let k = top_k.min(max_top_k.max(1));
    let mut kept: Vec<(usize, f32)> = scored
        .into_iter()
        .filter(|(doc, _)| !exclude(*doc))
        .collect();
    kept.sort_by(|a, b| descending(a.1, b.1));
    kept.truncate(k);
    Ok(kept)
}

// NaN sorts last.
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
