//! Cosine similarity over dense slices. Zero-norm inputs score a defined 0.0.

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dot of mismatched lengths");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// `cos(a, b)` given precomputed norms. Returns 0.0 when either norm is zero
/// or non-finite.
pub fn cosine_with_norms(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    let denom = a_norm * b_norm;
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    dot(a, b) / denom
}

pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    cosine_with_norms(a, norm(a), b, norm(b))
}
