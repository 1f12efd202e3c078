/// A sparse weight vector: strictly increasing column ids with their weights,
/// plus the L2 norm computed once at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
    norm: f32,
}

impl SparseVector {
    /// Build from unordered `(column, weight)` pairs; duplicate columns are summed.
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(col, _)| col);
        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (col, w) in pairs {
            match indices.last() {
                Some(&last) if last == col => {
                    if let Some(v) = values.last_mut() {
                        *v += w;
                    }
                }
                _ => {
                    indices.push(col);
                    values.push(w);
                }
            }
        }
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        Self {
            indices,
            values,
            norm,
        }
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn norm(&self) -> f32 {
        self.norm
    }

    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }

    pub fn get(&self, col: u32) -> Option<f32> {
        self.indices.binary_search(&col).ok().map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Merge-join dot product over the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut acc) = (0usize, 0usize, 0.0f32);
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }

    /// Cosine similarity; a zero-norm side scores 0.0.
    pub fn cosine(&self, other: &SparseVector) -> f32 {
        let denom = self.norm * other.norm;
        if denom == 0.0 || !denom.is_finite() {
            return 0.0;
        }
        self.dot(other) / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn merges_duplicate_columns() {
        let v = SparseVector::from_pairs(vec![(3, 1.0), (1, 2.0), (3, 0.5)]);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(3), Some(1.5));
        assert_eq!(v.iter().map(|(c, _)| c).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn empty_vector_never_matches() {
        let empty = SparseVector::default();
        let v = SparseVector::from_pairs(vec![(0, 1.0)]);
        assert!(empty.is_zero());
        assert_eq!(empty.cosine(&v), 0.0);
        assert_eq!(v.cosine(&empty), 0.0);
    }

    fn sparse_strategy() -> impl Strategy<Value = SparseVector> {
        prop::collection::vec((0u32..64, 0.0f32..10.0), 0..24).prop_map(SparseVector::from_pairs)
    }

    proptest! {
        #[test]
        fn cosine_symmetric(a in sparse_strategy(), b in sparse_strategy()) {
            prop_assert_eq!(a.cosine(&b), b.cosine(&a));
        }

        #[test]
        fn self_cosine_is_one(a in sparse_strategy()) {
            prop_assume!(a.norm() > 1e-3);
            prop_assert!((a.cosine(&a) - 1.0).abs() < 1e-4);
        }
    }
}
