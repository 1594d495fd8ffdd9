use serde::{Deserialize, Serialize};

use crate::utils::math::vector::ZeroSpVec;

/// Row-major sparse feature matrix.
///
/// Rows are documents in corpus order, columns are vocabulary terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: Vec<ZeroSpVec<f64>>,
    n_cols: usize,
}

impl FeatureMatrix {
    /// # Arguments
    /// * `rows` - one sparse row per document, each of length `n_cols`
    /// * `n_cols` - column count (vocabulary size)
    pub fn new(rows: Vec<ZeroSpVec<f64>>, n_cols: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == n_cols));
        Self { rows, n_cols }
    }

    /// `(rows, columns)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_cols)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn row(&self, index: usize) -> &ZeroSpVec<f64> {
        &self.rows[index]
    }

    #[inline]
    pub fn rows(&self) -> &[ZeroSpVec<f64>] {
        &self.rows
    }

    /// Total stored entries
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.nnz()).sum()
    }

    /// Value at `(row, col)`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row].get(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_and_lookup() {
        let rows = vec![
            ZeroSpVec::from_entries(3, vec![(0, 1.0)]),
            ZeroSpVec::from_entries(3, vec![(2, 2.0)]),
            ZeroSpVec::with_len(3),
        ];
        let m = FeatureMatrix::new(rows, 3);
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(1, 2), 2.0);
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(2, 0), 0.0);
    }
}
