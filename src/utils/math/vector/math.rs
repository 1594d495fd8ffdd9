use std::ops::AddAssign;

use num::Num;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// Dot product with a dense weight vector.
    /// Indices beyond `dense.len()` are ignored.
    #[inline]
    pub fn dot_dense(&self, dense: &[f64]) -> f64
    where
        N: Into<f64>,
    {
        self.raw_iter()
            .filter_map(|(idx, val)| dense.get(idx).map(|w| (*val).into() * w))
            .sum()
    }

    /// `dense += scale * self`
    #[inline]
    pub fn axpy_into(&self, scale: f64, dense: &mut [f64])
    where
        N: Into<f64>,
    {
        for (idx, val) in self.raw_iter() {
            if let Some(slot) = dense.get_mut(idx) {
                *slot += scale * (*val).into();
            }
        }
    }

    #[inline]
    pub fn norm_sq<R>(&self) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        let mut result = R::zero();
        for val in self.values() {
            let v: R = (*val).into();
            result += v * v;
        }
        result
    }
}

impl ZeroSpVec<f64> {
    /// Scale to unit L2 norm. An all-zero vector is left as is.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm_sq::<f64>().sqrt();
        if norm > 0.0 {
            self.map_values(|_, v| v / norm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_helpers() {
        let a = ZeroSpVec::from_entries(3, vec![(0, 1.0), (2, 2.0)]);
        assert!((a.dot_dense(&[3.0, 5.0, 7.0]) - 17.0).abs() < 1e-12);
        let mut w = vec![0.0; 3];
        a.axpy_into(2.0, &mut w);
        assert_eq!(w, vec![2.0, 0.0, 4.0]);
    }

    #[test]
    fn l2_normalize_unit_norm_and_zero_row() {
        let mut a = ZeroSpVec::from_entries(2, vec![(0, 3.0), (1, 4.0)]);
        a.l2_normalize();
        assert!((a.norm_sq::<f64>() - 1.0).abs() < 1e-12);
        let mut z: ZeroSpVec<f64> = ZeroSpVec::with_len(4);
        z.l2_normalize();
        assert_eq!(z.nnz(), 0);
    }
}
