pub mod math;

use std::fmt::Debug;

use num::Num;
use serde::{Deserialize, Serialize};

/// ZeroSpVec is a sparse vector that stores only its non-zero elements.
/// It holds `inds` (element index) and `vals` (element value) side by side.
///
/// Elements are guaranteed to be sorted by ascending index with no duplicates,
/// and no stored value is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num,
{
    len: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// Create an all-zero vector of logical length `len`
    #[inline]
    pub fn with_len(len: usize) -> Self {
        ZeroSpVec {
            len,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Create an empty vector that can hold `nnz` non-zero entries without reallocating
    #[inline]
    pub fn with_capacity(len: usize, nnz: usize) -> Self {
        ZeroSpVec {
            len,
            inds: Vec::with_capacity(nnz),
            vals: Vec::with_capacity(nnz),
        }
    }

    /// Build a vector from unordered `(index, value)` pairs.
    /// Duplicate indices are summed and zero values are dropped.
    ///
    /// # Arguments
    /// * `len` - logical length
    /// * `entries` - pairs, every index must be `< len`
    pub fn from_entries(len: usize, mut entries: Vec<(u32, N)>) -> Self {
        entries.sort_unstable_by_key(|&(idx, _)| idx);
        let mut vec = Self::with_capacity(len, entries.len());
        for (idx, val) in entries {
            debug_assert!((idx as usize) < len, "index out of bounds");
            match vec.inds.last() {
                Some(&last) if last == idx => {
                    // 同じインデックスは加算
                    if let Some(v) = vec.vals.last_mut() {
                        *v = *v + val;
                    }
                }
                _ => {
                    vec.inds.push(idx);
                    vec.vals.push(val);
                }
            }
        }
        vec.drop_zeros();
        vec
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of stored (non-zero) elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.vals.len()
    }

    /// Value at logical `index`, zero when not stored
    #[inline]
    pub fn get(&self, index: usize) -> N {
        if index >= self.len {
            return N::zero();
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.inds
    }

    #[inline]
    pub fn values(&self) -> &[N] {
        &self.vals
    }

    /// Iterate stored `(index, value)` pairs in index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, &N)> + '_ {
        self.inds.iter().map(|&i| i as usize).zip(self.vals.iter())
    }

    /// Apply `f` to each stored value; values that become zero are removed
    pub fn map_values<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, N) -> N,
    {
        for (idx, val) in self.inds.iter().zip(self.vals.iter_mut()) {
            *val = f(*idx as usize, *val);
        }
        self.drop_zeros();
    }

    fn drop_zeros(&mut self) {
        if self.vals.iter().all(|v| *v != N::zero()) {
            return;
        }
        let mut write = 0;
        for read in 0..self.vals.len() {
            if self.vals[read] != N::zero() {
                self.inds[write] = self.inds[read];
                self.vals[write] = self.vals[read];
                write += 1;
            }
        }
        self.inds.truncate(write);
        self.vals.truncate(write);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_entries_sorts_merges_and_drops_zeros() {
        let v = ZeroSpVec::from_entries(6, vec![(4, 1.0), (1, 2.0), (4, 2.0), (3, 0.0)]);
        assert_eq!(v.len(), 6);
        assert_eq!(v.indices(), &[1, 4]);
        assert_eq!(v.values(), &[2.0, 3.0]);
        assert_eq!(v.get(3), 0.0);
        assert_eq!(v.get(100), 0.0);
    }

    #[test]
    fn map_values_removes_new_zeros() {
        let mut v = ZeroSpVec::from_entries(3, vec![(0, 1.0), (1, 2.0), (2, 3.0)]);
        assert_eq!(v.nnz(), 3);
        v.map_values(|i, x| if i == 1 { 0.0 } else { x * 2.0 });
        assert_eq!(v.indices(), &[0, 2]);
        assert_eq!(v.values(), &[2.0, 6.0]);
    }
}
