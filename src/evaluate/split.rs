/// Positional train/test partition of a row sequence.
///
/// `train` is the first `min(train_rows, n)` rows and `test` is the rest, so
/// `train.len() + test.len() == n` and row order is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a, T> {
    pub train: &'a [T],
    pub test: &'a [T],
}

impl<'a, T> Split<'a, T> {
    pub fn positional(rows: &'a [T], train_rows: usize) -> Self {
        let (train, test) = rows.split_at(train_rows.min(rows.len()));
        Self { train, test }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_positional() {
        let rows: Vec<usize> = (0..10).collect();
        let split = Split::positional(&rows, 7);
        assert_eq!(split.train, &rows[..7]);
        assert_eq!(split.test, &[7, 8, 9]);
        assert_eq!(split.len(), 10);
    }

    #[test]
    fn small_corpus_leaves_test_empty() {
        let rows = ["a", "b", "c"];
        let split = Split::positional(&rows, 35_000);
        assert_eq!(split.train.len(), 3);
        assert!(split.test.is_empty());
        for n in 0..5 {
            let split = Split::positional(&rows, n);
            assert_eq!(split.train.len() + split.test.len(), rows.len());
        }
    }
}
