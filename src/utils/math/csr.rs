use std::cmp::Ordering;

use num::Num;

use crate::error::{RecommendError, Result};

/// CsrMatrixは行圧縮形式の疎行列です
/// data / indices / indptr の3本の並列配列を持ち
///
/// - `data[k]` は k 番目の非ゼロ値
/// - `indices[k]` はその列 (feature index)
/// - `indptr[i]..indptr[i + 1]` が i 行目の範囲
///
/// Invariants:
/// - `indptr.len() == n_rows + 1`, `indptr[0] == 0`, non-decreasing,
///   `indptr[n_rows] == nnz`
/// - column indices of one row are strictly ascending and `< n_cols`
/// - explicit zeros are never stored by `push_row` / `from_dense`
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<N>
where
    N: Num + Copy,
{
    data: Vec<N>,
    indices: Vec<usize>,
    indptr: Vec<usize>,
    n_cols: usize,
}

/// Borrowed view of one matrix row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a, N> {
    pub indices: &'a [usize],
    pub values: &'a [N],
}

impl<N> CsrMatrix<N>
where
    N: Num + Copy,
{
    /// Empty matrix with zero rows and `n_cols` columns
    pub fn new(n_cols: usize) -> Self {
        Self::with_capacity(n_cols, 0, 0)
    }

    pub fn with_capacity(n_cols: usize, n_rows: usize, nnz: usize) -> Self {
        let mut indptr = Vec::with_capacity(n_rows + 1);
        indptr.push(0);
        Self {
            data: Vec::with_capacity(nnz),
            indices: Vec::with_capacity(nnz),
            indptr,
            n_cols,
        }
    }

    /// 1行追加する
    /// entries must come in ascending column order; zero values are skipped
    pub fn push_row<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (usize, N)>,
    {
        let row_start = self.indices.len();
        for (col, val) in entries {
            debug_assert!(col < self.n_cols, "column {col} out of range {}", self.n_cols);
            debug_assert!(
                self.indices.len() == row_start || self.indices[self.indices.len() - 1] < col,
                "columns must be strictly ascending within a row"
            );
            if val != N::zero() {
                self.data.push(val);
                self.indices.push(col);
            }
        }
        self.indptr.push(self.indices.len());
        self
    }

    /// Build from raw parts, checking every row-compressed invariant
    ///
    /// # Arguments
    /// * `data` - nonzero values
    /// * `indices` - column index of each value
    /// * `indptr` - row start offsets, `n_rows + 1` long
    /// * `shape` - `(n_rows, n_cols)`
    pub fn try_from_parts(
        data: Vec<N>,
        indices: Vec<usize>,
        indptr: Vec<usize>,
        shape: (usize, usize),
    ) -> Result<Self> {
        let (n_rows, n_cols) = shape;
        if indptr.len() != n_rows + 1 {
            return Err(RecommendError::invalid_matrix(format!(
                "indptr has length {}, expected {}",
                indptr.len(),
                n_rows + 1
            )));
        }
        if indptr[0] != 0 {
            return Err(RecommendError::invalid_matrix("indptr[0] must be 0"));
        }
        if data.len() != indices.len() {
            return Err(RecommendError::invalid_matrix(format!(
                "data has {} values but indices has {}",
                data.len(),
                indices.len()
            )));
        }
        if indptr[n_rows] != data.len() {
            return Err(RecommendError::invalid_matrix(format!(
                "indptr ends at {}, but there are {} nonzeros",
                indptr[n_rows],
                data.len()
            )));
        }
        // offsets must be checked as a whole before any row is sliced
        if let Some(row) = indptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(RecommendError::invalid_matrix(format!(
                "indptr decreases at row {row}"
            )));
        }
        for (row, bounds) in indptr.windows(2).enumerate() {
            let cols = &indices[bounds[0]..bounds[1]];
            if let Some(&col) = cols.iter().find(|&&c| c >= n_cols) {
                return Err(RecommendError::invalid_matrix(format!(
                    "column {col} in row {row} out of range {n_cols}"
                )));
            }
            if cols.windows(2).any(|w| w[0] >= w[1]) {
                return Err(RecommendError::invalid_matrix(format!(
                    "columns of row {row} are not strictly ascending"
                )));
            }
        }
        Ok(Self { data, indices, indptr, n_cols })
    }

    /// Dense rows into CSR, zeros dropped
    /// all rows must have the same length
    pub fn from_dense<R>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[N]>,
    {
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut matrix = Self::with_capacity(n_cols, rows.len(), 0);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n_cols {
                return Err(RecommendError::invalid_matrix(format!(
                    "row {i} has {} columns, expected {n_cols}",
                    row.len()
                )));
            }
            matrix.push_row(row.iter().copied().enumerate());
        }
        Ok(matrix)
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn data(&self) -> &[N] {
        &self.data
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[inline]
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// i 行目のビュー
    ///
    /// # Panics
    /// if `i >= n_rows`
    #[inline]
    pub fn row(&self, i: usize) -> Row<'_, N> {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        Row {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        }
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_, N>> + '_ {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// Number of rows touching each column (document frequency for a counts matrix)
    pub fn column_nnz(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_cols];
        for &col in &self.indices {
            counts[col] += 1;
        }
        counts
    }

    /// Same sparsity pattern, values mapped through `f(column, value)`
    pub fn map_values<M, F>(&self, mut f: F) -> CsrMatrix<M>
    where
        M: Num + Copy,
        F: FnMut(usize, N) -> M,
    {
        CsrMatrix {
            data: self
                .indices
                .iter()
                .zip(&self.data)
                .map(|(&col, &val)| f(col, val))
                .collect(),
            indices: self.indices.clone(),
            indptr: self.indptr.clone(),
            n_cols: self.n_cols,
        }
    }

    pub fn to_dense(&self) -> Vec<Vec<N>> {
        self.rows()
            .map(|row| {
                let mut dense = vec![N::zero(); self.n_cols];
                for (col, val) in row.iter() {
                    dense[col] = val;
                }
                dense
            })
            .collect()
    }
}

impl<N> CsrMatrix<N>
where
    N: Num + Copy + Into<f64>,
{
    /// Euclidean norm of every row
    pub fn row_norms(&self) -> Vec<f64> {
        self.rows().map(|row| row.norm()).collect()
    }
}

impl CsrMatrix<f64> {
    /// Multiply column j by `factors[j]`
    pub fn scale_columns(&mut self, factors: &[f64]) {
        debug_assert_eq!(factors.len(), self.n_cols);
        for (val, &col) in self.data.iter_mut().zip(&self.indices) {
            *val *= factors[col];
        }
    }

    /// L2 normalize each row in place
    /// rows whose norm is zero are left as they are
    pub fn normalize_rows_l2(&mut self) {
        for i in 0..self.n_rows() {
            let (start, end) = (self.indptr[i], self.indptr[i + 1]);
            let values = &mut self.data[start..end];
            let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                values.iter_mut().for_each(|v| *v /= norm);
            }
        }
    }
}

impl<'a, N> Row<'a, N>
where
    N: Copy,
{
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// (column, value) pairs in ascending column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, N)> + 'a {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

impl<'a, N> Row<'a, N>
where
    N: Copy + Into<f64>,
{
    #[inline]
    pub fn norm(&self) -> f64 {
        self.values
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum::<f64>()
            .sqrt()
    }

    /// sparse dot product
    /// d(a, b) = Σ(a_i * b_i), merged over the two sorted index lists
    pub fn dot<M>(&self, other: &Row<'_, M>) -> f64
    where
        M: Copy + Into<f64>,
    {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0_f64;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Equal => {
                    let a: f64 = self.values[i].into();
                    let b: f64 = other.values[j].into();
                    dot += a * b;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix<u32> {
        // [0 1 2]
        // [0 0 0]
        // [3 0 4]
        let mut m = CsrMatrix::new(3);
        m.push_row([(1, 1), (2, 2)]);
        m.push_row(std::iter::empty());
        m.push_row([(0, 3), (2, 4)]);
        m
    }

    #[test]
    fn push_row_keeps_offsets() {
        let m = sample();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.indptr(), &[0, 2, 2, 4]);
        assert_eq!(m.indices(), &[1, 2, 0, 2]);
        assert_eq!(m.data(), &[1, 2, 3, 4]);
        assert!(m.row(1).is_empty());
    }

    #[test]
    fn push_row_skips_zeros() {
        let mut m = CsrMatrix::<u32>::new(3);
        m.push_row([(0, 0), (1, 5), (2, 0)]);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.indices(), &[1]);
    }

    #[test]
    fn from_dense_matches_push_row() {
        let dense = vec![vec![0u32, 1, 2], vec![0, 0, 0], vec![3, 0, 4]];
        let m = CsrMatrix::from_dense(&dense).unwrap();
        assert_eq!(m, sample());
        assert_eq!(m.to_dense(), dense);
    }

    #[test]
    fn from_dense_rejects_ragged_rows() {
        let dense = vec![vec![1u32, 2], vec![3]];
        assert!(matches!(
            CsrMatrix::from_dense(&dense),
            Err(RecommendError::InvalidMatrix(_))
        ));
    }

    #[test]
    fn try_from_parts_validates() {
        let ok = CsrMatrix::try_from_parts(vec![1.0, 2.0], vec![0, 2], vec![0, 1, 2], (2, 3));
        assert!(ok.is_ok());

        let bad_len = CsrMatrix::try_from_parts(vec![1.0], vec![0], vec![0, 1], (2, 3));
        assert!(bad_len.is_err());

        let bad_first = CsrMatrix::try_from_parts(vec![1.0], vec![0], vec![1, 1], (1, 3));
        assert!(bad_first.is_err());

        let decreasing =
            CsrMatrix::try_from_parts(vec![1.0, 2.0], vec![0, 1], vec![0, 2, 1, 2], (3, 3));
        assert!(decreasing.is_err());

        // middle offset past the end of the values
        let overshoot =
            CsrMatrix::try_from_parts(vec![1.0, 2.0], vec![0, 1], vec![0, 5, 2], (2, 3));
        assert!(matches!(overshoot, Err(RecommendError::InvalidMatrix(_))));

        let out_of_range = CsrMatrix::try_from_parts(vec![1.0], vec![3], vec![0, 1], (1, 3));
        assert!(out_of_range.is_err());

        let unsorted =
            CsrMatrix::try_from_parts(vec![1.0, 2.0], vec![2, 0], vec![0, 2], (1, 3));
        assert!(unsorted.is_err());
    }

    #[test]
    fn column_nnz_counts_rows() {
        assert_eq!(sample().column_nnz(), vec![1, 1, 2]);
    }

    #[test]
    fn normalize_rows_skips_zero_rows() {
        let mut m = sample().map_values(|_, v| v as f64);
        m.normalize_rows_l2();
        let norms = m.row_norms();
        assert!((norms[0] - 1.0).abs() < 1e-12);
        assert_eq!(norms[1], 0.0);
        assert!((norms[2] - 1.0).abs() < 1e-12);
        assert!((m.row(2).values[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn scale_columns_multiplies_by_column() {
        let mut m = sample().map_values(|_, v| v as f64);
        m.scale_columns(&[10.0, 100.0, 0.5]);
        assert_eq!(m.data(), &[100.0, 1.0, 30.0, 2.0]);
    }

    #[test]
    fn row_dot_merges_indices() {
        let m = sample();
        assert_eq!(m.row(0).dot(&m.row(2)), 8.0);
        assert_eq!(m.row(0).dot(&m.row(1)), 0.0);
        assert_eq!(m.row(2).dot(&m.row(2)), 25.0);
    }
}
