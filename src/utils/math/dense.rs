use std::ops::Index;

/// Row-major dense f64 matrix
/// used for the pairwise similarity output
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl DenseMatrix {
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: vec![0.0; n_rows * n_cols],
            n_rows,
            n_cols,
        }
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.n_rows && j < self.n_cols {
            Some(self.data[i * self.n_cols + j])
        } else {
            None
        }
    }

    #[inline]
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.n_rows {
            Some(&self.data[i * self.n_cols..(i + 1) * self.n_cols])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(move |i| &self.data[i * self.n_cols..(i + 1) * self.n_cols])
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// raw buffer for row-wise fills, `n_cols` values per row
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.n_rows != self.n_cols {
            return false;
        }
        (0..self.n_rows).all(|i| {
            (i + 1..self.n_cols).all(|j| (self[(i, j)] - self[(j, i)]).abs() <= tol)
        })
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(i < self.n_rows && j < self.n_cols, "index ({i}, {j}) out of bounds");
        &self.data[i * self.n_cols + j]
    }
}
