use num::Num;
use rayon::prelude::*;

use crate::error::{RecommendError, Result};
use crate::utils::math::{CsrMatrix, DenseMatrix};

/// コサイン類似度 (all row pairs)
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
/// ||a|| = sqrt(Σ(a_i^2))
///
/// Rows are re-normalized here, so un-normalized input (raw counts) is fine.
/// A zero row has similarity 0 with everything, itself included.
///
/// # Arguments
/// * `x` - (n_samples_x, n_features)
/// * `y` - (n_samples_y, n_features), `None` means `x` against itself
///
/// # Returns
/// * `DenseMatrix` - (n_samples_x, n_samples_y)
pub fn cosine_similarity<N>(x: &CsrMatrix<N>, y: Option<&CsrMatrix<N>>) -> Result<DenseMatrix>
where
    N: Num + Copy + Into<f64> + Send + Sync,
{
    check_features(x, y)?;
    let x_norm = unit_rows(x);
    let y_norm = y.map(unit_rows);
    let y_norm = y_norm.as_ref().unwrap_or(&x_norm);

    let (n_x, n_y) = (x_norm.n_rows(), y_norm.n_rows());
    let mut out = DenseMatrix::zeros(n_x, n_y);
    if n_y == 0 {
        return Ok(out);
    }
    out.as_mut_slice()
        .par_chunks_mut(n_y)
        .enumerate()
        .for_each(|(i, out_row)| {
            let a = x_norm.row(i);
            for (j, cell) in out_row.iter_mut().enumerate() {
                *cell = a.dot(&y_norm.row(j));
            }
        });
    Ok(out)
}

/// Same as [`cosine_similarity`] but only nonzero similarities are kept,
/// as a sparse (n_samples_x, n_samples_y) matrix
pub fn cosine_similarity_sparse<N>(
    x: &CsrMatrix<N>,
    y: Option<&CsrMatrix<N>>,
) -> Result<CsrMatrix<f64>>
where
    N: Num + Copy + Into<f64> + Send + Sync,
{
    check_features(x, y)?;
    let x_norm = unit_rows(x);
    let y_norm = y.map(unit_rows);
    let y_norm = y_norm.as_ref().unwrap_or(&x_norm);

    let rows: Vec<Vec<(usize, f64)>> = (0..x_norm.n_rows())
        .into_par_iter()
        .map(|i| {
            let a = x_norm.row(i);
            y_norm
                .rows()
                .enumerate()
                .map(|(j, b)| (j, a.dot(&b)))
                .filter(|&(_, s)| s != 0.0)
                .collect()
        })
        .collect();

    let nnz = rows.iter().map(Vec::len).sum();
    let mut out = CsrMatrix::with_capacity(y_norm.n_rows(), rows.len(), nnz);
    for row in rows {
        out.push_row(row);
    }
    Ok(out)
}

fn check_features<N>(x: &CsrMatrix<N>, y: Option<&CsrMatrix<N>>) -> Result<()>
where
    N: Num + Copy,
{
    match y {
        Some(y) if y.n_cols() != x.n_cols() => Err(RecommendError::ShapeMismatch(format!(
            "X has {} features but Y has {}",
            x.n_cols(),
            y.n_cols()
        ))),
        _ => Ok(()),
    }
}

/// f64 copy with every nonzero row scaled to unit L2 norm
fn unit_rows<N>(m: &CsrMatrix<N>) -> CsrMatrix<f64>
where
    N: Num + Copy + Into<f64>,
{
    let mut unit = m.map_values(|_, v| v.into());
    unit.normalize_rows_l2();
    unit
}
