use num::Num;

use crate::utils::math::CsrMatrix;

pub trait TFIDFEngine
{
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `counts` - term frequency matrix (n_samples x n_features)
    /// # Returns
    /// * `Vec<f64>` - IDFベクトル, one weight per feature
    fn idf_vec<N>(counts: &CsrMatrix<N>) -> Vec<f64>
    where
        N: Num + Copy;

    /// TF-IDF matrix of the same shape and sparsity pattern as `counts`
    /// columns scaled by idf, rows L2 normalized (zero rows stay zero)
    fn tfidf<N>(counts: &CsrMatrix<N>) -> CsrMatrix<f64>
    where
        N: Num + Copy + Into<f64>,
    {
        let idf = Self::idf_vec(counts);
        let mut tfidf = counts.map_values(|_, tf| tf.into());
        tfidf.scale_columns(&idf);
        tfidf.normalize_rows_l2();
        tfidf
    }
}

/// デフォルトのTF-IDFエンジン
/// smoothed idf: `ln((1 + n) / (1 + df)) + 1`
///
/// The `+ 1` on both counts acts as if one extra document contained every
/// term once, so df is never zero; the trailing `+ 1` keeps a term that
/// occurs in every document from getting weight zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    pub fn idf_calc(n_samples: usize, doc_freq: usize) -> f64 {
        ((n_samples as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0
    }
}

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec<N>(counts: &CsrMatrix<N>) -> Vec<f64>
    where
        N: Num + Copy,
    {
        let n_samples = counts.n_rows();
        counts
            .column_nnz()
            .into_iter()
            .map(|df| Self::idf_calc(n_samples, df))
            .collect()
    }
}
