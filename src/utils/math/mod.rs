pub mod csr;
pub mod dense;

pub use csr::{CsrMatrix, Row};
pub use dense::DenseMatrix;
