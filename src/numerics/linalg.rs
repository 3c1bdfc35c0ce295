use nalgebra::{DMatrix, DVector, Dyn, SVD};

use super::timing::record_pseudo_inverse;
use crate::error::{GfdError, Result};

/// Singular values below `PINV_RCOND * σ_max` are treated as zero.
pub const PINV_RCOND: f64 = 1e-15;

fn cutoff(svd: &SVD<f64, Dyn, Dyn>) -> f64 {
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0, f64::max);
    PINV_RCOND * sigma_max
}

/// Moore–Penrose pseudoinverse through a thin SVD, recorded as a global
/// pseudoinverse when timing is enabled.
pub fn pseudo_inverse(matrix: DMatrix<f64>) -> Result<DMatrix<f64>> {
    record_pseudo_inverse(|| local_pseudo_inverse(matrix))
}

/// [`pseudo_inverse`] without a timing record, for the per-node fits that
/// run inside stencil assembly.
pub(crate) fn local_pseudo_inverse(matrix: DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Ok(DMatrix::zeros(cols, rows));
    }
    let svd = matrix.svd(true, true);
    let eps = cutoff(&svd);
    svd.pseudo_inverse(eps).map_err(GfdError::Pseudoinverse)
}

/// Minimum-norm least-squares solution of `matrix · x = rhs`, i.e.
/// `pinv(matrix) · rhs` without forming the pseudoinverse.
pub fn least_squares_solve(matrix: DMatrix<f64>, rhs: &DVector<f64>) -> Result<DVector<f64>> {
    if matrix.is_empty() {
        return Ok(DVector::zeros(matrix.ncols()));
    }
    record_pseudo_inverse(|| {
        let svd = matrix.svd(true, true);
        let eps = cutoff(&svd);
        svd.solve(rhs, eps).map_err(GfdError::Pseudoinverse)
    })
}
