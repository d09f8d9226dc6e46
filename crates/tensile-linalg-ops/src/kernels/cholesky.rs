use faer::{Mat, MatRef, Side};
use tensile_tensor::{Backend, FloatElement, Tensor};

use super::eigh::{symmetric, Uplo};
use super::matrix::{from_faer, square_dims, stack};
use crate::error::LinalgError;

fn leading_minor_factors(a: MatRef<'_, f64>, k: usize) -> bool {
    a.submatrix(0, 0, k, k).cholesky(Side::Lower).is_ok()
}

/// Order of the smallest leading minor that is not positive-definite.
///
/// A leading minor factors only if every smaller one does.
fn first_failing_minor(a: MatRef<'_, f64>) -> usize {
    let (mut lo, mut hi) = (1, a.nrows());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if leading_minor_factors(a, mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Lower Cholesky factor of one symmetric positive-definite matrix.
fn cholesky_lower(op: &'static str, a: MatRef<'_, f64>) -> Result<Mat<f64>, LinalgError> {
    let n = a.nrows();
    if n == 0 {
        return Ok(Mat::zeros(0, 0));
    }
    let l = match a.cholesky(Side::Lower) {
        Ok(factor) => factor.compute_l(),
        Err(_) => {
            return Err(LinalgError::NotPositiveDefinite {
                op,
                minor: first_failing_minor(a),
            })
        }
    };
    // also rejects NaN
    if let Some(j) = (0..n).find(|&j| !(l.read(j, j) > 0.0)) {
        return Err(LinalgError::NotPositiveDefinite { op, minor: j + 1 });
    }
    Ok(Mat::<f64>::from_fn(n, n, |i, j| if j <= i { l.read(i, j) } else { 0.0 }))
}

/// Cholesky decomposition `A = L Lᵀ` of a batch of symmetric positive-definite matrices.
///
/// Only the lower triangle of each matrix is read.
pub fn cholesky<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_cholesky";
    let (batch, n) = square_dims(op, input.shape())?;
    let count = batch.iter().product();
    let data = input.as_slice();
    let mut parts = Vec::with_capacity(count);
    for b in 0..count {
        let a = symmetric(&data[b * n * n..(b + 1) * n * n], n, Uplo::Lower);
        parts.push(from_faer(cholesky_lower(op, a.as_ref())?.as_ref()));
    }
    stack(batch, &[n, n], parts)
}
