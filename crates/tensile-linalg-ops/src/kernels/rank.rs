//! Rank and pseudo-inverse, both driven by the spectrum of the input.

use faer::{Mat, MatRef};
use tensile_tensor::{Backend, FloatElement, Tensor};

use super::eigh::{symmetric, symmetric_eigen, Uplo};
use super::matrix::{from_faer, matrix_dims, stack, to_faer};
use super::svd::svd;
use crate::error::LinalgError;
use crate::options::{MatrixRankOptions, PinvOptions};

fn require_square(op: &'static str, shape: &[usize], m: usize, n: usize) -> Result<(), LinalgError> {
    if m != n {
        return Err(LinalgError::NotSquare {
            op,
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// Number of singular values (or `|eigenvalues|` when hermitian) above the tolerance, shape `(*)`.
pub fn matrix_rank<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    options: &MatrixRankOptions,
) -> Result<Tensor<i64, D>, LinalgError> {
    let op = "linalg_matrix_rank";
    let (batch, m, n) = matrix_dims(op, input.shape())?;
    if options.hermitian {
        require_square(op, input.shape(), m, n)?;
    }
    let count = batch.iter().product();
    let data = input.as_slice();
    let mut ranks = Vec::with_capacity(count);
    for b in 0..count {
        let block = &data[b * m * n..(b + 1) * m * n];
        let spectrum: Vec<f64> = if options.hermitian {
            let a = symmetric(block, n, Uplo::Lower);
            symmetric_eigen(op, a.as_ref())?
                .values
                .into_iter()
                .map(f64::abs)
                .collect()
        } else {
            svd(op, to_faer(block, m, n).as_ref())?.s
        };
        let max = spectrum.iter().copied().fold(0.0, f64::max);
        let tol = match options.tol {
            Some(tol) => tol,
            None => max * m.max(n) as f64 * T::epsilon().to_f64_lossy(),
        };
        ranks.push(vec![spectrum.iter().filter(|&&s| s > tol).count() as i64]);
    }
    stack(batch, &[], ranks)
}

/// `sum_r w_r x_r y_rᵀ` over the columns with `|values[r]| > cutoff`, `w_r = 1 / values[r]`.
fn spectral_inverse(
    x: MatRef<'_, f64>,
    values: &[f64],
    y: MatRef<'_, f64>,
    cutoff: f64,
) -> Mat<f64> {
    let mut p = Mat::<f64>::zeros(x.nrows(), y.nrows());
    for (r, &value) in values.iter().enumerate() {
        if value.abs() <= cutoff {
            continue;
        }
        let inv = value.recip();
        for i in 0..x.nrows() {
            let xi = x.read(i, r) * inv;
            for j in 0..y.nrows() {
                p.write(i, j, p.read(i, j) + xi * y.read(j, r));
            }
        }
    }
    p
}

fn pinv_hermitian(op: &'static str, a: MatRef<'_, f64>, rcond: f64) -> Result<Mat<f64>, LinalgError> {
    let eigen = symmetric_eigen(op, a)?;
    let max = eigen.values.iter().fold(0.0, |acc: f64, &v| acc.max(v.abs()));
    let v = eigen.vectors.as_ref();
    Ok(spectral_inverse(v, &eigen.values, v, rcond * max))
}

fn pinv_general(op: &'static str, a: MatRef<'_, f64>, rcond: f64) -> Result<Mat<f64>, LinalgError> {
    let svd = svd(op, a)?;
    let cutoff = rcond * svd.max_singular();
    Ok(spectral_inverse(svd.v.as_ref(), &svd.s, svd.u.as_ref(), cutoff))
}

/// Moore-Penrose pseudo-inverse, `(*, m, n) -> (*, n, m)`.
pub fn pinv<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    options: &PinvOptions,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_pinv";
    let (batch, m, n) = matrix_dims(op, input.shape())?;
    if options.hermitian {
        require_square(op, input.shape(), m, n)?;
    }
    let count = batch.iter().product();
    let data = input.as_slice();
    let mut parts = Vec::with_capacity(count);
    for b in 0..count {
        let block = &data[b * m * n..(b + 1) * m * n];
        let p = if options.hermitian {
            pinv_hermitian(op, symmetric(block, n, Uplo::Lower).as_ref(), options.rcond)?
        } else {
            pinv_general(op, to_faer(block, m, n).as_ref(), options.rcond)?
        };
        parts.push(from_faer(p.as_ref()));
    }
    stack(batch, &[n, m], parts)
}
