//! Determinants, inverses and linear solves through LU factorization with
//! partial pivoting.

use faer::prelude::SpSolver;
use faer::{Mat, MatRef};
use tensile_tensor::{Backend, FloatElement, Tensor};

use super::matrix::{
    broadcast_shapes, broadcast_source_index, from_faer, matrix_dims, split_batch, square_dims,
    stack,
};
use crate::error::LinalgError;

/// Zero-based index of the first exactly-zero diagonal entry of `u`.
fn first_zero_pivot(u: MatRef<'_, f64>) -> Option<usize> {
    (0..u.nrows().min(u.ncols())).find(|&i| u.read(i, i) == 0.0)
}

fn singular(op: &'static str, zero_pivot: Option<usize>) -> Result<(), LinalgError> {
    match zero_pivot {
        Some(k) => Err(LinalgError::Singular { op, pivot: k + 1 }),
        None => Ok(()),
    }
}

/// Solves `A X = B` for one square `A`, failing with the one-based index of
/// the first zero pivot.
pub(crate) fn solve_square(
    op: &'static str,
    a: MatRef<'_, f64>,
    rhs: Mat<f64>,
) -> Result<Mat<f64>, LinalgError> {
    if a.nrows() == 0 {
        return Ok(rhs);
    }
    let lu = a.partial_piv_lu();
    singular(op, first_zero_pivot(lu.compute_u().as_ref()))?;
    Ok(lu.solve(rhs))
}

/// Returns `(sign, log|det|)`, with `(0, -inf)` for singular matrices.
fn slogdet_one(a: MatRef<'_, f64>) -> (f64, f64) {
    if a.nrows() == 0 {
        return (1.0, 0.0);
    }
    let u = a.partial_piv_lu().compute_u();
    if first_zero_pivot(u.as_ref()).is_some() {
        return (0.0, f64::NEG_INFINITY);
    }
    let logabs = (0..u.nrows()).map(|i| u.read(i, i).abs().ln()).sum();
    (a.determinant().signum(), logabs)
}

fn det_one(a: MatRef<'_, f64>) -> f64 {
    if a.nrows() == 0 {
        return 1.0;
    }
    a.determinant()
}

/// Determinant of a batch of square matrices, shape `(*)`.
pub fn det<T: FloatElement, D: Backend>(input: &Tensor<T, D>) -> Result<Tensor<T, D>, LinalgError> {
    let (batch, n) = square_dims("linalg_det", input.shape())?;
    let count = batch.iter().product();
    let mats = split_batch(input.as_slice(), count, n, n);
    let parts = mats
        .iter()
        .map(|a| vec![T::from_f64_lossy(det_one(a.as_ref()))]);
    stack(batch, &[], parts)
}

/// Sign and log absolute determinant, both of shape `(*)`.
pub fn slogdet<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
) -> Result<(Tensor<T, D>, Tensor<T, D>), LinalgError> {
    let (batch, n) = square_dims("linalg_slogdet", input.shape())?;
    let count = batch.iter().product();
    let (signs, logs): (Vec<T>, Vec<T>) = split_batch(input.as_slice(), count, n, n)
        .iter()
        .map(|a| {
            let (sign, logabs) = slogdet_one(a.as_ref());
            (T::from_f64_lossy(sign), T::from_f64_lossy(logabs))
        })
        .unzip();
    Ok((
        Tensor::from_shape_vec(batch, signs)?,
        Tensor::from_shape_vec(batch, logs)?,
    ))
}

/// Inverse of a batch of square matrices.
pub fn inv<T: FloatElement, D: Backend>(input: &Tensor<T, D>) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_inv";
    let (batch, n) = square_dims(op, input.shape())?;
    let count = batch.iter().product();
    let mut parts = Vec::with_capacity(count);
    for a in split_batch(input.as_slice(), count, n, n) {
        let a_inv = solve_square(op, a.as_ref(), Mat::<f64>::identity(n, n))?;
        parts.push(from_faer(a_inv.as_ref()));
    }
    stack(batch, &[n, n], parts)
}

/// Solves `A X = B` with broadcasting over batch dimensions.
///
/// `other` is treated as a batch of vectors when it is one-dimensional or
/// when its shape equals `input.shape()[..-1]`.
pub fn solve<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    other: &Tensor<T, D>,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_solve";
    let (a_batch, n) = square_dims(op, input.shape())?;
    let b_shape = other.shape();
    let mismatch = || LinalgError::ShapeMismatch {
        op,
        lhs: input.shape().to_vec(),
        rhs: b_shape.to_vec(),
    };

    if b_shape.is_empty() {
        return Err(LinalgError::DimensionTooSmall {
            op,
            expected: 1,
            actual: 0,
        });
    }
    let vector_rhs =
        b_shape.len() == 1 || b_shape == &input.shape()[..input.ndim() - 1];
    let (b_batch, rows, k) = if vector_rhs {
        let (batch, last) = b_shape.split_at(b_shape.len() - 1);
        (batch, last[0], 1)
    } else {
        matrix_dims(op, b_shape)?
    };
    if rows != n {
        return Err(mismatch());
    }

    let out_batch = broadcast_shapes(op, a_batch, b_batch)?;
    let count: usize = out_batch.iter().product();
    let lhs = split_batch(input.as_slice(), a_batch.iter().product(), n, n);
    let rhs = split_batch(other.as_slice(), b_batch.iter().product(), n, k);

    let mut parts = Vec::with_capacity(count);
    if n == 0 {
        parts.resize(count, Vec::new());
    } else {
        // factor each distinct matrix once
        let factors: Vec<_> = lhs
            .iter()
            .map(|a| {
                let lu = a.as_ref().partial_piv_lu();
                let zero_pivot = first_zero_pivot(lu.compute_u().as_ref());
                (lu, zero_pivot)
            })
            .collect();
        for i in 0..count {
            let (lu, zero_pivot) = &factors[broadcast_source_index(&out_batch, a_batch, i)];
            singular(op, *zero_pivot)?;
            let b = &rhs[broadcast_source_index(&out_batch, b_batch, i)];
            parts.push(from_faer(lu.solve(b.clone()).as_ref()));
        }
    }

    if vector_rhs {
        stack(&out_batch, &[n], parts)
    } else {
        stack(&out_batch, &[n, k], parts)
    }
}
