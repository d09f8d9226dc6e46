//! Products of Householder reflectors.

use faer::{Mat, MatRef};
use tensile_tensor::{Backend, FloatElement, Tensor};

use super::matrix::{from_faer, matrix_dims, split_batch, stack};
use crate::error::LinalgError;

/// Applies `H_j = I - tau v vᵀ` to every column of `q`.
///
/// `v` is stored below the diagonal of column `j` of `reflectors`, with an
/// implicit one at row `j`.
fn apply_reflector(reflectors: MatRef<'_, f64>, j: usize, tau: f64, q: &mut Mat<f64>) {
    if tau == 0.0 {
        return;
    }
    let m = q.nrows();
    for c in 0..q.ncols() {
        let mut w = q.read(j, c);
        for i in j + 1..m {
            w += reflectors.read(i, j) * q.read(i, c);
        }
        let tw = tau * w;
        q.write(j, c, q.read(j, c) - tw);
        for i in j + 1..m {
            q.write(i, c, q.read(i, c) - tw * reflectors.read(i, j));
        }
    }
}

/// First `n` columns of `H_0 H_1 ... H_{k-1}` for an `m x n` reflector block.
pub(crate) fn householder_q(reflectors: MatRef<'_, f64>, tau: &[f64]) -> Mat<f64> {
    let (m, n) = (reflectors.nrows(), reflectors.ncols());
    let mut q = Mat::<f64>::identity(m, n);
    for j in (0..tau.len()).rev() {
        apply_reflector(reflectors, j, tau[j], &mut q);
    }
    q
}

/// Product of Householder reflectors stored LAPACK-style in `input` and `tau`.
///
/// `input` is `(*, m, n)` with `m >= n`, `tau` is `(*, k)` with `k <= n`;
/// the result is the first `n` columns of `H_0 ... H_{k-1}`.
pub fn householder_product<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    tau: &Tensor<T, D>,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_householder_product";
    let (batch, m, n) = matrix_dims(op, input.shape())?;
    if tau.ndim() < 1 {
        return Err(LinalgError::DimensionTooSmall {
            op,
            expected: 1,
            actual: 0,
        });
    }
    if m < n {
        return Err(LinalgError::invalid_argument(
            op,
            format!(
                "input.shape[-2] must be greater than or equal to input.shape[-1], got {} < {}",
                m, n
            ),
        ));
    }
    let (tau_batch, k) = tau.shape().split_at(tau.ndim() - 1);
    let k = k[0];
    if k > n {
        return Err(LinalgError::invalid_argument(
            op,
            format!(
                "input.shape[-1] must be greater than or equal to tau.shape[-1], got {} < {}",
                n, k
            ),
        ));
    }
    if tau_batch != batch {
        return Err(LinalgError::ShapeMismatch {
            op,
            lhs: input.shape().to_vec(),
            rhs: tau.shape().to_vec(),
        });
    }

    let count = batch.iter().product();
    let reflectors = split_batch(input.as_slice(), count, m, n);
    let taus: Vec<f64> = tau.as_slice().iter().map(|t| t.to_f64_lossy()).collect();
    let parts = reflectors
        .iter()
        .enumerate()
        .map(|(b, r)| from_faer(householder_q(r.as_ref(), &taus[b * k..(b + 1) * k]).as_ref()));
    stack(batch, &[m, n], parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::matrix::testing::{matmul, max_abs_diff, transpose};
    use tensile_tensor::Cpu;

    /// `I - tau v vᵀ` as a dense row-major `m x m` matrix.
    fn dense_reflector(v: &[f64], tau: f64) -> Vec<f64> {
        let m = v.len();
        let mut h = Tensor::<f64, Cpu>::eye(m).into_vec();
        for i in 0..m {
            for j in 0..m {
                h[i * m + j] -= tau * v[i] * v[j];
            }
        }
        h
    }

    #[test]
    fn test_householder_product_matches_dense_reflectors() -> Result<(), LinalgError> {
        // v0 = [1, 0.5, -1], v1 = [0, 1, 2], tau = 2 / vᵀv makes each H orthogonal
        #[rustfmt::skip]
        let input = Tensor::<f64, Cpu>::from_shape_vec(&[3, 2], vec![
            7.0, 9.0,
            0.5, 8.0,
            -1.0, 2.0,
        ])?;
        let tau = Tensor::<f64, Cpu>::from_shape_vec(&[2], vec![2.0 / 2.25, 2.0 / 5.0])?;
        let q = householder_product(&input, &tau)?;
        assert_eq!(q.shape(), &[3, 2]);

        let h0 = dense_reflector(&[1.0, 0.5, -1.0], 2.0 / 2.25);
        let h1 = dense_reflector(&[0.0, 1.0, 2.0], 2.0 / 5.0);
        let full = matmul(&h0, &h1, 3, 3, 3);
        let expected: Vec<f64> = (0..3).flat_map(|i| [full[i * 3], full[i * 3 + 1]]).collect();
        assert!(max_abs_diff(q.as_slice(), &expected) < 1e-12);

        let qtq = matmul(&transpose(q.as_slice(), 3, 2), q.as_slice(), 2, 3, 2);
        assert!(max_abs_diff(&qtq, &[1.0, 0.0, 0.0, 1.0]) < 1e-12);
        Ok(())
    }

    #[test]
    fn test_householder_product_batched_f32() -> Result<(), LinalgError> {
        // second batch entry flips the sign of the first basis vector
        let input = Tensor::<f32, Cpu>::zeros(&[2, 2, 2]);
        let tau = Tensor::<f32, Cpu>::from_shape_vec(&[2, 1], vec![0.0, 2.0])?;
        let q = householder_product(&input, &tau)?;
        assert_eq!(q.as_slice(), &[1.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_householder_product_zero_tau_is_identity() -> Result<(), LinalgError> {
        let input = Tensor::<f64, Cpu>::from_shape_val(&[2, 2], 5.0);
        let tau = Tensor::<f64, Cpu>::zeros(&[2]);
        let q = householder_product(&input, &tau)?;
        assert_eq!(q.as_slice(), &[1.0, 0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_householder_product_validates_shapes() {
        let wide = Tensor::<f64, Cpu>::zeros(&[2, 3]);
        let tau = Tensor::<f64, Cpu>::zeros(&[2]);
        assert!(matches!(
            householder_product(&wide, &tau),
            Err(LinalgError::InvalidArgument { .. })
        ));

        let input = Tensor::<f64, Cpu>::zeros(&[3, 2]);
        let long_tau = Tensor::<f64, Cpu>::zeros(&[3]);
        assert!(matches!(
            householder_product(&input, &long_tau),
            Err(LinalgError::InvalidArgument { .. })
        ));

        let batched_tau = Tensor::<f64, Cpu>::zeros(&[4, 2]);
        assert!(matches!(
            householder_product(&input, &batched_tau),
            Err(LinalgError::ShapeMismatch { .. })
        ));
    }
}
