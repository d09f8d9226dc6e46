//! Symmetric eigendecomposition.

use faer::{Mat, MatRef, Side};
use tensile_tensor::{Backend, FloatElement, Tensor};

use super::matrix::{bilinear, ensure_finite, from_faer, square_dims, stack};
use crate::error::LinalgError;

/// Triangle of a symmetric matrix that holds the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Uplo {
    Lower,
    Upper,
}

impl Uplo {
    pub(crate) fn parse(op: &'static str, uplo: &str) -> Result<Self, LinalgError> {
        match uplo {
            "L" | "l" => Ok(Uplo::Lower),
            "U" | "u" => Ok(Uplo::Upper),
            other => Err(LinalgError::invalid_argument(
                op,
                format!("Expected UPLO argument to be 'L' or 'U', but got {}", other),
            )),
        }
    }
}

/// Builds the symmetric `n x n` matrix held in the `uplo` triangle of a
/// row-major block.
pub(crate) fn symmetric<T: FloatElement>(data: &[T], n: usize, uplo: Uplo) -> Mat<f64> {
    Mat::<f64>::from_fn(n, n, |i, j| {
        let (r, c) = match (uplo, i >= j) {
            (Uplo::Lower, true) | (Uplo::Upper, false) => (i, j),
            _ => (j, i),
        };
        data[r * n + c].to_f64_lossy()
    })
}

/// Eigenvalues in ascending order and the matching orthonormal
/// eigenvectors as columns.
pub(crate) struct SymmetricEigen {
    pub(crate) values: Vec<f64>,
    pub(crate) vectors: Mat<f64>,
}

/// Diagonalizes a symmetric matrix.
pub(crate) fn symmetric_eigen(
    op: &'static str,
    a: MatRef<'_, f64>,
) -> Result<SymmetricEigen, LinalgError> {
    ensure_finite(op, a)?;
    let n = a.nrows();
    if n == 0 {
        return Ok(SymmetricEigen {
            values: Vec::new(),
            vectors: Mat::zeros(0, 0),
        });
    }

    let eig = a.selfadjoint_eigendecomposition(Side::Lower);
    let u = eig.u();
    let lambda: Vec<f64> = (0..n).map(|j| bilinear(u, a, u, j, j)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| lambda[i].total_cmp(&lambda[j]));
    log::trace!("{}: eigendecomposition of {}x{}", op, n, n);

    Ok(SymmetricEigen {
        values: order.iter().map(|&j| lambda[j]).collect(),
        vectors: Mat::<f64>::from_fn(n, n, |i, j| u.read(i, order[j])),
    })
}

fn eigen_batch<T: FloatElement, D: Backend>(
    op: &'static str,
    input: &Tensor<T, D>,
    uplo: &str,
) -> Result<(Vec<usize>, usize, Vec<SymmetricEigen>), LinalgError> {
    let uplo = Uplo::parse(op, uplo)?;
    let (batch, n) = square_dims(op, input.shape())?;
    let count = batch.iter().product();
    let data = input.as_slice();
    let mut out = Vec::with_capacity(count);
    for b in 0..count {
        let a = symmetric(&data[b * n * n..(b + 1) * n * n], n, uplo);
        out.push(symmetric_eigen(op, a.as_ref())?);
    }
    Ok((batch.to_vec(), n, out))
}

fn cast_all<T: FloatElement>(values: &[f64]) -> Vec<T> {
    values.iter().map(|&v| T::from_f64_lossy(v)).collect()
}

/// Eigenvalues `(*, n)` ascending and eigenvectors `(*, n, n)` as columns.
pub fn eigh<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    uplo: &str,
) -> Result<(Tensor<T, D>, Tensor<T, D>), LinalgError> {
    let (batch, n, eigens) = eigen_batch("linalg_eigh", input, uplo)?;
    let mut values = Vec::with_capacity(eigens.len());
    let mut vectors = Vec::with_capacity(eigens.len());
    for e in &eigens {
        values.push(cast_all(&e.values));
        vectors.push(from_faer(e.vectors.as_ref()));
    }
    Ok((stack(&batch, &[n], values)?, stack(&batch, &[n, n], vectors)?))
}

/// Eigenvalues `(*, n)` ascending.
pub fn eigvalsh<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    uplo: &str,
) -> Result<Tensor<T, D>, LinalgError> {
    let (batch, n, eigens) = eigen_batch("linalg_eigvalsh", input, uplo)?;
    stack(&batch, &[n], eigens.iter().map(|e| cast_all(&e.values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::matrix::testing::{matmul, max_abs_diff, random_symmetric, transpose};
    use approx::assert_relative_eq;
    use tensile_tensor::Cpu;

    /// `V diag(w) Vᵀ` for row-major `V`.
    fn rebuild(w: &[f64], v: &[f64], n: usize) -> Vec<f64> {
        let mut vw = v.to_vec();
        for i in 0..n {
            for j in 0..n {
                vw[i * n + j] *= w[j];
            }
        }
        matmul(&vw, &transpose(v, n, n), n, n, n)
    }

    #[test]
    fn test_eigvalsh_2x2() -> Result<(), LinalgError> {
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[2, 2], vec![2.0, 1.0, 1.0, 2.0])?;
        let w = eigvalsh(&a, "L")?;
        assert_relative_eq!(w.as_slice()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(w.as_slice()[1], 3.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_eigh_reconstructs() -> Result<(), LinalgError> {
        #[rustfmt::skip]
        let data = vec![
            4.0, 1.0, -2.0,
            1.0, 2.0, 0.5,
            -2.0, 0.5, 3.0,
        ];
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[3, 3], data.clone())?;
        let (w, v) = eigh(&a, "L")?;
        assert!(w.as_slice().windows(2).all(|p| p[0] <= p[1]));
        assert!(max_abs_diff(&rebuild(w.as_slice(), v.as_slice(), 3), &data) < 1e-10);

        let vtv = matmul(&transpose(v.as_slice(), 3, 3), v.as_slice(), 3, 3, 3);
        let eye = Tensor::<f64, Cpu>::eye(3);
        assert!(max_abs_diff(&vtv, eye.as_slice()) < 1e-10);
        Ok(())
    }

    #[test]
    fn test_eigh_uses_selected_triangle() -> Result<(), LinalgError> {
        // lower triangle encodes diag(1, 3), upper triangle holds garbage
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[2, 2], vec![1.0, 50.0, 0.0, 3.0])?;
        let lower = eigvalsh(&a, "l")?;
        assert_relative_eq!(lower.as_slice()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(lower.as_slice()[1], 3.0, epsilon = 1e-12);
        let upper = eigvalsh(&a, "U")?;
        assert!(upper.as_slice()[0] < 0.0);
        Ok(())
    }

    #[test]
    fn test_eigh_rejects_bad_uplo() -> Result<(), LinalgError> {
        let a = Tensor::<f64, Cpu>::eye(2);
        assert!(matches!(
            eigh(&a, "X"),
            Err(LinalgError::InvalidArgument { op: "linalg_eigh", .. })
        ));
        Ok(())
    }

    #[test]
    fn test_eigh_rejects_nan() -> Result<(), LinalgError> {
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[2, 2], vec![1.0, 0.0, f64::NAN, 1.0])?;
        assert_eq!(
            eigvalsh(&a, "L"),
            Err(LinalgError::NoConvergence {
                op: "linalg_eigvalsh"
            })
        );
        Ok(())
    }

    #[test]
    fn test_eigvalsh_batched() -> Result<(), LinalgError> {
        let a = Tensor::<f32, Cpu>::from_shape_vec(&[2, 2, 2], vec![
            3.0, 0.0, 0.0, 1.0, //
            5.0, 0.0, 0.0, 5.0,
        ])?;
        let w = eigvalsh(&a, "L")?;
        assert_eq!(w.shape(), &[2, 2]);
        for (got, want) in w.as_slice().iter().zip([1.0, 3.0, 5.0, 5.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_eigh_size_sweep() -> Result<(), LinalgError> {
        for n in [16, 32, 48, 64] {
            let data = random_symmetric(n, n as u64);
            let a = Tensor::<f64, Cpu>::from_shape_vec(&[n, n], data.clone())?;
            let (w, v) = eigh(&a, "L")?;
            assert!(w.as_slice().windows(2).all(|p| p[0] <= p[1]));
            assert!(
                max_abs_diff(&rebuild(w.as_slice(), v.as_slice(), n), &data) < 1e-10,
                "eigh of {}x{} does not reconstruct",
                n,
                n
            );
        }
        Ok(())
    }

    #[test]
    fn test_eigvalsh_64_f64() -> Result<(), LinalgError> {
        let n = 64;
        let data = random_symmetric(n, 7);
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[n, n], data.clone())?;
        let w = eigvalsh(&a, "L")?;
        assert_eq!(w.shape(), &[n]);
        let trace: f64 = (0..n).map(|i| data[i * n + i]).sum();
        assert_relative_eq!(w.as_slice().iter().sum::<f64>(), trace, epsilon = 1e-10);
        let fro2: f64 = data.iter().map(|x| x * x).sum();
        assert_relative_eq!(w.as_slice().iter().map(|x| x * x).sum::<f64>(), fro2, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_eigh_64_f32() -> Result<(), LinalgError> {
        let n = 64;
        let data = random_symmetric(n, 11);
        let a = Tensor::<f32, Cpu>::from_shape_fn(&[n, n], |idx| data[idx[0] * n + idx[1]] as f32);
        let (w, v) = eigh(&a, "U")?;
        assert_eq!(w.shape(), &[n]);
        assert_eq!(v.shape(), &[n, n]);

        let w: Vec<f64> = w.as_slice().iter().map(|&x| x as f64).collect();
        let v: Vec<f64> = v.as_slice().iter().map(|&x| x as f64).collect();
        let target: Vec<f64> = a.as_slice().iter().map(|&x| x as f64).collect();
        assert!(max_abs_diff(&rebuild(&w, &v, n), &target) < 1e-4);
        assert_eq!(eigvalsh(&a, "U")?.shape(), &[n]);
        Ok(())
    }
}
