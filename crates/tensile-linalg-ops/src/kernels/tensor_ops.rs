//! Inverse and solve for tensors viewed as matrices over grouped dimensions.

use tensile_tensor::{Backend, FloatElement, Tensor};

use faer::Mat;

use super::lu::solve_square;
use super::matrix::{from_faer, normalize_dims, to_faer};
use crate::error::LinalgError;

/// Inverse of `input` viewed as a `prod(shape[..ind]) x prod(shape[ind..])` matrix.
///
/// The result has shape `shape[ind..] ++ shape[..ind]`.
pub fn tensorinv<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    ind: usize,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_tensorinv";
    if ind == 0 {
        return Err(LinalgError::invalid_argument(
            op,
            "Expected a strictly positive integer for 'ind', but got 0",
        ));
    }
    if ind > input.ndim() {
        return Err(LinalgError::invalid_argument(
            op,
            format!("'ind' is {} but the input only has {} dimensions", ind, input.ndim()),
        ));
    }
    let (left, right) = input.shape().split_at(ind);
    let rows: usize = left.iter().product();
    let cols: usize = right.iter().product();
    if rows != cols {
        return Err(LinalgError::invalid_argument(
            op,
            format!(
                "Expected self to satisfy the requirement prod(self.shape[ind:]) == prod(self.shape[:ind]), \
                 but got {} != {}",
                cols, rows
            ),
        ));
    }

    let a = to_faer(input.as_slice(), rows, cols);
    let a_inv = solve_square(op, a.as_ref(), Mat::<f64>::identity(rows, rows))?;
    let shape: Vec<usize> = right.iter().chain(left).copied().collect();
    Ok(Tensor::from_shape_vec(&shape, from_faer(a_inv.as_ref()))?)
}

/// Solves `tensordot(input, x, other.ndim()) == other` for `x`.
///
/// When `dims` is given those dimensions of `input` are moved to the end first.
/// The result has shape `input.shape()[other.ndim()..]`.
pub fn tensorsolve<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    other: &Tensor<T, D>,
    dims: Option<&[isize]>,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_tensorsolve";
    let moved;
    let a = match dims {
        Some(dims) => {
            let ndim = input.ndim();
            let tail = normalize_dims(op, dims, ndim)?;
            let perm: Vec<usize> = (0..ndim)
                .filter(|d| !tail.contains(d))
                .chain(tail.iter().copied())
                .collect();
            moved = input.permute(&perm)?;
            &moved
        }
        None => input,
    };

    let mismatch = || LinalgError::ShapeMismatch {
        op,
        lhs: a.shape().to_vec(),
        rhs: other.shape().to_vec(),
    };
    if other.ndim() > a.ndim() {
        return Err(mismatch());
    }
    let (lead, result_shape) = a.shape().split_at(other.ndim());
    let rows: usize = lead.iter().product();
    let cols: usize = result_shape.iter().product();
    if rows != cols {
        return Err(LinalgError::invalid_argument(
            op,
            format!(
                "Expected self to satisfy the requirement prod(self.shape[other.ndim:]) == \
                 prod(self.shape[:other.ndim]), but got {} != {}",
                cols, rows
            ),
        ));
    }
    if other.numel() != rows {
        return Err(mismatch());
    }

    let x = solve_square(
        op,
        to_faer(a.as_slice(), rows, cols).as_ref(),
        to_faer(other.as_slice(), rows, 1),
    )?;
    Ok(Tensor::from_shape_vec(result_shape, from_faer(x.as_ref()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tensile_tensor::Cpu;

    #[test]
    fn test_tensorinv_shape_and_values() -> Result<(), LinalgError> {
        // 4x4 diagonal viewed as (4, 2, 2)
        let a = Tensor::<f64, Cpu>::from_shape_fn(&[4, 2, 2], |idx| {
            if idx[0] == idx[1] * 2 + idx[2] {
                (idx[0] + 1) as f64
            } else {
                0.0
            }
        });
        let inv = tensorinv(&a, 1)?;
        assert_eq!(inv.shape(), &[2, 2, 4]);
        assert_relative_eq!(*inv.get(&[1, 1, 3]).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(*inv.get(&[0, 1, 1]).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(*inv.get(&[0, 1, 0]).unwrap(), 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_tensorinv_rejects_bad_ind() {
        let a = Tensor::<f64, Cpu>::zeros(&[2, 3]);
        assert!(matches!(tensorinv(&a, 0), Err(LinalgError::InvalidArgument { .. })));
        assert!(matches!(tensorinv(&a, 1), Err(LinalgError::InvalidArgument { .. })));
    }

    #[test]
    fn test_tensorsolve_roundtrip() -> Result<(), LinalgError> {
        // A: (2, 3, 6) with the matrix view (6, 6) = 2 I + J
        let a = Tensor::<f64, Cpu>::from_shape_fn(&[2, 3, 6], |idx| {
            let row = idx[0] * 3 + idx[1];
            if row == idx[2] {
                3.0
            } else {
                1.0
            }
        });
        // x = 1 everywhere gives b = 2 + 6 = 8
        let b = Tensor::<f64, Cpu>::from_shape_val(&[2, 3], 8.0);
        let x = tensorsolve(&a, &b, None)?;
        assert_eq!(x.shape(), &[6]);
        for v in x.as_slice() {
            assert_relative_eq!(*v, 1.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_tensorsolve_moves_dims() -> Result<(), LinalgError> {
        // moving dim 0 to the end is the same as solving with the transpose
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[2, 2], vec![2.0, 0.0, 1.0, 4.0])?;
        let b = Tensor::<f64, Cpu>::from_shape_vec(&[2], vec![2.0, 4.0])?;
        let direct = tensorsolve(&a.permute(&[1, 0])?, &b, None)?;
        let moved = tensorsolve(&a, &b, Some(&[0][..]))?;
        assert_eq!(direct.shape(), moved.shape());
        for (d, m) in direct.as_slice().iter().zip(moved.as_slice()) {
            assert_relative_eq!(*d, *m, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_tensorsolve_rhs_mismatch() {
        let a = Tensor::<f64, Cpu>::eye(3);
        let b = Tensor::<f64, Cpu>::zeros(&[2, 2, 2]);
        assert!(matches!(
            tensorsolve(&a, &b, None),
            Err(LinalgError::ShapeMismatch { .. })
        ));
    }
}
