//! Batching helpers shared by the kernels and the conversions to and from
//! `faer` matrices.

use faer::{Mat, MatRef};
use tensile_tensor::{Backend, Element, FloatElement, Tensor};

use crate::error::LinalgError;

/// Copies a row-major `rows x cols` block into a `faer` matrix.
pub(crate) fn to_faer<T: FloatElement>(data: &[T], rows: usize, cols: usize) -> Mat<f64> {
    Mat::<f64>::from_fn(rows, cols, |i, j| data[i * cols + j].to_f64_lossy())
}

/// Reads a `faer` matrix back in row-major order.
pub(crate) fn from_faer<T: FloatElement>(m: MatRef<'_, f64>) -> Vec<T> {
    let mut out = Vec::with_capacity(m.nrows() * m.ncols());
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            out.push(T::from_f64_lossy(m.read(i, j)));
        }
    }
    out
}

pub(crate) fn transpose(m: MatRef<'_, f64>) -> Mat<f64> {
    Mat::<f64>::from_fn(m.ncols(), m.nrows(), |i, j| m.read(j, i))
}

/// `x[:, i]ᵀ a y[:, j]`.
pub(crate) fn bilinear(
    x: MatRef<'_, f64>,
    a: MatRef<'_, f64>,
    y: MatRef<'_, f64>,
    i: usize,
    j: usize,
) -> f64 {
    let mut acc = 0.0;
    for r in 0..a.nrows() {
        let xr = x.read(r, i);
        if xr == 0.0 {
            continue;
        }
        let mut row = 0.0;
        for c in 0..a.ncols() {
            row += a.read(r, c) * y.read(c, j);
        }
        acc += xr * row;
    }
    acc
}

/// Iterative decompositions fail on NaN or infinite entries.
pub(crate) fn ensure_finite(op: &'static str, m: MatRef<'_, f64>) -> Result<(), LinalgError> {
    for j in 0..m.ncols() {
        for i in 0..m.nrows() {
            if !m.read(i, j).is_finite() {
                return Err(LinalgError::NoConvergence { op });
            }
        }
    }
    Ok(())
}

/// Splits a shape into batch dimensions and the trailing `(rows, cols)`.
pub(crate) fn matrix_dims<'a>(
    op: &'static str,
    shape: &'a [usize],
) -> Result<(&'a [usize], usize, usize), LinalgError> {
    if shape.len() < 2 {
        return Err(LinalgError::DimensionTooSmall {
            op,
            expected: 2,
            actual: shape.len(),
        });
    }
    let (batch, mat) = shape.split_at(shape.len() - 2);
    Ok((batch, mat[0], mat[1]))
}

/// Like [`matrix_dims`] but requires the trailing matrix to be square.
pub(crate) fn square_dims<'a>(
    op: &'static str,
    shape: &'a [usize],
) -> Result<(&'a [usize], usize), LinalgError> {
    let (batch, rows, cols) = matrix_dims(op, shape)?;
    if rows != cols {
        return Err(LinalgError::NotSquare {
            op,
            shape: shape.to_vec(),
        });
    }
    Ok((batch, rows))
}

/// Cuts the data of a batched tensor into `count` matrices of `rows x cols`.
pub(crate) fn split_batch<T: FloatElement>(
    data: &[T],
    count: usize,
    rows: usize,
    cols: usize,
) -> Vec<Mat<f64>> {
    let size = rows * cols;
    (0..count)
        .map(|b| to_faer(&data[b * size..(b + 1) * size], rows, cols))
        .collect()
}

/// Assembles a tensor of shape `batch ++ trailing` from per-batch parts.
pub(crate) fn stack<T: Element, D: Backend>(
    batch: &[usize],
    trailing: &[usize],
    parts: impl IntoIterator<Item = Vec<T>>,
) -> Result<Tensor<T, D>, LinalgError> {
    let mut shape = batch.to_vec();
    shape.extend_from_slice(trailing);
    let data: Vec<T> = parts.into_iter().flatten().collect();
    Ok(Tensor::from_shape_vec(&shape, data)?)
}

/// Broadcasts two batch shapes, aligning them from the right.
pub(crate) fn broadcast_shapes(
    op: &'static str,
    lhs: &[usize],
    rhs: &[usize],
) -> Result<Vec<usize>, LinalgError> {
    let ndim = lhs.len().max(rhs.len());
    let mut out = vec![0; ndim];
    for i in 0..ndim {
        let l = if i < ndim - lhs.len() { 1 } else { lhs[i - (ndim - lhs.len())] };
        let r = if i < ndim - rhs.len() { 1 } else { rhs[i - (ndim - rhs.len())] };
        out[i] = match (l, r) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            _ => {
                return Err(LinalgError::BroadcastError {
                    op,
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                })
            }
        };
    }
    Ok(out)
}

/// Maps a linear index over the broadcast shape `out` to a linear index over `src`.
pub(crate) fn broadcast_source_index(out: &[usize], src: &[usize], linear: usize) -> usize {
    let offset = out.len() - src.len();
    let mut rem = linear;
    let mut index = 0;
    let mut stride = 1;
    for k in (0..out.len()).rev() {
        let i = rem % out[k];
        rem /= out[k];
        if k >= offset {
            let dim = src[k - offset];
            if dim != 1 {
                index += i * stride;
            }
            stride *= dim;
        }
    }
    index
}

/// Wraps a possibly negative dimension index into `0..ndim`.
pub(crate) fn normalize_dim(dim: isize, ndim: usize) -> Result<usize, LinalgError> {
    let n = ndim as isize;
    if dim < -n || dim >= n {
        return Err(LinalgError::InvalidDimension { dim, ndim });
    }
    Ok(if dim < 0 { (dim + n) as usize } else { dim as usize })
}

/// Wraps a list of dimensions, rejecting duplicates.
pub(crate) fn normalize_dims(
    op: &'static str,
    dims: &[isize],
    ndim: usize,
) -> Result<Vec<usize>, LinalgError> {
    let mut out = Vec::with_capacity(dims.len());
    for &d in dims {
        let d = normalize_dim(d, ndim)?;
        if out.contains(&d) {
            return Err(LinalgError::invalid_argument(
                op,
                format!("dim {} appears multiple times in the list of dims", d),
            ));
        }
        out.push(d);
    }
    Ok(out)
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Row-major `(m x k) * (k x n)`.
    pub(crate) fn matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
        let mut out = vec![0.0; m * n];
        for i in 0..m {
            for p in 0..k {
                let x = a[i * k + p];
                for j in 0..n {
                    out[i * n + j] += x * b[p * n + j];
                }
            }
        }
        out
    }

    pub(crate) fn transpose(a: &[f64], rows: usize, cols: usize) -> Vec<f64> {
        let mut out = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                out[j * rows + i] = a[i * cols + j];
            }
        }
        out
    }

    /// Entries drawn uniformly from `[-1, 1)`.
    pub(crate) fn random_matrix(rows: usize, cols: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..rows * cols).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    pub(crate) fn random_symmetric(n: usize, seed: u64) -> Vec<f64> {
        let a = random_matrix(n, n, seed);
        let mut out = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                out[i * n + j] = 0.5 * (a[i * n + j] + a[j * n + i]);
            }
        }
        out
    }

    pub(crate) fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).fold(0.0, |acc, (x, y)| f64::max(acc, (x - y).abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensile_tensor::Cpu;

    #[test]
    fn test_faer_roundtrip() {
        let data = vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = to_faer(&data, 2, 3);
        assert_eq!(m.read(1, 0), 4.0);
        let t = transpose(m.as_ref());
        assert_eq!((t.nrows(), t.ncols()), (3, 2));
        assert_eq!(t.read(2, 1), 6.0);
        assert_eq!(from_faer::<f32>(m.as_ref()), data);
    }

    #[test]
    fn test_bilinear() {
        let a = to_faer(&[2.0f64, 1.0, 1.0, 3.0], 2, 2);
        let x = to_faer(&[1.0f64, 0.0, 1.0, 1.0], 2, 2);
        // e0ᵀ A e0 and [0, 1]ᵀ A [0, 1]
        assert_eq!(bilinear(x.as_ref(), a.as_ref(), x.as_ref(), 0, 0), 7.0);
        assert_eq!(bilinear(x.as_ref(), a.as_ref(), x.as_ref(), 1, 1), 3.0);
    }

    #[test]
    fn test_ensure_finite() {
        let ok = to_faer(&[1.0f64, 2.0], 1, 2);
        assert!(ensure_finite("op", ok.as_ref()).is_ok());
        let bad = to_faer(&[1.0f64, f64::NAN], 1, 2);
        assert_eq!(
            ensure_finite("op", bad.as_ref()),
            Err(LinalgError::NoConvergence { op: "op" })
        );
    }

    #[test]
    fn test_matrix_dims() -> Result<(), LinalgError> {
        let (batch, m, n) = matrix_dims("op", &[4, 2, 3])?;
        assert_eq!((batch, m, n), (&[4][..], 2, 3));
        assert_eq!(
            matrix_dims("op", &[3]).unwrap_err(),
            LinalgError::DimensionTooSmall {
                op: "op",
                expected: 2,
                actual: 1
            }
        );
        assert!(matches!(
            square_dims("op", &[2, 3]),
            Err(LinalgError::NotSquare { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_broadcast_shapes() -> Result<(), LinalgError> {
        assert_eq!(broadcast_shapes("op", &[2, 1], &[3])?, vec![2, 3]);
        assert_eq!(broadcast_shapes("op", &[], &[5])?, vec![5]);
        assert!(broadcast_shapes("op", &[2], &[3]).is_err());
        Ok(())
    }

    #[test]
    fn test_broadcast_source_index() {
        // out [2, 3], src [3]: row index is ignored
        assert_eq!(broadcast_source_index(&[2, 3], &[3], 4), 1);
        // out [2, 3], src [2, 1]: column index is ignored
        assert_eq!(broadcast_source_index(&[2, 3], &[2, 1], 4), 1);
        assert_eq!(broadcast_source_index(&[2, 3], &[], 5), 0);
    }

    #[test]
    fn test_normalize_dims() {
        assert_eq!(normalize_dims("op", &[-1, 0], 3), Ok(vec![2, 0]));
        assert_eq!(
            normalize_dim(3, 3),
            Err(LinalgError::InvalidDimension { dim: 3, ndim: 3 })
        );
        assert!(matches!(
            normalize_dims("op", &[1, -2], 3),
            Err(LinalgError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_split_batch_and_stack() -> Result<(), LinalgError> {
        let t = Tensor::<f64, Cpu>::from_shape_fn(&[2, 2, 2], |idx| {
            (idx[0] * 4 + idx[1] * 2 + idx[2]) as f64
        });
        let mats = split_batch(t.as_slice(), 2, 2, 2);
        assert_eq!(mats[1].read(1, 0), 6.0);
        let back: Tensor<f64, Cpu> =
            stack(&[2], &[2, 2], mats.iter().map(|m| from_faer(m.as_ref())))?;
        assert_eq!(back, t);
        Ok(())
    }
}
