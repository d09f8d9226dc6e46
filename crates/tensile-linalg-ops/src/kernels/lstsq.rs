//! Least squares solutions of `A X = B`.

use faer::prelude::SpSolverLstsq;
use faer::{Mat, MatRef};
use tensile_tensor::{Backend, FloatElement, Tensor};

use super::matrix::{
    broadcast_shapes, broadcast_source_index, from_faer, matrix_dims, split_batch, stack,
    transpose,
};
use super::svd::svd;
use crate::dispatch::Lstsq;
use crate::error::LinalgError;
use crate::options::LstsqOptions;

/// Least squares driver names accepted by `linalg_lstsq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LstsqDriver {
    /// QR based, requires full rank.
    Gels,
    /// Rank revealing, the default.
    Gelsy,
    /// SVD based, also reports singular values.
    Gelsd,
    /// SVD based, also reports singular values.
    Gelss,
}

impl LstsqDriver {
    /// Parses a driver name, `None` selecting [`LstsqDriver::Gelsy`].
    pub fn parse(driver: Option<&str>) -> Result<Self, LinalgError> {
        match driver {
            None | Some("gelsy") => Ok(Self::Gelsy),
            Some("gels") => Ok(Self::Gels),
            Some("gelsd") => Ok(Self::Gelsd),
            Some("gelss") => Ok(Self::Gelss),
            Some(other) => Err(LinalgError::invalid_argument(
                "linalg_lstsq",
                format!(
                    "parameter `driver` should be one of (gels, gelsy, gelsd, gelss), got {}",
                    other
                ),
            )),
        }
    }

    fn reports_singular_values(self) -> bool {
        matches!(self, Self::Gelsd | Self::Gelss)
    }
}

const OP: &str = "linalg_lstsq";

fn check_full_rank(r: MatRef<'_, f64>) -> Result<(), LinalgError> {
    match (0..r.nrows().min(r.ncols())).find(|&i| r.read(i, i) == 0.0) {
        Some(i) => Err(LinalgError::Singular { op: OP, pivot: i + 1 }),
        None => Ok(()),
    }
}

/// Full rank least squares through QR, minimum norm when `m < n`.
fn gels(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Result<Mat<f64>, LinalgError> {
    let (m, n) = (a.nrows(), a.ncols());
    let k = b.ncols();
    if m.min(n) == 0 {
        return Ok(Mat::zeros(n, k));
    }
    if m >= n {
        let qr = a.qr();
        check_full_rank(qr.compute_thin_r().as_ref())?;
        let x = qr.solve_lstsq(b.to_owned());
        return Ok(Mat::<f64>::from_fn(n, k, |i, j| x.read(i, j)));
    }

    // A = Rᵀ Qᵀ: solve Rᵀ z = b, then x = Q z
    let at = transpose(a);
    let qr = at.as_ref().qr();
    let r = qr.compute_thin_r();
    check_full_rank(r.as_ref())?;
    let q = qr.compute_thin_q();
    let mut z = Mat::<f64>::zeros(m, k);
    for c in 0..k {
        for i in 0..m {
            let mut s = b.read(i, c);
            for j in 0..i {
                s -= r.read(j, i) * z.read(j, c);
            }
            z.write(i, c, s / r.read(i, i));
        }
    }
    Ok(Mat::<f64>::from_fn(n, k, |i, c| {
        (0..m).fold(0.0, |acc, j| acc + q.read(i, j) * z.read(j, c))
    }))
}

/// Minimum norm solution through the SVD, dropping singular values at or
/// below `rcond * max(s)`. Returns the solution, the effective rank and the
/// singular values.
fn svd_solve(
    a: MatRef<'_, f64>,
    b: MatRef<'_, f64>,
    rcond: f64,
) -> Result<(Mat<f64>, usize, Vec<f64>), LinalgError> {
    let svd = svd(OP, a)?;
    let cutoff = rcond * svd.max_singular();
    let rank = svd.s.iter().filter(|&&s| s > cutoff).count();

    let (m, n) = (a.nrows(), a.ncols());
    let mut x = Mat::<f64>::zeros(n, b.ncols());
    for r in 0..rank {
        let inv = svd.s[r].recip();
        for c in 0..b.ncols() {
            let ub = (0..m).fold(0.0, |acc, i| acc + svd.u.read(i, r) * b.read(i, c));
            let coeff = ub * inv;
            for j in 0..n {
                x.write(j, c, x.read(j, c) + svd.v.read(j, r) * coeff);
            }
        }
    }
    Ok((x, rank, svd.s))
}

/// Squared residual norm of every column of `A x - b`.
fn residual_norms(a: MatRef<'_, f64>, x: MatRef<'_, f64>, b: MatRef<'_, f64>) -> Vec<f64> {
    (0..b.ncols())
        .map(|c| {
            (0..a.nrows()).fold(0.0, |acc, row| {
                let ax = (0..a.ncols()).fold(0.0, |s, j| s + a.read(row, j) * x.read(j, c));
                let d = ax - b.read(row, c);
                acc + d * d
            })
        })
        .collect()
}

/// Least squares with broadcasting over batch dimensions.
///
/// `residuals` is filled only when `m > n` and every matrix in the batch has
/// full rank. `rank` is empty for `gels`, `singular_values` is filled only
/// for `gelsd` and `gelss`.
pub fn lstsq<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    other: &Tensor<T, D>,
    options: &LstsqOptions,
) -> Result<Lstsq<T, D>, LinalgError> {
    let driver = LstsqDriver::parse(options.driver.as_deref())?;
    let (a_batch, m, n) = matrix_dims(OP, input.shape())?;
    let (b_batch, rows, k) = matrix_dims(OP, other.shape())?;
    if rows != m {
        return Err(LinalgError::ShapeMismatch {
            op: OP,
            lhs: input.shape().to_vec(),
            rhs: other.shape().to_vec(),
        });
    }
    let out_batch = broadcast_shapes(OP, a_batch, b_batch)?;
    let count: usize = out_batch.iter().product();
    let rcond = options
        .cond
        .unwrap_or_else(|| T::epsilon().to_f64_lossy() * m.max(n) as f64);
    log::debug!(
        "linalg_lstsq: driver {:?}, {} problems of {}x{} with {} rhs",
        driver,
        count,
        m,
        n,
        k
    );

    let lhs = split_batch(input.as_slice(), a_batch.iter().product(), m, n);
    let rhs = split_batch(other.as_slice(), b_batch.iter().product(), m, k);

    let mut solutions = Vec::with_capacity(count);
    let mut residuals = Vec::with_capacity(count);
    let mut ranks = Vec::with_capacity(count);
    let mut singular_values = Vec::with_capacity(count);
    let mut full_rank = true;

    for i in 0..count {
        let a = lhs[broadcast_source_index(&out_batch, a_batch, i)].as_ref();
        let b = rhs[broadcast_source_index(&out_batch, b_batch, i)].as_ref();
        let (x, rank) = match driver {
            LstsqDriver::Gels => (gels(a, b)?, m.min(n)),
            _ => {
                let (x, rank, s) = svd_solve(a, b, rcond)?;
                if driver.reports_singular_values() {
                    singular_values.push(s.into_iter().map(T::from_f64_lossy).collect::<Vec<T>>());
                }
                (x, rank)
            }
        };
        full_rank &= rank == n;
        ranks.push(vec![rank as i64]);
        residuals.push(
            residual_norms(a, x.as_ref(), b)
                .into_iter()
                .map(T::from_f64_lossy)
                .collect::<Vec<T>>(),
        );
        solutions.push(from_faer::<T>(x.as_ref()));
    }

    let residuals = if m > n && full_rank {
        stack(&out_batch, &[k], residuals)?
    } else {
        Tensor::empty()
    };
    let rank = if driver == LstsqDriver::Gels {
        Tensor::empty()
    } else {
        stack(&out_batch, &[], ranks)?
    };
    let singular_values = if driver.reports_singular_values() {
        stack(&out_batch, &[m.min(n)], singular_values)?
    } else {
        Tensor::empty()
    };

    Ok(Lstsq {
        solution: stack(&out_batch, &[n, k], solutions)?,
        residuals,
        rank,
        singular_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::matrix::testing::{matmul, random_matrix, transpose};
    use approx::assert_relative_eq;
    use tensile_tensor::Cpu;

    fn line_fit() -> (Tensor<f64, Cpu>, Tensor<f64, Cpu>) {
        // y = 1 + 2x sampled at x = 0, 1, 2, 3 with noise on two samples
        let a = Tensor::from_shape_vec(&[4, 2], vec![1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0])
            .unwrap();
        let b = Tensor::from_shape_vec(&[4, 1], vec![1.0, 3.5, 5.0, 6.5]).unwrap();
        (a, b)
    }

    #[test]
    fn test_driver_parse() {
        assert_eq!(LstsqDriver::parse(None), Ok(LstsqDriver::Gelsy));
        assert_eq!(LstsqDriver::parse(Some("gels")), Ok(LstsqDriver::Gels));
        assert!(LstsqDriver::parse(Some("potrf")).is_err());
    }

    #[test]
    fn test_lstsq_drivers_agree() -> Result<(), LinalgError> {
        let (a, b) = line_fit();
        let reference = lstsq(&a, &b, &LstsqOptions::default().with_driver("gels"))?;
        for driver in ["gelsy", "gelsd", "gelss"] {
            let out = lstsq(&a, &b, &LstsqOptions::default().with_driver(driver))?;
            for (got, want) in out.solution.as_slice().iter().zip(reference.solution.as_slice()) {
                assert_relative_eq!(*got, *want, epsilon = 1e-10);
            }
        }
        Ok(())
    }

    #[test]
    fn test_lstsq_outputs_per_driver() -> Result<(), LinalgError> {
        let (a, b) = line_fit();

        let gels = lstsq(&a, &b, &LstsqOptions::default().with_driver("gels"))?;
        assert_eq!(gels.solution.shape(), &[2, 1]);
        assert_eq!(gels.residuals.shape(), &[1]);
        assert!(gels.rank.is_empty());
        assert!(gels.singular_values.is_empty());

        let gelsd = lstsq(&a, &b, &LstsqOptions::default().with_driver("gelsd"))?;
        assert_eq!(gelsd.rank.as_slice(), &[2]);
        assert_eq!(gelsd.singular_values.shape(), &[2]);

        let x = gelsd.solution.as_slice();
        let expected_residual: f64 = [(0.0, 1.0), (1.0, 3.5), (2.0, 5.0), (3.0, 6.5)]
            .iter()
            .map(|(t, y)| {
                let d = x[0] + x[1] * t - y;
                d * d
            })
            .sum();
        assert_relative_eq!(gels.residuals.as_slice()[0], expected_residual, epsilon = 1e-10);
        Ok(())
    }

    #[test]
    fn test_lstsq_underdetermined_min_norm() -> Result<(), LinalgError> {
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[1, 2], vec![1.0, 1.0])?;
        let b = Tensor::<f64, Cpu>::from_shape_vec(&[1, 1], vec![2.0])?;
        for driver in ["gels", "gelsy"] {
            let out = lstsq(&a, &b, &LstsqOptions::default().with_driver(driver))?;
            assert_relative_eq!(out.solution.as_slice()[0], 1.0, epsilon = 1e-12);
            assert_relative_eq!(out.solution.as_slice()[1], 1.0, epsilon = 1e-12);
            assert!(out.residuals.is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_lstsq_rank_deficient() -> Result<(), LinalgError> {
        let a = Tensor::<f64, Cpu>::from_shape_vec(&[3, 2], vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0])?;
        let b = Tensor::<f64, Cpu>::from_shape_vec(&[3, 1], vec![1.0, 2.0, 3.0])?;
        let out = lstsq(&a, &b, &LstsqOptions::default())?;
        assert_eq!(out.rank.as_slice(), &[1]);
        assert!(out.residuals.is_empty());
        assert!(matches!(
            lstsq(&a, &b, &LstsqOptions::default().with_driver("gels")),
            Err(LinalgError::Singular {
                op: "linalg_lstsq",
                pivot: 2
            })
        ));
        Ok(())
    }

    #[test]
    fn test_lstsq_row_mismatch() {
        let a = Tensor::<f64, Cpu>::zeros(&[3, 2]);
        let b = Tensor::<f64, Cpu>::zeros(&[2, 1]);
        assert!(matches!(
            lstsq(&a, &b, &LstsqOptions::default()),
            Err(LinalgError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_lstsq_size_sweep() -> Result<(), LinalgError> {
        for (m, n) in [(16, 8), (32, 32), (64, 40), (96, 64)] {
            let data = random_matrix(m, n, (m * n) as u64);
            let a = Tensor::<f64, Cpu>::from_shape_vec(&[m, n], data.clone())?;
            let b = Tensor::<f64, Cpu>::from_shape_vec(&[m, 2], random_matrix(m, 2, m as u64))?;
            let gels = lstsq(&a, &b, &LstsqOptions::default().with_driver("gels"))?;
            for driver in ["gelsy", "gelsd"] {
                let out = lstsq(&a, &b, &LstsqOptions::default().with_driver(driver))?;
                for (got, want) in out.solution.as_slice().iter().zip(gels.solution.as_slice()) {
                    assert_relative_eq!(*got, *want, epsilon = 1e-8);
                }
            }

            // normal equations: Aᵀ (A x - b) = 0
            let ax = matmul(&data, gels.solution.as_slice(), m, n, 2);
            let r: Vec<f64> = ax.iter().zip(b.as_slice()).map(|(p, q)| p - q).collect();
            let atr = matmul(&transpose(&data, m, n), &r, n, m, 2);
            assert!(
                atr.iter().all(|v| v.abs() < 1e-9),
                "lstsq residual of {}x{} is not orthogonal to the columns",
                m,
                n
            );
        }
        Ok(())
    }
}
