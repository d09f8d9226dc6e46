//! Thin singular value decomposition.

use faer::{Mat, MatRef};

use super::matrix::{bilinear, ensure_finite};
use crate::error::LinalgError;

/// `A = U diag(s) Vᵀ` with `U: m x k`, `V: n x k`, `k = min(m, n)`.
///
/// Singular values are sorted in descending order.
pub(crate) struct Svd {
    pub(crate) u: Mat<f64>,
    pub(crate) s: Vec<f64>,
    pub(crate) v: Mat<f64>,
}

impl Svd {
    /// Largest singular value, zero for empty matrices.
    pub(crate) fn max_singular(&self) -> f64 {
        self.s.first().copied().unwrap_or(0.0)
    }
}

pub(crate) fn svd(op: &'static str, a: MatRef<'_, f64>) -> Result<Svd, LinalgError> {
    ensure_finite(op, a)?;
    let (m, n) = (a.nrows(), a.ncols());
    let k = m.min(n);
    if k == 0 {
        return Ok(Svd {
            u: Mat::zeros(m, 0),
            s: Vec::new(),
            v: Mat::zeros(n, 0),
        });
    }

    let full = a.svd();
    let (u, v) = (full.u(), full.v());
    // s_j = u_jᵀ A v_j
    let s: Vec<f64> = (0..k).map(|j| bilinear(u, a, v, j, j).max(0.0)).collect();
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&i, &j| s[j].total_cmp(&s[i]));

    Ok(Svd {
        u: Mat::<f64>::from_fn(m, k, |i, j| u.read(i, order[j])),
        s: order.iter().map(|&j| s[j]).collect(),
        v: Mat::<f64>::from_fn(n, k, |i, j| v.read(i, order[j])),
    })
}
