#![deny(missing_docs)]
//! Linear algebra as free functions over [`Tensor`](tensile_tensor::Tensor).
//!
//! Every function forwards to the [`LinalgDispatch`] implementation of the
//! tensor's backend marker and returns its result untouched. Output variants
//! (`*_out`) write into a caller-provided tensor and hand the same handle back.
//!
//! # Example
//!
//! ```
//! use tensile_linalg::{cholesky, det, norm, NormOptions, NormOrd};
//! use tensile_tensor::{Cpu, Tensor};
//!
//! let a = Tensor::<f64, Cpu>::from_shape_vec(&[2, 2], vec![4.0, 2.0, 2.0, 3.0]).unwrap();
//! let l = cholesky(&a).unwrap();
//! assert_eq!(l.as_slice()[0], 2.0);
//!
//! let d = det(&a).unwrap();
//! assert!((d.as_slice()[0] - 8.0).abs() < 1e-12);
//!
//! let fro = norm(&a, Some(NormOrd::Label("fro")), NormOptions::default()).unwrap();
//! assert!((fro.as_slice()[0] - 33f64.sqrt()).abs() < 1e-12);
//! ```

/// Factorizations: Cholesky, symmetric eigendecomposition, Householder products.
pub mod decomposition;

/// Scalar-valued matrix functions: determinants, norms and rank.
pub mod matrix;

/// Inverses and solvers.
pub mod solve;

pub use decomposition::{
    cholesky, cholesky_out, eigh, eigh_out, eigvalsh, eigvalsh_out, householder_product,
    householder_product_out,
};
pub use matrix::{det, matrix_rank, matrix_rank_out, norm, norm_out, slogdet, slogdet_out};
pub use solve::{
    inv, inv_out, lstsq, pinv, pinv_out, solve, solve_out, tensorinv, tensorinv_out, tensorsolve,
    tensorsolve_out,
};

pub use tensile_linalg_ops::{
    LinalgDispatch, LinalgError, Lstsq, LstsqOptions, MatrixRankOptions, NormOptions, NormOrd,
    PinvOptions,
};
