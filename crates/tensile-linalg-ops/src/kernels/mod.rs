//! Reference host kernels.
//!
//! Every kernel reads its inputs through [`Tensor::as_slice`](tensile_tensor::Tensor::as_slice)
//! and is generic over the backend marker, so any host-resident backend can
//! forward to them from its [`LinalgDispatch`](crate::LinalgDispatch) impl.
//!
//! Factorizations run on `faer::Mat<f64>` copies of each batch matrix; the
//! results are cast back to the element type.

/// Cholesky factorization.
pub mod cholesky;
pub mod eigh;
pub mod householder;
pub mod lstsq;
pub mod lu;
pub(crate) mod matrix;
pub mod norm;
pub mod out;
pub mod rank;
pub(crate) mod svd;
pub mod tensor_ops;
