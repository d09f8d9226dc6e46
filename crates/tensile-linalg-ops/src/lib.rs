#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Host implementation of [`LinalgDispatch`] for [`tensile_tensor::Cpu`].
mod cpu;

/// The dispatch trait that backends implement.
///
/// Defines [`LinalgDispatch`] and the [`Lstsq`] result bundle.
pub mod dispatch;

/// Error types for linear algebra operations.
pub mod error;

pub mod kernels;

pub mod options;

pub use dispatch::{LinalgDispatch, Lstsq};
pub use error::LinalgError;
pub use kernels::lstsq::LstsqDriver;
pub use options::{
    LstsqOptions, MatrixRankOptions, NormOptions, NormOrd, PinvOptions, DEFAULT_PINV_RCOND,
};
