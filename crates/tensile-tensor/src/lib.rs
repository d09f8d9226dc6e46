#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `tensile-tensor` provides the array handle that flows through the
//! `tensile-linalg` facade. A [`Tensor`] owns a contiguous row-major buffer,
//! a dynamic shape and a zero-sized backend marker. The marker is the
//! dispatch key: operations on a `Tensor<T, D>` are routed to the
//! implementation registered for `D`.
//!
//! # Quick Start
//!
//! ```rust
//! use tensile_tensor::{Cpu, Tensor};
//!
//! let t = Tensor::<f64, Cpu>::from_shape_vec(&[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! assert_eq!(t.shape(), &[2, 3]);
//! assert_eq!(t.get(&[1, 2]), Some(&6.0));
//!
//! let r = t.reshape(&[3, 2]).unwrap();
//! assert_eq!(r.strides(), &[2, 1]);
//! ```

pub mod backend;

/// Device descriptions reported by backends.
pub mod device;

/// Element types and their runtime tags.
pub mod dtype;

pub mod storage;

/// Tensor handle and its error type.
pub mod tensor;

pub use crate::backend::{Backend, Cpu};
pub use crate::device::Device;
pub use crate::dtype::{DType, Element, FloatElement};
pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

/// Type alias for a tensor on the host backend.
pub type CpuTensor<T> = Tensor<T, Cpu>;
