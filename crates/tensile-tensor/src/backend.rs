//! Backend marker types for compile-time dispatch.
//!
//! The backend is encoded in the tensor type, `Tensor<T, D>`. Operation
//! crates implement their dispatch traits for a marker, and generic code
//! written against `D: Backend` is monomorphized per backend with no runtime
//! lookup.
//!
//! # Examples
//!
//! ```
//! use tensile_tensor::{Backend, Cpu, Device, Tensor};
//!
//! fn scale<D: Backend>(tensor: &Tensor<f32, D>, factor: f32) -> Tensor<f32, D> {
//!     tensor.map(|&x| x * factor)
//! }
//!
//! let t = Tensor::<f32, Cpu>::from_shape_val(&[2, 2], 1.0);
//! assert_eq!(scale(&t, 2.0).as_slice(), &[2.0; 4]);
//! assert_eq!(Cpu::device(), Device::Cpu);
//! ```

use crate::device::Device;

/// Marker trait for backends.
///
/// Implementors are zero-sized types. The trait is open so that external
/// runtimes can register their own marker and implement the operation
/// traits for it.
pub trait Backend: Clone + Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Returns the device where this backend's tensors live.
    fn device() -> Device;
}

/// Zero-sized type representing the host backend.
///
/// This is the default backend of [`crate::Tensor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cpu;

impl Backend for Cpu {
    fn device() -> Device {
        Device::Cpu
    }
}
