#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use tensile_tensor as tensor;

#[doc(inline)]
pub use tensile_linalg as linalg;

#[doc(inline)]
pub use tensile_linalg_ops as linalg_ops;
