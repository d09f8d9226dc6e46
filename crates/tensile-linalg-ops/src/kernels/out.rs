//! Writing computed values into caller-provided output tensors.

use tensile_tensor::{Backend, Tensor};

/// Copies `value` into `result`, resizing it if needed, and hands back the
/// same handle.
///
/// A non-empty `result` whose shape differs from `value` is resized with a
/// warning. An empty `result` is resized silently.
pub fn write_out<'a, T, D>(result: &'a mut Tensor<T, D>, value: &Tensor<T, D>) -> &'a mut Tensor<T, D>
where
    T: Clone,
    D: Backend,
{
    if !result.is_empty() && result.shape() != value.shape() {
        log::warn!(
            "An output with one or more elements was resized since it had shape {:?}, \
             which does not match the required output shape {:?}",
            result.shape(),
            value.shape()
        );
    }
    result.copy_from(value);
    result
}
