use tensile_linalg_ops::{LinalgDispatch, LinalgError, Lstsq, LstsqOptions, PinvOptions};
use tensile_tensor::{FloatElement, Tensor};

/// Computes the inverse of a batch of square matrices.
///
/// # Errors
///
/// Returns [`LinalgError::Singular`] if a matrix is not invertible.
pub fn inv<T, D>(input: &Tensor<T, D>) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_inv(input)
}

/// Output variant of [`inv`].
pub fn inv_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_inv_out(result, input)
}

/// Computes the Moore-Penrose pseudo-inverse.
///
/// `PinvOptions::default()` is `rcond = 1e-15, hermitian = false`.
///
/// # Example
///
/// ```
/// use tensile_linalg::{pinv, PinvOptions};
/// use tensile_tensor::{Cpu, Tensor};
///
/// let a = Tensor::<f64, Cpu>::from_shape_vec(&[2, 1], vec![1.0, 1.0]).unwrap();
/// let p = pinv(&a, PinvOptions::default()).unwrap();
/// assert_eq!(p.shape(), &[1, 2]);
/// assert!((p.as_slice()[0] - 0.5).abs() < 1e-12);
/// ```
pub fn pinv<T, D>(input: &Tensor<T, D>, options: PinvOptions) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_pinv(input, &options)
}

/// Output variant of [`pinv`].
pub fn pinv_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    options: PinvOptions,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_pinv_out(result, input, &options)
}

/// Solves `input X = other`.
///
/// `other` is a batch of vectors when it is one-dimensional or its shape is
/// `input.shape()[..-1]`; otherwise it is a batch of matrices. Batch
/// dimensions broadcast.
pub fn solve<T, D>(input: &Tensor<T, D>, other: &Tensor<T, D>) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_solve(input, other)
}

/// Output variant of [`solve`].
pub fn solve_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    other: &Tensor<T, D>,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_solve_out(result, input, other)
}

/// Computes a least squares solution of `input X = other`.
pub fn lstsq<T, D>(
    input: &Tensor<T, D>,
    other: &Tensor<T, D>,
    options: LstsqOptions,
) -> Result<Lstsq<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_lstsq(input, other, &options)
}

/// Computes the inverse of `input` viewed as a matrix over its first `ind`
/// and remaining dimensions.
pub fn tensorinv<T, D>(input: &Tensor<T, D>, ind: usize) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_tensorinv(input, ind)
}

/// Output variant of [`tensorinv`].
pub fn tensorinv_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    ind: usize,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_tensorinv_out(result, input, ind)
}

/// Solves the tensor equation `tensordot(input, x, other.ndim()) = other`.
///
/// The dimensions in `dims`, if given, are moved to the end of `input` first.
pub fn tensorsolve<T, D>(
    input: &Tensor<T, D>,
    other: &Tensor<T, D>,
    dims: Option<&[isize]>,
) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_tensorsolve(input, other, dims)
}

/// Output variant of [`tensorsolve`].
pub fn tensorsolve_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    other: &Tensor<T, D>,
    dims: Option<&[isize]>,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_tensorsolve_out(result, input, other, dims)
}
