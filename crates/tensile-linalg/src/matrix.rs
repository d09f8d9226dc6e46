use tensile_linalg_ops::{LinalgDispatch, LinalgError, MatrixRankOptions, NormOptions, NormOrd};
use tensile_tensor::{FloatElement, Tensor};

/// Computes the determinant of a batch of square matrices.
pub fn det<T, D>(input: &Tensor<T, D>) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_det(input)
}

/// Computes the sign and the natural logarithm of the absolute determinant.
///
/// Singular matrices give a sign of `0` and `-inf`.
pub fn slogdet<T, D>(input: &Tensor<T, D>) -> Result<(Tensor<T, D>, Tensor<T, D>), LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_slogdet(input)
}

/// Output variant of [`slogdet`].
pub fn slogdet_out<'a, T, D>(
    sign: &'a mut Tensor<T, D>,
    logabsdet: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
) -> Result<(&'a mut Tensor<T, D>, &'a mut Tensor<T, D>), LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_slogdet_out(sign, logabsdet, input)
}

/// Computes a vector or matrix norm.
///
/// # Arguments
///
/// * `input` - The tensor to reduce.
/// * `ord` - A numeric order or a label (`"fro"`, `"nuc"`). `None` selects
///   the 2-norm of the flattened input, or the Frobenius norm when two
///   dimensions are given.
/// * `options` - Dimensions to reduce, keepdim and computation precision.
///
/// # Example
///
/// ```
/// use tensile_linalg::{norm, NormOptions};
/// use tensile_tensor::{Cpu, Tensor};
///
/// let v = Tensor::<f64, Cpu>::from_shape_vec(&[2], vec![3.0, 4.0]).unwrap();
/// let n = norm(&v, None, NormOptions::default()).unwrap();
/// assert_eq!(n.as_slice(), &[5.0]);
/// ```
pub fn norm<T, D>(
    input: &Tensor<T, D>,
    ord: Option<NormOrd<'_>>,
    options: NormOptions,
) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    match ord {
        Some(NormOrd::Label(label)) => D::linalg_norm_str(input, label, &options),
        Some(NormOrd::Value(value)) => D::linalg_norm(input, Some(value), &options),
        None => D::linalg_norm(input, None, &options),
    }
}

/// Output variant of [`norm`].
pub fn norm_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    ord: Option<NormOrd<'_>>,
    options: NormOptions,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    match ord {
        Some(NormOrd::Label(label)) => D::linalg_norm_str_out(result, input, label, &options),
        Some(NormOrd::Value(value)) => D::linalg_norm_out(result, input, Some(value), &options),
        None => D::linalg_norm_out(result, input, None, &options),
    }
}

/// Computes the numerical rank of a batch of matrices.
pub fn matrix_rank<T, D>(
    input: &Tensor<T, D>,
    options: MatrixRankOptions,
) -> Result<Tensor<i64, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_matrix_rank(input, &options)
}

/// Output variant of [`matrix_rank`].
pub fn matrix_rank_out<'a, T, D>(
    result: &'a mut Tensor<i64, D>,
    input: &Tensor<T, D>,
    options: MatrixRankOptions,
) -> Result<&'a mut Tensor<i64, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_matrix_rank_out(result, input, &options)
}
