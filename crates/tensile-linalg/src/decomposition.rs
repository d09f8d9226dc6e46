use tensile_linalg_ops::{LinalgDispatch, LinalgError};
use tensile_tensor::{FloatElement, Tensor};

/// Computes the lower Cholesky factor `L` of a symmetric positive-definite
/// matrix, `A = L Lᵀ`.
///
/// # Arguments
///
/// * `input` - A batch of square matrices `(*, n, n)`. Only the lower triangle is read.
///
/// # Errors
///
/// Returns [`LinalgError::NotPositiveDefinite`] if a leading minor is not
/// positive-definite.
pub fn cholesky<T, D>(input: &Tensor<T, D>) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_cholesky(input)
}

/// Output variant of [`cholesky`].
pub fn cholesky_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_cholesky_out(result, input)
}

/// Computes the eigenvalues (ascending) and eigenvectors (as columns) of a
/// symmetric matrix.
///
/// # Arguments
///
/// * `input` - A batch of square matrices `(*, n, n)`.
/// * `uplo` - `"L"` or `"U"`, the triangle to read.
pub fn eigh<T, D>(input: &Tensor<T, D>, uplo: &str) -> Result<(Tensor<T, D>, Tensor<T, D>), LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_eigh(input, uplo)
}

/// Output variant of [`eigh`].
pub fn eigh_out<'a, T, D>(
    eigvals: &'a mut Tensor<T, D>,
    eigvecs: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    uplo: &str,
) -> Result<(&'a mut Tensor<T, D>, &'a mut Tensor<T, D>), LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_eigh_out(eigvals, eigvecs, input, uplo)
}

/// Computes the eigenvalues (ascending) of a symmetric matrix.
pub fn eigvalsh<T, D>(input: &Tensor<T, D>, uplo: &str) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_eigvalsh(input, uplo)
}

/// Output variant of [`eigvalsh`].
pub fn eigvalsh_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    uplo: &str,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_eigvalsh_out(result, input, uplo)
}

/// Computes the first `n` columns of the product of Householder reflectors.
///
/// # Arguments
///
/// * `input` - Reflectors `(*, m, n)` stored below the diagonal, `m >= n`.
/// * `tau` - Scaling factors `(*, k)`, `k <= n`.
pub fn householder_product<T, D>(
    input: &Tensor<T, D>,
    tau: &Tensor<T, D>,
) -> Result<Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_householder_product(input, tau)
}

/// Output variant of [`householder_product`].
pub fn householder_product_out<'a, T, D>(
    result: &'a mut Tensor<T, D>,
    input: &Tensor<T, D>,
    tau: &Tensor<T, D>,
) -> Result<&'a mut Tensor<T, D>, LinalgError>
where
    T: FloatElement,
    D: LinalgDispatch<T>,
{
    D::linalg_householder_product_out(result, input, tau)
}
