use tensile_tensor::{Backend, FloatElement, Tensor};

use crate::error::LinalgError;
use crate::kernels::out::write_out;
use crate::options::{LstsqOptions, MatrixRankOptions, NormOptions, PinvOptions};

/// Result of a least squares solve.
///
/// Fields that the selected driver does not compute are empty tensors.
#[derive(Debug, Clone, PartialEq)]
pub struct Lstsq<T, D: Backend> {
    /// Solution of shape `(*, n, k)`.
    pub solution: Tensor<T, D>,
    /// Squared residuals of shape `(*, k)`.
    pub residuals: Tensor<T, D>,
    /// Effective rank of shape `(*)`.
    pub rank: Tensor<i64, D>,
    /// Singular values of shape `(*, min(m, n))`.
    pub singular_values: Tensor<T, D>,
}

/// Linear algebra entry points a backend provides for element type `T`.
///
/// Every value entry point defaults to [`LinalgError::NotImplemented`], so a
/// backend only overrides what it supports. Every `_out` entry point defaults
/// to computing the value entry point and writing it into the caller's tensor
/// with [`write_out`].
///
/// # Example
///
/// ```
/// use tensile_linalg_ops::{LinalgDispatch, LinalgError};
/// use tensile_tensor::{Backend, Device, Tensor};
///
/// #[derive(Clone, Copy, Debug, Default)]
/// struct Remote;
///
/// impl Backend for Remote {
///     fn device() -> Device {
///         Device::External("remote")
///     }
/// }
///
/// impl LinalgDispatch<f32> for Remote {}
///
/// let a = Tensor::<f32, Remote>::eye(2);
/// assert_eq!(
///     Remote::linalg_inv(&a),
///     Err(LinalgError::NotImplemented { op: "linalg_inv" })
/// );
/// ```
pub trait LinalgDispatch<T: FloatElement>: Backend {
    /// Lower Cholesky factor.
    fn linalg_cholesky(input: &Tensor<T, Self>) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = input;
        Err(LinalgError::NotImplemented {
            op: "linalg_cholesky",
        })
    }

    /// Output variant of [`Self::linalg_cholesky`].
    fn linalg_cholesky_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_cholesky(input)?;
        Ok(write_out(result, &value))
    }

    /// Determinant.
    fn linalg_det(input: &Tensor<T, Self>) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = input;
        Err(LinalgError::NotImplemented { op: "linalg_det" })
    }

    /// Sign and log absolute value of the determinant.
    fn linalg_slogdet(
        input: &Tensor<T, Self>,
    ) -> Result<(Tensor<T, Self>, Tensor<T, Self>), LinalgError> {
        let _ = input;
        Err(LinalgError::NotImplemented {
            op: "linalg_slogdet",
        })
    }

    /// Output variant of [`Self::linalg_slogdet`].
    fn linalg_slogdet_out<'a>(
        sign: &'a mut Tensor<T, Self>,
        logabsdet: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
    ) -> Result<(&'a mut Tensor<T, Self>, &'a mut Tensor<T, Self>), LinalgError> {
        let (s, l) = Self::linalg_slogdet(input)?;
        Ok((write_out(sign, &s), write_out(logabsdet, &l)))
    }

    /// Eigenvalues and eigenvectors of a symmetric matrix.
    fn linalg_eigh(
        input: &Tensor<T, Self>,
        uplo: &str,
    ) -> Result<(Tensor<T, Self>, Tensor<T, Self>), LinalgError> {
        let _ = (input, uplo);
        Err(LinalgError::NotImplemented { op: "linalg_eigh" })
    }

    /// Output variant of [`Self::linalg_eigh`].
    fn linalg_eigh_out<'a>(
        eigvals: &'a mut Tensor<T, Self>,
        eigvecs: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        uplo: &str,
    ) -> Result<(&'a mut Tensor<T, Self>, &'a mut Tensor<T, Self>), LinalgError> {
        let (w, v) = Self::linalg_eigh(input, uplo)?;
        Ok((write_out(eigvals, &w), write_out(eigvecs, &v)))
    }

    /// Eigenvalues of a symmetric matrix.
    fn linalg_eigvalsh(input: &Tensor<T, Self>, uplo: &str) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, uplo);
        Err(LinalgError::NotImplemented {
            op: "linalg_eigvalsh",
        })
    }

    /// Output variant of [`Self::linalg_eigvalsh`].
    fn linalg_eigvalsh_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        uplo: &str,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_eigvalsh(input, uplo)?;
        Ok(write_out(result, &value))
    }

    /// Product of Householder reflectors.
    fn linalg_householder_product(
        input: &Tensor<T, Self>,
        tau: &Tensor<T, Self>,
    ) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, tau);
        Err(LinalgError::NotImplemented {
            op: "linalg_householder_product",
        })
    }

    /// Output variant of [`Self::linalg_householder_product`].
    fn linalg_householder_product_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        tau: &Tensor<T, Self>,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_householder_product(input, tau)?;
        Ok(write_out(result, &value))
    }

    /// Least squares solution of `input X = other`.
    fn linalg_lstsq(
        input: &Tensor<T, Self>,
        other: &Tensor<T, Self>,
        options: &LstsqOptions,
    ) -> Result<Lstsq<T, Self>, LinalgError> {
        let _ = (input, other, options);
        Err(LinalgError::NotImplemented { op: "linalg_lstsq" })
    }

    /// Norm with a numeric order, `None` meaning the default for the reduced dimensions.
    fn linalg_norm(
        input: &Tensor<T, Self>,
        ord: Option<f64>,
        options: &NormOptions,
    ) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, ord, options);
        Err(LinalgError::NotImplemented { op: "linalg_norm" })
    }

    /// Output variant of [`Self::linalg_norm`].
    fn linalg_norm_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        ord: Option<f64>,
        options: &NormOptions,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_norm(input, ord, options)?;
        Ok(write_out(result, &value))
    }

    /// Norm with a named order.
    fn linalg_norm_str(
        input: &Tensor<T, Self>,
        ord: &str,
        options: &NormOptions,
    ) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, ord, options);
        Err(LinalgError::NotImplemented {
            op: "linalg_norm_str",
        })
    }

    /// Output variant of [`Self::linalg_norm_str`].
    fn linalg_norm_str_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        ord: &str,
        options: &NormOptions,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_norm_str(input, ord, options)?;
        Ok(write_out(result, &value))
    }

    /// Numerical rank.
    fn linalg_matrix_rank(
        input: &Tensor<T, Self>,
        options: &MatrixRankOptions,
    ) -> Result<Tensor<i64, Self>, LinalgError> {
        let _ = (input, options);
        Err(LinalgError::NotImplemented {
            op: "linalg_matrix_rank",
        })
    }

    /// Output variant of [`Self::linalg_matrix_rank`].
    fn linalg_matrix_rank_out<'a>(
        result: &'a mut Tensor<i64, Self>,
        input: &Tensor<T, Self>,
        options: &MatrixRankOptions,
    ) -> Result<&'a mut Tensor<i64, Self>, LinalgError> {
        let value = Self::linalg_matrix_rank(input, options)?;
        Ok(write_out(result, &value))
    }

    /// Moore-Penrose pseudo-inverse.
    fn linalg_pinv(
        input: &Tensor<T, Self>,
        options: &PinvOptions,
    ) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, options);
        Err(LinalgError::NotImplemented { op: "linalg_pinv" })
    }

    /// Output variant of [`Self::linalg_pinv`].
    fn linalg_pinv_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        options: &PinvOptions,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_pinv(input, options)?;
        Ok(write_out(result, &value))
    }

    /// Solution of `input X = other`.
    fn linalg_solve(
        input: &Tensor<T, Self>,
        other: &Tensor<T, Self>,
    ) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, other);
        Err(LinalgError::NotImplemented { op: "linalg_solve" })
    }

    /// Output variant of [`Self::linalg_solve`].
    fn linalg_solve_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        other: &Tensor<T, Self>,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_solve(input, other)?;
        Ok(write_out(result, &value))
    }

    /// Inverse of a tensor over its first `ind` dimensions.
    fn linalg_tensorinv(input: &Tensor<T, Self>, ind: usize) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, ind);
        Err(LinalgError::NotImplemented {
            op: "linalg_tensorinv",
        })
    }

    /// Output variant of [`Self::linalg_tensorinv`].
    fn linalg_tensorinv_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        ind: usize,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_tensorinv(input, ind)?;
        Ok(write_out(result, &value))
    }

    /// Solution of a tensor equation.
    fn linalg_tensorsolve(
        input: &Tensor<T, Self>,
        other: &Tensor<T, Self>,
        dims: Option<&[isize]>,
    ) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = (input, other, dims);
        Err(LinalgError::NotImplemented {
            op: "linalg_tensorsolve",
        })
    }

    /// Output variant of [`Self::linalg_tensorsolve`].
    fn linalg_tensorsolve_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
        other: &Tensor<T, Self>,
        dims: Option<&[isize]>,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_tensorsolve(input, other, dims)?;
        Ok(write_out(result, &value))
    }

    /// Matrix inverse.
    fn linalg_inv(input: &Tensor<T, Self>) -> Result<Tensor<T, Self>, LinalgError> {
        let _ = input;
        Err(LinalgError::NotImplemented { op: "linalg_inv" })
    }

    /// Output variant of [`Self::linalg_inv`].
    fn linalg_inv_out<'a>(
        result: &'a mut Tensor<T, Self>,
        input: &Tensor<T, Self>,
    ) -> Result<&'a mut Tensor<T, Self>, LinalgError> {
        let value = Self::linalg_inv(input)?;
        Ok(write_out(result, &value))
    }
}
