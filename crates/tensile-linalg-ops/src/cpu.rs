use tensile_tensor::{Cpu, FloatElement, Tensor};

use crate::dispatch::{LinalgDispatch, Lstsq};
use crate::error::LinalgError;
use crate::kernels;
use crate::options::{LstsqOptions, MatrixRankOptions, NormOptions, PinvOptions};

impl<T: FloatElement> LinalgDispatch<T> for Cpu {
    fn linalg_cholesky(input: &Tensor<T, Cpu>) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::cholesky::cholesky(input)
    }

    fn linalg_det(input: &Tensor<T, Cpu>) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::lu::det(input)
    }

    fn linalg_slogdet(
        input: &Tensor<T, Cpu>,
    ) -> Result<(Tensor<T, Cpu>, Tensor<T, Cpu>), LinalgError> {
        kernels::lu::slogdet(input)
    }

    fn linalg_eigh(
        input: &Tensor<T, Cpu>,
        uplo: &str,
    ) -> Result<(Tensor<T, Cpu>, Tensor<T, Cpu>), LinalgError> {
        kernels::eigh::eigh(input, uplo)
    }

    fn linalg_eigvalsh(input: &Tensor<T, Cpu>, uplo: &str) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::eigh::eigvalsh(input, uplo)
    }

    fn linalg_householder_product(
        input: &Tensor<T, Cpu>,
        tau: &Tensor<T, Cpu>,
    ) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::householder::householder_product(input, tau)
    }

    fn linalg_lstsq(
        input: &Tensor<T, Cpu>,
        other: &Tensor<T, Cpu>,
        options: &LstsqOptions,
    ) -> Result<Lstsq<T, Cpu>, LinalgError> {
        kernels::lstsq::lstsq(input, other, options)
    }

    fn linalg_norm(
        input: &Tensor<T, Cpu>,
        ord: Option<f64>,
        options: &NormOptions,
    ) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::norm::norm(input, ord, options)
    }

    fn linalg_norm_str(
        input: &Tensor<T, Cpu>,
        ord: &str,
        options: &NormOptions,
    ) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::norm::norm_str(input, ord, options)
    }

    fn linalg_matrix_rank(
        input: &Tensor<T, Cpu>,
        options: &MatrixRankOptions,
    ) -> Result<Tensor<i64, Cpu>, LinalgError> {
        kernels::rank::matrix_rank(input, options)
    }

    fn linalg_pinv(
        input: &Tensor<T, Cpu>,
        options: &PinvOptions,
    ) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::rank::pinv(input, options)
    }

    fn linalg_solve(
        input: &Tensor<T, Cpu>,
        other: &Tensor<T, Cpu>,
    ) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::lu::solve(input, other)
    }

    fn linalg_tensorinv(input: &Tensor<T, Cpu>, ind: usize) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::tensor_ops::tensorinv(input, ind)
    }

    fn linalg_tensorsolve(
        input: &Tensor<T, Cpu>,
        other: &Tensor<T, Cpu>,
        dims: Option<&[isize]>,
    ) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::tensor_ops::tensorsolve(input, other, dims)
    }

    fn linalg_inv(input: &Tensor<T, Cpu>) -> Result<Tensor<T, Cpu>, LinalgError> {
        kernels::lu::inv(input)
    }
}
