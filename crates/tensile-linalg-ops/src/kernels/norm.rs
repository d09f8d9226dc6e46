//! Vector and matrix norms.

use tensile_tensor::{Backend, DType, FloatElement, Tensor};

use super::matrix::{normalize_dims, to_faer};
use super::svd::svd;
use crate::error::LinalgError;
use crate::options::NormOptions;

/// Matrix norm orders.
#[derive(Debug, Clone, Copy, PartialEq)]
enum MatrixOrd {
    Fro,
    Nuc,
    One,
    NegOne,
    Two,
    NegTwo,
    Inf,
    NegInf,
}

impl MatrixOrd {
    fn from_value(op: &'static str, ord: f64) -> Result<Self, LinalgError> {
        Ok(match ord {
            o if o == 1.0 => Self::One,
            o if o == -1.0 => Self::NegOne,
            o if o == 2.0 => Self::Two,
            o if o == -2.0 => Self::NegTwo,
            o if o == f64::INFINITY => Self::Inf,
            o if o == f64::NEG_INFINITY => Self::NegInf,
            o => {
                return Err(LinalgError::invalid_argument(
                    op,
                    format!("Order {} not supported for matrix norm", o),
                ))
            }
        })
    }

    fn from_label(op: &'static str, ord: &str) -> Result<Self, LinalgError> {
        match ord {
            "fro" => Ok(Self::Fro),
            "nuc" => Ok(Self::Nuc),
            other => Err(LinalgError::invalid_argument(
                op,
                format!("Invalid norm order: {}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NormKind {
    Vector(f64),
    Matrix(MatrixOrd),
}

fn cast<A: FloatElement, B: FloatElement>(a: A) -> B {
    B::from_f64_lossy(a.to_f64_lossy())
}

fn vector_norm<U: FloatElement>(op: &'static str, x: &[U], ord: f64) -> Result<U, LinalgError> {
    let abs = x.iter().map(|v| v.abs());
    if ord.is_infinite() {
        if x.is_empty() {
            return Err(LinalgError::invalid_argument(
                op,
                "cannot compute the inf norm over an empty dimension",
            ));
        }
        return Ok(if ord > 0.0 {
            abs.fold(U::neg_infinity(), U::max)
        } else {
            abs.fold(U::infinity(), U::min)
        });
    }
    Ok(if ord == 0.0 {
        U::from_f64_lossy(x.iter().filter(|&&v| v != U::zero()).count() as f64)
    } else if ord == 1.0 {
        abs.fold(U::zero(), |acc, v| acc + v)
    } else if ord == 2.0 {
        abs.fold(U::zero(), |acc, v| acc + v * v).sqrt()
    } else {
        let p = U::from_f64_lossy(ord);
        abs.fold(U::zero(), |acc, v| acc + v.powf(p)).powf(p.recip())
    })
}

/// Norm of one row-major `rows x cols` matrix.
fn matrix_norm<U: FloatElement>(
    op: &'static str,
    a: &[U],
    (rows, cols): (usize, usize),
    ord: MatrixOrd,
) -> Result<U, LinalgError> {
    let empty = rows == 0 || cols == 0;
    if empty && !matches!(ord, MatrixOrd::Fro | MatrixOrd::Nuc) {
        return Err(LinalgError::invalid_argument(
            op,
            format!("{:?} norm of an empty matrix is not defined", ord),
        ));
    }
    let at = |i: usize, j: usize| a[i * cols + j].abs();
    let abs_col_sums = || (0..cols).map(|j| (0..rows).fold(U::zero(), |acc, i| acc + at(i, j)));
    let abs_row_sums = || (0..rows).map(|i| (0..cols).fold(U::zero(), |acc, j| acc + at(i, j)));
    let singular_values = || -> Result<Vec<U>, LinalgError> {
        let s = svd(op, to_faer(a, rows, cols).as_ref())?.s;
        Ok(s.into_iter().map(U::from_f64_lossy).collect())
    };
    Ok(match ord {
        MatrixOrd::Fro => a.iter().fold(U::zero(), |acc, &x| acc + x * x).sqrt(),
        MatrixOrd::Nuc => singular_values()?.into_iter().fold(U::zero(), |acc, s| acc + s),
        MatrixOrd::One => abs_col_sums().fold(U::neg_infinity(), U::max),
        MatrixOrd::NegOne => abs_col_sums().fold(U::infinity(), U::min),
        MatrixOrd::Inf => abs_row_sums().fold(U::neg_infinity(), U::max),
        MatrixOrd::NegInf => abs_row_sums().fold(U::infinity(), U::min),
        MatrixOrd::Two => singular_values()?.first().copied().unwrap_or_else(U::zero),
        MatrixOrd::NegTwo => singular_values()?.last().copied().unwrap_or_else(U::zero),
    })
}

/// Reduces `input` over `dims`, computing in `U` and returning `T`.
fn reduce<U: FloatElement, T: FloatElement, D: Backend>(
    op: &'static str,
    input: &Tensor<T, D>,
    dims: &[usize],
    kind: NormKind,
    keepdim: bool,
) -> Result<Tensor<T, D>, LinalgError> {
    let shape = input.shape();
    let kept: Vec<usize> = (0..input.ndim()).filter(|d| !dims.contains(d)).collect();
    let perm: Vec<usize> = kept.iter().chain(dims).copied().collect();
    let permuted = input.permute(&perm)?;
    let data: Vec<U> = permuted.as_slice().iter().map(|&v| cast(v)).collect();

    let group: usize = dims.iter().map(|&d| shape[d]).product();
    let count: usize = kept.iter().map(|&d| shape[d]).product();
    let mut values = Vec::with_capacity(count);
    for o in 0..count {
        let chunk = &data[o * group..(o + 1) * group];
        let value = match kind {
            NormKind::Vector(ord) => vector_norm(op, chunk, ord)?,
            NormKind::Matrix(ord) => matrix_norm(op, chunk, (shape[dims[0]], shape[dims[1]]), ord)?,
        };
        values.push(cast::<U, T>(value));
    }

    let out_shape: Vec<usize> = if keepdim {
        shape
            .iter()
            .enumerate()
            .map(|(d, &s)| if dims.contains(&d) { 1 } else { s })
            .collect()
    } else {
        kept.iter().map(|&d| shape[d]).collect()
    };
    Ok(Tensor::from_shape_vec(&out_shape, values)?)
}

fn reduce_in<T: FloatElement, D: Backend>(
    op: &'static str,
    input: &Tensor<T, D>,
    dims: &[usize],
    kind: NormKind,
    options: &NormOptions,
) -> Result<Tensor<T, D>, LinalgError> {
    log::debug!("{}: {:?} over dims {:?} of shape {:?}", op, kind, dims, input.shape());
    match options.dtype {
        None => reduce::<T, T, D>(op, input, dims, kind, options.keepdim),
        Some(DType::F32) => reduce::<f32, T, D>(op, input, dims, kind, options.keepdim),
        Some(DType::F64) => reduce::<f64, T, D>(op, input, dims, kind, options.keepdim),
        Some(other) => Err(LinalgError::invalid_argument(
            op,
            format!("dtype should be a floating point type, got {:?}", other),
        )),
    }
}

/// Norm with a numeric order, or the flattened 2-norm when `ord` is `None`
/// and no `dim` is given.
///
/// One reduced dimension selects a vector norm, two select a matrix norm.
pub fn norm<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    ord: Option<f64>,
    options: &NormOptions,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_norm";
    let ndim = input.ndim();
    let dims = match (&options.dim, ord) {
        (Some(dim), _) => normalize_dims(op, dim, ndim)?,
        (None, None) => {
            let dims: Vec<usize> = (0..ndim).collect();
            return reduce_in(op, input, &dims, NormKind::Vector(2.0), options);
        }
        (None, Some(_)) if ndim == 1 || ndim == 2 => (0..ndim).collect(),
        (None, Some(_)) => {
            return Err(LinalgError::invalid_argument(
                op,
                format!(
                    "input must be 1-D or 2-D when dim is None and ord is not None, got {}-D",
                    ndim
                ),
            ))
        }
    };
    let kind = match dims.len() {
        1 => NormKind::Vector(ord.unwrap_or(2.0)),
        2 => match ord {
            None => NormKind::Matrix(MatrixOrd::Fro),
            Some(ord) => NormKind::Matrix(MatrixOrd::from_value(op, ord)?),
        },
        _ => {
            return Err(LinalgError::invalid_argument(
                op,
                "dim must be a 2-tuple or an integer",
            ))
        }
    };
    reduce_in(op, input, &dims, kind, options)
}

/// Matrix norm with a named order, `"fro"` or `"nuc"`.
pub fn norm_str<T: FloatElement, D: Backend>(
    input: &Tensor<T, D>,
    ord: &str,
    options: &NormOptions,
) -> Result<Tensor<T, D>, LinalgError> {
    let op = "linalg_norm_str";
    let kind = NormKind::Matrix(MatrixOrd::from_label(op, ord)?);
    let ndim = input.ndim();
    let dims = match &options.dim {
        Some(dim) => normalize_dims(op, dim, ndim)?,
        None if ndim == 2 => vec![0, 1],
        None => {
            return Err(LinalgError::invalid_argument(
                op,
                format!("input must be 2-D when dim is None and ord is {}, got {}-D", ord, ndim),
            ))
        }
    };
    if dims.len() != 2 {
        return Err(LinalgError::invalid_argument(
            op,
            format!("order {} requires a 2-tuple dim, got {:?}", ord, dims),
        ));
    }
    reduce_in(op, input, &dims, kind, options)
}
