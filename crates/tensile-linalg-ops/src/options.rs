//! Per-call option bags.
//!
//! Each struct carries the documented defaults of its operation through
//! `Default`, so `PinvOptions::default()` is exactly `rcond = 1e-15,
//! hermitian = false`.

use tensile_tensor::DType;

/// Default relative cutoff for [`PinvOptions::rcond`].
pub const DEFAULT_PINV_RCOND: f64 = 1e-15;

/// Options for the pseudo-inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinvOptions {
    /// Singular values at or below `rcond * max(singular values)` are treated as zero.
    pub rcond: f64,
    /// Treat the input as symmetric and use the eigendecomposition of its lower triangle.
    pub hermitian: bool,
}

impl Default for PinvOptions {
    fn default() -> Self {
        Self {
            rcond: DEFAULT_PINV_RCOND,
            hermitian: false,
        }
    }
}

impl PinvOptions {
    /// Sets the relative cutoff.
    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.rcond = rcond;
        self
    }

    /// Sets the hermitian flag.
    pub fn with_hermitian(mut self, hermitian: bool) -> Self {
        self.hermitian = hermitian;
        self
    }
}

/// Options for the matrix rank.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatrixRankOptions {
    /// Absolute tolerance. `None` means `max(singular values) * max(m, n) * eps`.
    pub tol: Option<f64>,
    /// Treat the input as symmetric and count eigenvalues instead of singular values.
    pub hermitian: bool,
}

impl MatrixRankOptions {
    /// Sets the absolute tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = Some(tol);
        self
    }

    /// Sets the hermitian flag.
    pub fn with_hermitian(mut self, hermitian: bool) -> Self {
        self.hermitian = hermitian;
        self
    }
}

/// Options for least squares.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LstsqOptions {
    /// Relative cutoff used to determine the rank. `None` means `eps * max(m, n)`.
    pub cond: Option<f64>,
    /// Backend driver name. `None` selects the backend default.
    pub driver: Option<String>,
}

impl LstsqOptions {
    /// Sets the rank cutoff.
    pub fn with_cond(mut self, cond: f64) -> Self {
        self.cond = Some(cond);
        self
    }

    /// Sets the driver name.
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }
}

/// Options for norms.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NormOptions {
    /// Dimensions to reduce. Negative values count from the end.
    pub dim: Option<Vec<isize>>,
    /// Keep reduced dimensions with size one.
    pub keepdim: bool,
    /// Precision to compute in. The result keeps the input element type.
    pub dtype: Option<DType>,
}

impl NormOptions {
    /// Sets the dimensions to reduce.
    pub fn with_dim(mut self, dim: impl Into<Vec<isize>>) -> Self {
        self.dim = Some(dim.into());
        self
    }

    /// Sets the keepdim flag.
    pub fn with_keepdim(mut self, keepdim: bool) -> Self {
        self.keepdim = keepdim;
        self
    }

    /// Sets the computation precision.
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }
}

/// Order of a norm, given either as a number or as a label.
///
/// Numbers route to `linalg_norm`, labels to `linalg_norm_str`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormOrd<'a> {
    /// Numeric order, e.g. `2.0` or `f64::INFINITY`.
    Value(f64),
    /// Named order, e.g. `"fro"` or `"nuc"`.
    Label(&'a str),
}

impl From<f64> for NormOrd<'_> {
    fn from(value: f64) -> Self {
        NormOrd::Value(value)
    }
}

impl From<i32> for NormOrd<'_> {
    fn from(value: i32) -> Self {
        NormOrd::Value(value as f64)
    }
}

impl<'a> From<&'a str> for NormOrd<'a> {
    fn from(label: &'a str) -> Self {
        NormOrd::Label(label)
    }
}
