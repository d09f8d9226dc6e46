use tensile_tensor::TensorError;
use thiserror::Error;

/// An error type for linear algebra operations.
///
/// `op` fields carry the name of the dispatch entry point that failed, e.g.
/// `"linalg_cholesky"`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Error with the underlying tensor.
    #[error("Error with the tensor: {0}")]
    Tensor(#[from] TensorError),

    /// The backend does not provide this entry point.
    #[error("{op} is not implemented for this backend")]
    NotImplemented {
        /// Dispatch entry point name
        op: &'static str,
    },

    /// The input has fewer dimensions than the operation requires.
    #[error("{op}: expected a tensor with at least {expected} dimensions, got {actual}")]
    DimensionTooSmall {
        /// Dispatch entry point name
        op: &'static str,
        /// Minimum number of dimensions
        expected: usize,
        /// Actual number of dimensions
        actual: usize,
    },

    /// The trailing two dimensions are not equal.
    #[error("{op}: expected a batch of square matrices, got shape {shape:?}")]
    NotSquare {
        /// Dispatch entry point name
        op: &'static str,
        /// Shape of the offending input
        shape: Vec<usize>,
    },

    /// Two inputs have incompatible shapes.
    #[error("{op}: incompatible shapes {lhs:?} and {rhs:?}")]
    ShapeMismatch {
        /// Dispatch entry point name
        op: &'static str,
        /// Shape of the first operand
        lhs: Vec<usize>,
        /// Shape of the second operand
        rhs: Vec<usize>,
    },

    /// Batch dimensions cannot be broadcast together.
    #[error("{op}: cannot broadcast batch dimensions {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Dispatch entry point name
        op: &'static str,
        /// Batch shape of the first operand
        lhs: Vec<usize>,
        /// Batch shape of the second operand
        rhs: Vec<usize>,
    },

    /// A dimension index is out of range.
    #[error("Dimension out of range: {dim} for a tensor with {ndim} dimensions")]
    InvalidDimension {
        /// The requested dimension
        dim: isize,
        /// Number of dimensions of the tensor
        ndim: usize,
    },

    /// An option has a value the operation does not accept.
    #[error("{op}: {reason}")]
    InvalidArgument {
        /// Dispatch entry point name
        op: &'static str,
        /// Description of the invalid argument
        reason: String,
    },

    /// A matrix in the batch is singular.
    #[error("{op}: the diagonal element {pivot} is zero, the input matrix is singular")]
    Singular {
        /// Dispatch entry point name
        op: &'static str,
        /// One-based index of the first zero pivot
        pivot: usize,
    },

    /// A matrix in the batch is not positive-definite.
    #[error("{op}: the leading minor of order {minor} is not positive-definite")]
    NotPositiveDefinite {
        /// Dispatch entry point name
        op: &'static str,
        /// One-based order of the failing leading minor
        minor: usize,
    },

    /// An iterative decomposition did not converge.
    #[error("{op}: the algorithm failed to converge because the input matrix contained non-finite values")]
    NoConvergence {
        /// Dispatch entry point name
        op: &'static str,
    },
}

impl LinalgError {
    /// Creates an InvalidArgument error.
    pub fn invalid_argument(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            op,
            reason: reason.into(),
        }
    }
}
