//! Error types for shardnum

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using shardnum's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shardnum operations
///
/// Every error is raised on the rank that detects it, before any collective
/// call of the failing operation is issued.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An operand or output argument has the wrong kind
    #[error("Invalid operand: {reason}")]
    InvalidOperand {
        /// Why the operand was rejected
        reason: String,
    },

    /// Shapes cannot be broadcast together
    #[error("Cannot broadcast shapes {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// Axis outside `[-ndim, ndim)`
    #[error("Invalid axis {axis} for tensor with {ndim} dimensions")]
    InvalidAxis {
        /// The invalid axis as given by the caller
        axis: isize,
        /// Number of dimensions
        ndim: usize,
    },

    /// The same axis was named twice in a reduction
    #[error("Duplicate axis {axis} in reduction")]
    DuplicateAxis {
        /// The normalized axis that appeared more than once
        axis: usize,
    },

    /// Shape mismatch between a buffer and what an operation requires
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Two operands are partitioned in ways that cannot be combined locally
    #[error("Unsupported distributed layout: {reason}")]
    UnsupportedLayout {
        /// Description of the incompatible layouts
        reason: String,
    },

    /// DType mismatch between operands
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Left-hand side dtype
        lhs: DType,
        /// Right-hand side dtype
        rhs: DType,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A collective operation failed or ranks disagreed on its payload
    #[error("Communication error: {0}")]
    Communication(String),
}

impl Error {
    /// Create an invalid operand error
    pub fn invalid_operand(reason: impl Into<String>) -> Self {
        Self::InvalidOperand {
            reason: reason.into(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::BroadcastError {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an unsupported layout error
    pub fn unsupported_layout(reason: impl Into<String>) -> Self {
        Self::UnsupportedLayout {
            reason: reason.into(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Returns true for the axis-related errors raised by axis sanitation
    pub fn is_axis_error(&self) -> bool {
        matches!(self, Self::InvalidAxis { .. } | Self::DuplicateAxis { .. })
    }
}
