//! Arithmetic operations helpers
//!
//! Operation kinds for the element-wise kernels and the broadcasting rule
//! shared by every binary operation.

use crate::error::{Error, Result};
use crate::tensor::Shape;

/// Compute the output shape for binary operations with broadcasting
///
/// Shapes are right-aligned and the shorter one is padded with leading 1s.
/// Each aligned pair must be equal or contain a 1; the result takes the
/// extent that is not 1, so a 0 against a 1 gives 0.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Shape> {
    let max_ndim = a.len().max(b.len());
    let mut result = vec![0; max_ndim];

    // Iterate from right to left
    for i in 0..max_ndim {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        result[max_ndim - 1 - i] = if a_dim == b_dim || b_dim == 1 {
            a_dim
        } else if a_dim == 1 {
            b_dim
        } else {
            return Err(Error::broadcast(a, b));
        };
    }

    Ok(Shape::from(result))
}

/// Binary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// Division: a / b
    Div,
    /// Power: a^b
    Pow,
    /// Maximum: max(a, b)
    Max,
    /// Minimum: min(a, b)
    Min,
}

/// Unary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation: -a
    Neg,
    /// Absolute value: |a|
    Abs,
    /// Square root: sqrt(a)
    Sqrt,
    /// Exponential: e^a
    Exp,
    /// Natural log: ln(a)
    Log,
    /// Sine: sin(a)
    Sin,
    /// Cosine: cos(a)
    Cos,
    /// Hyperbolic tangent: tanh(a)
    Tanh,
    /// Square: a^2
    Square,
    /// Floor: floor(a)
    Floor,
    /// Ceiling: ceil(a)
    Ceil,
    /// Round half away from zero: round(a)
    Round,
}

impl UnaryOp {
    /// Apply the operation to a single value
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Neg => -x,
            Self::Abs => x.abs(),
            Self::Sqrt => x.sqrt(),
            Self::Exp => x.exp(),
            Self::Log => x.ln(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tanh => x.tanh(),
            Self::Square => x * x,
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
            Self::Round => x.round(),
        }
    }
}
