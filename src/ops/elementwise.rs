//! Element-wise operations on distributed tensors

use super::{BinaryOp, Operand, UnaryOp, binary_op, local_op};
use crate::comm::Communicator;
use crate::dtype::promote_to_float;
use crate::error::Result;
use crate::tensor::DistTensor;
use std::sync::Arc;

macro_rules! binary_fn {
    ($(#[$meta:meta])* $name:ident, $op:expr) => {
        $(#[$meta])*
        pub fn $name<'a, C: Communicator>(
            t1: impl Into<Operand<'a, C>>,
            t2: impl Into<Operand<'a, C>>,
            world: &Arc<C>,
        ) -> Result<DistTensor<C>> {
            binary_op(|a, b| a.binary($op, b), t1, t2, world)
        }
    };
}

binary_fn!(
    /// Element-wise sum; logical or for booleans
    add,
    BinaryOp::Add
);
binary_fn!(
    /// Element-wise difference; exclusive or for booleans
    sub,
    BinaryOp::Sub
);
binary_fn!(
    /// Element-wise product; logical and for booleans
    mul,
    BinaryOp::Mul
);
binary_fn!(
    /// Element-wise power
    pow,
    BinaryOp::Pow
);
binary_fn!(
    /// Element-wise maximum; NaN propagates
    maximum,
    BinaryOp::Max
);
binary_fn!(
    /// Element-wise minimum; NaN propagates
    minimum,
    BinaryOp::Min
);

/// Element-wise true division
///
/// Integer and boolean operands are promoted to at least the default float
/// dtype, so `div(1, 2)` is `0.5`.
pub fn div<'a, C: Communicator>(
    t1: impl Into<Operand<'a, C>>,
    t2: impl Into<Operand<'a, C>>,
    world: &Arc<C>,
) -> Result<DistTensor<C>> {
    binary_op(
        |a, b| {
            let dtype = promote_to_float(a.dtype());
            a.cast(dtype).binary(BinaryOp::Div, &b.cast(dtype))
        },
        t1,
        t2,
        world,
    )
}

macro_rules! unary_fn {
    ($(#[$meta:meta])* $name:ident, $op:expr) => {
        $(#[$meta])*
        pub fn $name<C: Communicator>(
            x: &DistTensor<C>,
            out: Option<&mut DistTensor<C>>,
        ) -> Result<DistTensor<C>> {
            local_op(|t| Ok(t.unary($op)), x, out)
        }
    };
}

unary_fn!(
    /// Square root
    sqrt,
    UnaryOp::Sqrt
);
unary_fn!(
    /// Natural exponential
    exp,
    UnaryOp::Exp
);
unary_fn!(
    /// Natural logarithm
    log,
    UnaryOp::Log
);
unary_fn!(
    /// Absolute value
    abs,
    UnaryOp::Abs
);
unary_fn!(
    /// Sine
    sin,
    UnaryOp::Sin
);
unary_fn!(
    /// Cosine
    cos,
    UnaryOp::Cos
);
unary_fn!(
    /// Hyperbolic tangent
    tanh,
    UnaryOp::Tanh
);
unary_fn!(
    /// Largest integer not greater than the element
    floor,
    UnaryOp::Floor
);
unary_fn!(
    /// Smallest integer not less than the element
    ceil,
    UnaryOp::Ceil
);
unary_fn!(
    /// Element squared
    square,
    UnaryOp::Square
);
unary_fn!(
    /// Negation
    neg,
    UnaryOp::Neg
);
unary_fn!(
    /// Nearest integer, halves rounded away from zero
    round,
    UnaryOp::Round
);
