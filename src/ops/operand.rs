//! Operands accepted by the binary dispatcher

use crate::comm::Communicator;
use crate::dtype::{DType, Scalar};
use crate::tensor::DistTensor;

/// One side of a binary operation: a bare scalar or a distributed tensor
#[derive(Debug)]
pub enum Operand<'a, C: Communicator> {
    /// A scalar, treated as a one-element unsplit array
    Scalar(Scalar),
    /// A borrowed distributed tensor
    Tensor(&'a DistTensor<C>),
}

impl<C: Communicator> Operand<'_, C> {
    /// The tensor, if this operand is one
    pub fn as_tensor(&self) -> Option<&DistTensor<C>> {
        match self {
            Self::Tensor(t) => Some(t),
            Self::Scalar(_) => None,
        }
    }

    /// Dtype of the operand on its own (scalars report their inferred dtype)
    pub fn dtype(&self) -> DType {
        match self {
            Self::Tensor(t) => t.dtype(),
            Self::Scalar(s) => s.dtype(),
        }
    }
}

impl<C: Communicator> Clone for Operand<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Communicator> Copy for Operand<'_, C> {}

impl<'a, C: Communicator> From<&'a DistTensor<C>> for Operand<'a, C> {
    fn from(t: &'a DistTensor<C>) -> Self {
        Self::Tensor(t)
    }
}

impl<C: Communicator> From<Scalar> for Operand<'_, C> {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty),*) => {
        $(
            impl<C: Communicator> From<$t> for Operand<'_, C> {
                fn from(v: $t) -> Self {
                    Self::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

impl_from_primitive!(bool, u8, u16, u32, i8, i16, i32, i64, f32, f64);
