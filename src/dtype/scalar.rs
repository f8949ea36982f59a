//! Scalar operands for binary operations

use super::{DType, promote};
use crate::error::{Error, Result};
use crate::tensor::LocalTensor;

/// A bare numeric value used as an operand next to (or instead of) a tensor
///
/// Scalars carry an inferred dtype: `Bool` for booleans, `I64` for integers
/// and the default float (`F32`) for floating point values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
}

impl Scalar {
    /// The dtype inferred for this scalar on its own
    pub const fn dtype(self) -> DType {
        match self {
            Self::Bool(_) => DType::Bool,
            Self::Int(_) => DType::default_int(),
            Self::Float(_) => DType::default_float(),
        }
    }

    /// The dtype this scalar takes when combined with an array of `other` dtype
    ///
    /// The scalar adopts the array's dtype when its value category (bool,
    /// integer, float) does not exceed the array's and its value is
    /// representable there. Otherwise the two dtypes are promoted normally,
    /// widening to `F64` if a float value would still overflow.
    pub fn dtype_alongside(self, other: DType) -> DType {
        let own = self.dtype();
        if own.category() <= other.category() && self.fits(other) {
            return other;
        }
        let promoted = promote(own, other);
        if self.fits(promoted) {
            promoted
        } else {
            DType::F64
        }
    }

    /// Whether the value survives a cast to `dtype` without saturating
    pub fn fits(self, dtype: DType) -> bool {
        match self {
            Self::Bool(_) => true,
            Self::Int(i) => match dtype {
                DType::Bool => i == 0 || i == 1,
                DType::U8 => u8::try_from(i).is_ok(),
                DType::I8 => i8::try_from(i).is_ok(),
                DType::I16 => i16::try_from(i).is_ok(),
                DType::I32 => i32::try_from(i).is_ok(),
                DType::I64 | DType::F32 | DType::F64 => true,
            },
            Self::Float(f) => match dtype {
                DType::F32 => !f.is_finite() || f.abs() <= f32::MAX as f64,
                DType::F64 => true,
                _ => false,
            },
        }
    }

    /// The value as f64
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// One-element tensor of shape `[1]` holding this value as `dtype`
    pub fn to_local(self, dtype: DType) -> LocalTensor {
        match self {
            // Integers go through i64 so large values survive a cast to I64
            Self::Int(i) => LocalTensor::vector(vec![i]).cast(dtype),
            Self::Bool(b) => LocalTensor::vector(vec![b]).cast(dtype),
            Self::Float(f) => LocalTensor::vector(vec![f]).cast(dtype),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Self::Int(v as i64)
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl TryFrom<u64> for Scalar {
    type Error = Error;

    fn try_from(v: u64) -> Result<Self> {
        i64::try_from(v).map(Self::Int).map_err(|_| {
            Error::invalid_operand(format!(
                "integer scalar {v} does not fit any supported dtype"
            ))
        })
    }
}

impl TryFrom<usize> for Scalar {
    type Error = Error;

    fn try_from(v: usize) -> Result<Self> {
        Self::try_from(v as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferred_dtype() {
        assert_eq!(Scalar::from(true).dtype(), DType::Bool);
        assert_eq!(Scalar::from(3i32).dtype(), DType::I64);
        assert_eq!(Scalar::from(2.5f64).dtype(), DType::F32);
    }

    #[test]
    fn test_dtype_alongside_adopts_array_dtype() {
        assert_eq!(Scalar::Int(2).dtype_alongside(DType::I8), DType::I8);
        assert_eq!(Scalar::Int(2).dtype_alongside(DType::F64), DType::F64);
        assert_eq!(Scalar::Bool(true).dtype_alongside(DType::U8), DType::U8);
    }

    #[test]
    fn test_dtype_alongside_promotes_wider_category() {
        assert_eq!(Scalar::Float(2.5).dtype_alongside(DType::I32), DType::F32);
        assert_eq!(Scalar::Int(1).dtype_alongside(DType::Bool), DType::I64);
    }

    #[test]
    fn test_dtype_alongside_widens_out_of_range_values() {
        assert_eq!(Scalar::Int(300).dtype_alongside(DType::I8), DType::I64);
        assert_eq!(Scalar::Int(-1).dtype_alongside(DType::U8), DType::I64);
        assert_eq!(Scalar::Int(255).dtype_alongside(DType::U8), DType::U8);
        assert_eq!(Scalar::Float(1e300).dtype_alongside(DType::F32), DType::F64);
        assert_eq!(Scalar::Float(1e300).dtype_alongside(DType::I16), DType::F64);
        assert_eq!(Scalar::Float(f64::INFINITY).dtype_alongside(DType::F32), DType::F32);
    }

    #[test]
    fn test_try_from_u64() {
        assert_eq!(Scalar::try_from(7u64).unwrap(), Scalar::Int(7));
        let err = Scalar::try_from(u64::MAX).unwrap_err();
        assert!(matches!(err, Error::InvalidOperand { .. }));
    }

    #[test]
    fn test_to_local() {
        let t = Scalar::Float(2.5).to_local(DType::I32);
        assert_eq!(t.shape(), &[1]);
        assert_eq!(t.dtype(), DType::I32);
        assert_eq!(t.to_vec::<i32>(), vec![2]);
    }
}
