//! Data type system for shardnum tensors
//!
//! This module provides the `DType` enum representing all supported element types,
//! along with type promotion rules and scalar operands.

mod element;
mod promotion;
mod scalar;

pub use element::Element;
pub use promotion::{promote, promote_to_float};
pub use scalar::Scalar;

use std::fmt;

// ============================================================================
// DType Enum
// ============================================================================

/// Data types supported by shardnum tensors
///
/// The variants are declared in promotion-lattice order: a later variant can
/// represent every value kind of an earlier one, and the join of two dtypes is
/// the later of the two. See [`promote`].
///
/// | DType  | Rust type |
/// |--------|-----------|
/// | `Bool` | `bool`    |
/// | `U8`   | `u8`      |
/// | `I8`   | `i8`      |
/// | `I16`  | `i16`     |
/// | `I32`  | `i32`     |
/// | `I64`  | `i64`     |
/// | `F32`  | `f32`     |
/// | `F64`  | `f64`     |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DType {
    /// Boolean type
    Bool = 0,
    /// 8-bit unsigned integer
    U8 = 1,
    /// 8-bit signed integer
    I8 = 2,
    /// 16-bit signed integer
    I16 = 3,
    /// 32-bit signed integer
    I32 = 4,
    /// 64-bit signed integer
    I64 = 5,
    /// 32-bit floating point (most common)
    F32 = 6,
    /// 64-bit floating point
    F64 = 7,
}

impl DType {
    /// Every dtype, in lattice order
    pub const ALL: [DType; 8] = [
        Self::Bool,
        Self::U8,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
    ];

    /// Position in the promotion lattice (0 = lowest)
    #[inline]
    pub const fn lattice_rank(self) -> u8 {
        self as u8
    }

    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 => 8,
            Self::F32 | Self::I32 => 4,
            Self::I16 => 2,
            Self::I8 | Self::U8 | Self::Bool => 1,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16 | Self::I8)
    }

    /// Returns true if this is an unsigned integer type
    #[inline]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::U8)
    }

    /// Returns true if this is any integer type (signed or unsigned)
    #[inline]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Returns true if this is a boolean type
    #[inline]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Value category: 0 for bool, 1 for integers, 2 for floats
    ///
    /// Used when a scalar operand decides whether it can take the dtype of
    /// the array it is combined with.
    #[inline]
    pub const fn category(self) -> u8 {
        if self.is_float() {
            2
        } else if self.is_int() {
            1
        } else {
            0
        }
    }

    /// Get the default dtype for floating point operations
    #[inline]
    pub const fn default_float() -> Self {
        Self::F32
    }

    /// Get the default dtype for integer operations
    #[inline]
    pub const fn default_int() -> Self {
        Self::I64
    }

    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
