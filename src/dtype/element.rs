//! Element trait for mapping Rust types to DType

use super::DType;
use crate::tensor::Buffer;
use std::fmt::Debug;

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to shardnum's runtime dtype system.
/// It's implemented for `bool`, `u8`, `i8`, `i16`, `i32`, `i64`, `f32` and `f64`.
///
/// Arithmetic is exposed through trait methods rather than `std::ops` bounds so
/// that every element type, `bool` included, has total semantics:
/// - integers wrap on overflow and divide by zero to zero
/// - `bool` arithmetic is logical (add = or, sub = xor, mul = and)
pub trait Element: Copy + Send + Sync + PartialOrd + Debug + Default + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for generic numeric operations
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type (saturating for integers, `!= 0` for bool)
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Smallest representable value (identity of a max-reduction)
    fn lowest() -> Self;

    /// Largest representable value (identity of a min-reduction)
    fn highest() -> Self;

    /// Value with every bit set (identity of a bitwise-and reduction)
    fn all_ones() -> Self;

    /// Addition
    fn add(self, rhs: Self) -> Self;

    /// Subtraction
    fn sub(self, rhs: Self) -> Self;

    /// Multiplication
    fn mul(self, rhs: Self) -> Self;

    /// Division
    fn div(self, rhs: Self) -> Self;

    /// Power
    fn pow(self, rhs: Self) -> Self;

    /// Bitwise and (on the IEEE bit pattern for floats)
    fn bit_and(self, rhs: Self) -> Self;

    /// Bitwise or (on the IEEE bit pattern for floats)
    fn bit_or(self, rhs: Self) -> Self;

    /// Truthiness: non-zero values are true
    #[inline]
    fn is_truthy(self) -> bool {
        self.to_f64() != 0.0
    }

    /// Convert a boolean into this type (1 or 0)
    #[inline]
    fn from_bool(v: bool) -> Self {
        if v { Self::one() } else { Self::zero() }
    }

    /// Wrap a vector of this type into a typed buffer
    fn into_buffer(data: Vec<Self>) -> Buffer;

    /// View a buffer as a slice of this type, if the dtypes match
    fn slice_of(buffer: &Buffer) -> Option<&[Self]>;

    /// Encode elements as native-endian bytes
    fn encode(data: &[Self]) -> Vec<u8>;

    /// Decode native-endian bytes (any alignment) into elements
    fn decode(bytes: &[u8]) -> Vec<Self>;
}

macro_rules! impl_buffer_access {
    ($t:ty, $variant:ident) => {
        #[inline]
        fn into_buffer(data: Vec<Self>) -> Buffer {
            Buffer::$variant(data)
        }

        #[inline]
        fn slice_of(buffer: &Buffer) -> Option<&[Self]> {
            match buffer {
                Buffer::$variant(v) => Some(v.as_slice()),
                _ => None,
            }
        }
    };
}

macro_rules! impl_pod_codec {
    ($t:ty) => {
        fn encode(data: &[Self]) -> Vec<u8> {
            bytemuck::cast_slice::<$t, u8>(data).to_vec()
        }

        fn decode(bytes: &[u8]) -> Vec<Self> {
            bytes
                .chunks_exact(std::mem::size_of::<$t>())
                .map(bytemuck::pod_read_unaligned::<$t>)
                .collect()
        }
    };
}

macro_rules! impl_int_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn lowest() -> Self {
                <$t>::MIN
            }

            #[inline]
            fn highest() -> Self {
                <$t>::MAX
            }

            #[inline]
            fn all_ones() -> Self {
                !0
            }

            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }

            #[inline]
            fn div(self, rhs: Self) -> Self {
                if rhs == 0 { 0 } else { self.wrapping_div(rhs) }
            }

            #[inline]
            fn pow(self, rhs: Self) -> Self {
                let exp = rhs as i64;
                if exp >= 0 {
                    return self.wrapping_pow(exp.min(u32::MAX as i64) as u32);
                }
                // Negative exponents truncate towards zero except for |base| == 1
                let base = self as i64;
                if base == 1 {
                    1
                } else if base == -1 {
                    if exp % 2 == 0 { 1 } else { self }
                } else {
                    0
                }
            }

            #[inline]
            fn bit_and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline]
            fn bit_or(self, rhs: Self) -> Self {
                self | rhs
            }

            impl_buffer_access!($t, $variant);
            impl_pod_codec!($t);
        }
    };
}

macro_rules! impl_float_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn lowest() -> Self {
                <$t>::NEG_INFINITY
            }

            #[inline]
            fn highest() -> Self {
                <$t>::INFINITY
            }

            #[inline]
            fn all_ones() -> Self {
                <$t>::from_bits(!0)
            }

            #[inline]
            fn add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn div(self, rhs: Self) -> Self {
                self / rhs
            }

            #[inline]
            fn pow(self, rhs: Self) -> Self {
                self.powf(rhs)
            }

            #[inline]
            fn bit_and(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() & rhs.to_bits())
            }

            #[inline]
            fn bit_or(self, rhs: Self) -> Self {
                <$t>::from_bits(self.to_bits() | rhs.to_bits())
            }

            impl_buffer_access!($t, $variant);
            impl_pod_codec!($t);
        }
    };
}

impl_int_element!(u8, U8);
impl_int_element!(i8, I8);
impl_int_element!(i16, I16);
impl_int_element!(i32, I32);
impl_int_element!(i64, I64);
impl_float_element!(f32, F32);
impl_float_element!(f64, F64);

// Note: bool doesn't implement Pod, so its codec maps through u8 explicitly.
impl Element for bool {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn to_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v != 0.0
    }

    #[inline]
    fn zero() -> Self {
        false
    }

    #[inline]
    fn one() -> Self {
        true
    }

    #[inline]
    fn lowest() -> Self {
        false
    }

    #[inline]
    fn highest() -> Self {
        true
    }

    #[inline]
    fn all_ones() -> Self {
        true
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self | rhs
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline]
    fn pow(self, rhs: Self) -> Self {
        // x^0 == 1, 1^y == 1, 0^1 == 0
        self | !rhs
    }

    #[inline]
    fn bit_and(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline]
    fn bit_or(self, rhs: Self) -> Self {
        self | rhs
    }

    #[inline]
    fn is_truthy(self) -> bool {
        self
    }

    impl_buffer_access!(bool, Bool);

    fn encode(data: &[Self]) -> Vec<u8> {
        data.iter().map(|&b| b as u8).collect()
    }

    fn decode(bytes: &[u8]) -> Vec<Self> {
        bytes.iter().map(|&b| b != 0).collect()
    }
}
