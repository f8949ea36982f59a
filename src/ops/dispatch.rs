//! DType dispatch utilities
//!
//! Shards are stored as a [`Buffer`](crate::tensor::Buffer), an enum with one
//! typed vector per dtype. These macros turn a runtime dtype (or a buffer
//! variant) into a concrete Rust type so generic kernels can be called.
//!
//! # Usage
//!
//! ```ignore
//! fn zeros(dtype: DType, len: usize) -> Buffer {
//!     dispatch_dtype!(dtype, T => {
//!         T::into_buffer(vec![T::zero(); len])
//!     })
//! }
//!
//! fn first_as_f64(buffer: &Buffer) -> Option<f64> {
//!     dispatch_buffer!(buffer, v => v.first().map(|x| x.to_f64()))
//! }
//! ```
//!
//! ## Supported Types
//!
//! - `Bool` -> `bool`
//! - `U8` -> `u8`
//! - `I8` -> `i8`
//! - `I16` -> `i16`
//! - `I32` -> `i32`
//! - `I64` -> `i64`
//! - `F32` -> `f32`
//! - `F64` -> `f64`

/// Macro for runtime dtype dispatch to typed operations.
///
/// Executes `$body` with `$T` bound to the Rust type of `$dtype`. Every dtype
/// has a native element type, so the dispatch is total.
#[macro_export]
#[doc(hidden)]
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::Bool => {
                type $T = bool;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
        }
    };
}

/// Macro for dispatching on the variant of a buffer.
///
/// Binds `$v` to the typed vector inside `$buffer` (by reference or mutable
/// reference, following the match ergonomics of the scrutinee) and evaluates
/// `$body` once per variant.
#[macro_export]
#[doc(hidden)]
macro_rules! dispatch_buffer {
    ($buffer:expr, $v:ident => $body:expr) => {
        match $buffer {
            $crate::tensor::Buffer::Bool($v) => $body,
            $crate::tensor::Buffer::U8($v) => $body,
            $crate::tensor::Buffer::I8($v) => $body,
            $crate::tensor::Buffer::I16($v) => $body,
            $crate::tensor::Buffer::I32($v) => $body,
            $crate::tensor::Buffer::I64($v) => $body,
            $crate::tensor::Buffer::F32($v) => $body,
            $crate::tensor::Buffer::F64($v) => $body,
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::dtype::{DType, Element};
    use crate::tensor::Buffer;

    #[test]
    fn test_dispatch_dtype_binds_type() {
        for &dtype in DType::ALL.iter() {
            let size = dispatch_dtype!(dtype, T => { std::mem::size_of::<T>() });
            assert_eq!(size, dtype.size_in_bytes());
        }
    }

    #[test]
    fn test_dispatch_buffer_binds_vec() {
        let buffer = Buffer::I16(vec![3, 4]);
        let total: f64 = dispatch_buffer!(&buffer, v => v.iter().map(|x| x.to_f64()).sum());
        assert_eq!(total, 7.0);
    }
}
