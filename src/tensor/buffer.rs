//! Typed contiguous storage for one shard

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::kernel;
use crate::ops::ReduceOp;
use crate::{dispatch_buffer, dispatch_dtype};

/// Contiguous, row-major element storage of a single shard
///
/// One variant per [`DType`]. Buffers are plain owned vectors; sharing between
/// tensors happens one level up, where a buffer sits behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub enum Buffer {
    /// Boolean elements
    Bool(Vec<bool>),
    /// 8-bit unsigned integers
    U8(Vec<u8>),
    /// 8-bit signed integers
    I8(Vec<i8>),
    /// 16-bit signed integers
    I16(Vec<i16>),
    /// 32-bit signed integers
    I32(Vec<i32>),
    /// 64-bit signed integers
    I64(Vec<i64>),
    /// 32-bit floats
    F32(Vec<f32>),
    /// 64-bit floats
    F64(Vec<f64>),
}

impl Buffer {
    /// A buffer of `len` zeros (false for bool)
    pub fn zeros(dtype: DType, len: usize) -> Self {
        dispatch_dtype!(dtype, T => { T::into_buffer(vec![T::zero(); len]) })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        dispatch_buffer!(self, v => v.len())
    }

    /// Returns true if the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of this buffer
    pub fn dtype(&self) -> DType {
        match self {
            Self::Bool(_) => DType::Bool,
            Self::U8(_) => DType::U8,
            Self::I8(_) => DType::I8,
            Self::I16(_) => DType::I16,
            Self::I32(_) => DType::I32,
            Self::I64(_) => DType::I64,
            Self::F32(_) => DType::F32,
            Self::F64(_) => DType::F64,
        }
    }

    /// Convert every element to `dtype`
    ///
    /// Float to integer conversion truncates and saturates; anything non-zero
    /// becomes `true` when cast to bool.
    pub fn cast(&self, dtype: DType) -> Self {
        if dtype == self.dtype() {
            return self.clone();
        }
        dispatch_buffer!(self, v => cast_elements(v, dtype))
    }

    /// Copy the elements out as `T`, converting if necessary
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        match T::slice_of(self) {
            Some(s) => s.to_vec(),
            None => dispatch_buffer!(self, v => v.iter().map(|x| T::from_f64(x.to_f64())).collect()),
        }
    }

    /// Elements at the given flat offsets, in order
    pub fn gather(&self, offsets: &[usize]) -> Self {
        dispatch_buffer!(self, v => gather_elements(v, offsets))
    }

    /// Write the elements of `src` to the given flat offsets, in order
    ///
    /// `src` must have this buffer's dtype and one element per offset.
    pub fn scatter(&mut self, offsets: &[usize], src: &Buffer) -> Result<()> {
        if src.dtype() != self.dtype() {
            return Err(Error::DTypeMismatch {
                lhs: self.dtype(),
                rhs: src.dtype(),
            });
        }
        if src.len() != offsets.len() {
            return Err(Error::shape_mismatch(&[offsets.len()], &[src.len()]));
        }
        dispatch_buffer!(self, dst => scatter_elements(dst, offsets, src))
    }

    /// Native-endian byte encoding of the elements
    pub fn to_bytes(&self) -> Vec<u8> {
        dispatch_buffer!(self, v => Element::encode(v.as_slice()))
    }

    /// Decode a buffer of `dtype` from its byte encoding
    pub fn from_bytes(dtype: DType, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % dtype.size_in_bytes() != 0 {
            return Err(Error::Communication(format!(
                "{} bytes is not a whole number of {dtype} elements",
                bytes.len()
            )));
        }
        Ok(dispatch_dtype!(dtype, T => { T::into_buffer(T::decode(bytes)) }))
    }

    /// Fold `other` into `self` element by element with `op`
    ///
    /// Both buffers must have the same dtype and length. Bitwise operations
    /// are rejected for floating point data.
    pub fn combine(&mut self, other: &Buffer, op: ReduceOp) -> Result<()> {
        let dtype = self.dtype();
        if dtype != other.dtype() {
            return Err(Error::DTypeMismatch {
                lhs: dtype,
                rhs: other.dtype(),
            });
        }
        if self.len() != other.len() {
            return Err(Error::shape_mismatch(&[self.len()], &[other.len()]));
        }
        if op.is_bitwise() && dtype.is_float() {
            return Err(Error::unsupported_dtype(dtype, op.name()));
        }
        dispatch_buffer!(self, dst => combine_typed(dst, other, op))
    }
}

fn cast_elements<S: Element>(src: &[S], dtype: DType) -> Buffer {
    dispatch_dtype!(dtype, T => {
        T::into_buffer(src.iter().map(|&x| T::from_f64(x.to_f64())).collect())
    })
}

fn gather_elements<T: Element>(src: &[T], offsets: &[usize]) -> Buffer {
    T::into_buffer(offsets.iter().map(|&i| src[i]).collect())
}

fn scatter_elements<T: Element>(dst: &mut [T], offsets: &[usize], src: &Buffer) -> Result<()> {
    let src = T::slice_of(src).ok_or(Error::DTypeMismatch {
        lhs: T::DTYPE,
        rhs: src.dtype(),
    })?;
    for (&i, &x) in offsets.iter().zip(src) {
        dst[i] = x;
    }
    Ok(())
}

fn combine_typed<T: Element>(dst: &mut [T], other: &Buffer, op: ReduceOp) -> Result<()> {
    let src = T::slice_of(other).ok_or(Error::DTypeMismatch {
        lhs: T::DTYPE,
        rhs: other.dtype(),
    })?;
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = kernel::reduce::fold(op, *d, s);
    }
    Ok(())
}
