//! Single-shard tensor: shape plus shared contiguous storage

use super::{Buffer, Shape};
use crate::dispatch_buffer;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::kernel;
use crate::ops::{BinaryOp, ReduceOp, UnaryOp, broadcast_shape};
use std::sync::Arc;

/// A contiguous row-major tensor held by one rank
///
/// Storage is reference counted: cloning a `LocalTensor` (or casting it to
/// its own dtype) shares the buffer, and mutation goes through
/// copy-on-write.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTensor {
    shape: Shape,
    data: Arc<Buffer>,
}

impl LocalTensor {
    /// Wrap a buffer with a shape
    ///
    /// Fails with `ShapeMismatch` if the shape does not describe exactly
    /// `data.len()` elements.
    pub fn new(shape: impl Into<Shape>, data: Buffer) -> Result<Self> {
        let shape = shape.into();
        if shape.numel() != data.len() {
            return Err(Error::shape_mismatch(&[shape.numel()], &[data.len()]));
        }
        Ok(Self {
            shape,
            data: Arc::new(data),
        })
    }

    /// One-dimensional tensor holding `data`
    pub fn vector<T: Element>(data: Vec<T>) -> Self {
        Self {
            shape: Shape::from([data.len()]),
            data: Arc::new(T::into_buffer(data)),
        }
    }

    /// Tensor of the given shape from an owned vector
    pub fn from_vec<T: Element>(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        Self::new(shape, T::into_buffer(data))
    }

    /// Tensor of zeros
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        let shape = Shape::from(shape);
        let data = Buffer::zeros(dtype, shape.numel());
        Self {
            shape,
            data: Arc::new(data),
        }
    }

    /// Shape of the tensor
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// The underlying buffer
    #[inline]
    pub fn data(&self) -> &Buffer {
        &self.data
    }

    /// Returns true if both tensors share the same storage
    pub fn shares_storage(&self, other: &LocalTensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Copy the elements out as `T`, converting if necessary
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        self.data.to_vec()
    }

    /// Convert to `dtype`; shares storage when the dtype already matches
    pub fn cast(&self, dtype: DType) -> Self {
        if dtype == self.dtype() {
            return self.clone();
        }
        Self {
            shape: self.shape.clone(),
            data: Arc::new(self.data.cast(dtype)),
        }
    }

    /// Same elements with a different shape
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let shape = Shape::from(shape);
        if shape.numel() != self.numel() {
            return Err(Error::shape_mismatch(&[self.numel()], &[shape.numel()]));
        }
        Ok(Self {
            shape,
            data: Arc::clone(&self.data),
        })
    }

    /// Materialise this tensor broadcast to `shape`
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let target = broadcast_shape(&self.shape, shape)?;
        if target.as_slice() != shape {
            return Err(Error::broadcast(&self.shape, shape));
        }
        if self.shape.as_slice() == shape {
            return Ok(self.clone());
        }
        let offsets = kernel::index::broadcast_offsets(&self.shape, shape);
        Ok(Self {
            shape: target,
            data: Arc::new(self.data.gather(&offsets)),
        })
    }

    /// Tile the tensor `multiples[i]` times along each axis
    ///
    /// If `multiples` is longer than the number of dimensions, the shape is
    /// padded with leading 1s first.
    pub fn repeat(&self, multiples: &[usize]) -> Result<Self> {
        if multiples.len() < self.ndim() {
            return Err(Error::invalid_argument(
                "multiples",
                format!(
                    "expected at least {} entries, got {}",
                    self.ndim(),
                    multiples.len()
                ),
            ));
        }
        let pad = multiples.len() - self.ndim();
        let padded: Vec<usize> = std::iter::repeat_n(1, pad)
            .chain(self.shape.iter().copied())
            .collect();
        if multiples.iter().all(|&m| m == 1) {
            return self.reshape(&padded);
        }

        let shape: Shape = padded.iter().zip(multiples).map(|(&s, &m)| s * m).collect();
        let offsets = kernel::index::repeat_offsets(&padded, multiples);
        Ok(Self {
            shape,
            data: Arc::new(self.data.gather(&offsets)),
        })
    }

    /// The slice `start..start + len` along `dim`
    pub fn narrow(&self, dim: usize, start: usize, len: usize) -> Result<Self> {
        if dim >= self.ndim() {
            return Err(Error::InvalidAxis {
                axis: dim as isize,
                ndim: self.ndim(),
            });
        }
        if start + len > self.shape[dim] {
            return Err(Error::invalid_argument(
                "len",
                format!(
                    "range {start}..{} exceeds extent {} of axis {dim}",
                    start + len,
                    self.shape[dim]
                ),
            ));
        }
        if start == 0 && len == self.shape[dim] {
            return Ok(self.clone());
        }
        let offsets = kernel::index::narrow_offsets(&self.shape, dim, start, len);
        Ok(Self {
            shape: self.shape.with_extent(dim, len),
            data: Arc::new(self.data.gather(&offsets)),
        })
    }

    /// Element-wise binary operation with broadcasting
    ///
    /// Both operands must have the same dtype.
    pub fn binary(&self, op: BinaryOp, other: &LocalTensor) -> Result<Self> {
        if self.dtype() != other.dtype() {
            return Err(Error::DTypeMismatch {
                lhs: self.dtype(),
                rhs: other.dtype(),
            });
        }
        let shape = broadcast_shape(&self.shape, &other.shape)?;
        let lhs = self.broadcast_to(&shape)?;
        let rhs = other.broadcast_to(&shape)?;
        let data = dispatch_buffer!(lhs.data(), a => binary_typed(op, a, rhs.data()))?;
        Self::new(shape, data)
    }

    /// Element-wise unary operation, evaluated in f64 and stored in the
    /// tensor's own dtype
    pub fn unary(&self, op: UnaryOp) -> Self {
        let data = dispatch_buffer!(self.data(), a => into_buffer(kernel::elementwise::unary(op, a)));
        Self {
            shape: self.shape.clone(),
            data: Arc::new(data),
        }
    }

    /// Reduce with `op`
    ///
    /// `None` reduces every element into a tensor of shape `[1]`; `Some(dim)`
    /// reduces one axis and keeps it with extent 1. Empty inputs produce the
    /// identity of `op`.
    pub fn reduce(&self, op: ReduceOp, dim: Option<usize>) -> Result<Self> {
        if op.is_bitwise() && self.dtype().is_float() {
            return Err(Error::unsupported_dtype(self.dtype(), op.name()));
        }
        match dim {
            None => {
                let data = dispatch_buffer!(self.data(), a => {
                    into_buffer(vec![kernel::reduce::reduce_all(op, a)])
                });
                Self::new([1], data)
            }
            Some(dim) => {
                if dim >= self.ndim() {
                    return Err(Error::InvalidAxis {
                        axis: dim as isize,
                        ndim: self.ndim(),
                    });
                }
                let outer: usize = self.shape[..dim].iter().product();
                let inner: usize = self.shape[dim + 1..].iter().product();
                let reduce_size = self.shape[dim];
                let data = dispatch_buffer!(self.data(), a => {
                    into_buffer(kernel::reduce::reduce_axis(op, a, outer, reduce_size, inner))
                });
                Self::new(self.shape.with_extent(dim, 1), data)
            }
        }
    }

    /// Overwrite the elements with `src`, converted to this tensor's dtype
    ///
    /// Shapes must match exactly.
    pub fn assign(&mut self, src: &LocalTensor) -> Result<()> {
        if self.shape != src.shape {
            return Err(Error::shape_mismatch(&self.shape, &src.shape));
        }
        self.data = Arc::new(src.data.cast(self.dtype()));
        Ok(())
    }
}

#[inline]
fn into_buffer<T: Element>(data: Vec<T>) -> Buffer {
    T::into_buffer(data)
}

fn binary_typed<T: Element>(op: BinaryOp, a: &[T], other: &Buffer) -> Result<Buffer> {
    let b = T::slice_of(other).ok_or(Error::DTypeMismatch {
        lhs: T::DTYPE,
        rhs: other.dtype(),
    })?;
    Ok(T::into_buffer(kernel::elementwise::binary(op, a, b)))
}

/// Tensor holding `0, 1, 2, ...` in row-major order
#[cfg(test)]
pub(crate) fn arange(shape: &[usize], dtype: DType) -> LocalTensor {
    let n: usize = shape.iter().product();
    let data = crate::dispatch_dtype!(dtype, T => {
        T::into_buffer((0..n).map(|i| T::from_f64(i as f64)).collect())
    });
    LocalTensor {
        shape: Shape::from(shape),
        data: Arc::new(data),
    }
}
