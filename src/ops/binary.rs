//! Binary operation dispatcher

use super::{Operand, ReduceOp, broadcast_shape};
use crate::comm::Communicator;
use crate::dtype::{DType, promote};
use crate::error::{Error, Result};
use crate::tensor::{Buffer, Device, DistTensor, LocalTensor, Shape};
use std::sync::Arc;

/// One operand prepared for the local computation
struct Side<'a, C: Communicator> {
    local: LocalTensor,
    /// Split axis in output coordinates
    split: Option<usize>,
    /// Number of leading axes the operand is padded with in output coordinates
    offset: usize,
    handle: Option<&'a DistTensor<C>>,
}

impl<'a, C: Communicator> Side<'a, C> {
    fn new(operand: Operand<'a, C>, dtype: DType, out_ndim: usize) -> Self {
        match operand {
            Operand::Scalar(s) => Self {
                local: s.to_local(dtype),
                split: None,
                offset: out_ndim - 1,
                handle: None,
            },
            Operand::Tensor(t) => {
                let offset = out_ndim - t.ndim();
                Self {
                    local: t.local().clone(),
                    split: t.split().map(|s| s + offset),
                    offset,
                    handle: Some(t),
                }
            }
        }
    }

    /// Shard extent along an axis given in output coordinates
    fn local_extent(&self, axis: usize) -> usize {
        self.local.shape()[axis - self.offset]
    }

    fn has_empty_shard(&self) -> bool {
        self.split.is_some_and(|s| self.local_extent(s) == 0)
    }

    /// Replace a shard split along an axis of global extent 1 by the full
    /// array, broadcast from rank 0
    ///
    /// Only global metadata decides whether this runs, so every rank issues
    /// the broadcast.
    fn replicate_singleton_split(&mut self) -> Result<()> {
        let Some(t) = self.handle else {
            return Ok(());
        };
        let Some(axis) = t.split() else {
            return Ok(());
        };
        let comm = t.comm();
        if t.gshape()[axis] != 1 || !comm.is_distributed() {
            return Ok(());
        }

        tracing::warn!(
            rank = comm.rank(),
            gshape = ?t.gshape(),
            split = axis,
            "broadcasting operand split along an axis of extent 1"
        );
        // Rank 0 owns the single slice under the chunk rule. Agree on that
        // before broadcasting so a misplaced slice fails on every rank.
        let mut placed = Buffer::Bool(vec![t.lshape()[axis] == comm.chunk(1).len()]);
        comm.all_reduce(&mut placed, ReduceOp::LAnd)?;
        if placed != Buffer::Bool(vec![true]) {
            return Err(Error::unsupported_layout(format!(
                "axis {axis} of extent 1 is not held by rank 0"
            )));
        }
        let mut buffer = if comm.rank() == 0 {
            t.local().data().clone()
        } else {
            Buffer::zeros(t.dtype(), t.gshape().numel())
        };
        comm.broadcast(&mut buffer, 0)?;
        self.local = LocalTensor::new(t.gshape().clone(), buffer)?;
        self.split = None;
        Ok(())
    }

    /// Narrow an unsplit operand to the chunk `split_side` holds along `axis`
    fn narrow_to(&mut self, split_side: &Side<'_, C>, axis: usize) -> Result<()> {
        let Some(handle) = split_side.handle else {
            return Ok(());
        };
        if axis < self.offset {
            return Ok(());
        }
        let local_axis = axis - self.offset;
        let global_extent = handle.gshape()[axis - split_side.offset];
        if self.local.shape()[local_axis] != global_extent {
            // extent 1, broadcasts against the shard
            return Ok(());
        }

        let range = handle.comm().chunk(global_extent);
        let shard_len = split_side.local_extent(axis);
        if shard_len != range.len() {
            return Err(Error::unsupported_layout(format!(
                "shard of length {shard_len} along axis {axis} does not match the balanced chunk {range:?}"
            )));
        }
        self.local = self.local.narrow(local_axis, range.start, range.len())?;
        Ok(())
    }
}

fn global_shape<C: Communicator>(operand: &Operand<'_, C>) -> Shape {
    match operand {
        Operand::Scalar(_) => Shape::from([1]),
        Operand::Tensor(t) => t.gshape().clone(),
    }
}

/// Dtypes the two operands take before promotion
///
/// Scalars adopt the tensor's dtype where their value kind and range allow it.
fn operand_dtypes<C: Communicator>(t1: &Operand<'_, C>, t2: &Operand<'_, C>) -> (DType, DType) {
    match (t1, t2) {
        (Operand::Scalar(a), Operand::Scalar(b)) => {
            let p = promote(a.dtype_alongside(b.dtype()), b.dtype_alongside(a.dtype()));
            (p, p)
        }
        (Operand::Scalar(a), Operand::Tensor(t)) => (a.dtype_alongside(t.dtype()), t.dtype()),
        (Operand::Tensor(t), Operand::Scalar(b)) => (t.dtype(), b.dtype_alongside(t.dtype())),
        (Operand::Tensor(a), Operand::Tensor(b)) => (a.dtype(), b.dtype()),
    }
}

/// Apply an element-wise binary operation to two distributed operands
///
/// `op` receives two shards of the same (promoted) dtype, already aligned so
/// that NumPy broadcasting of the shards yields this rank's output shard.
/// Either operand may be a scalar; `world` is the communicator of the result
/// when both are.
///
/// Layout rules:
/// - splits are compared in the right-aligned output coordinates; two
///   different split axes fail with `UnsupportedLayout`
/// - an operand split along an axis of global extent 1 is broadcast from
///   rank 0 to every rank first (logged as a warning) and then counts as
///   unsplit; the ranks first agree, with one all-reduce, that rank 0 holds
///   the slice, and fail with `UnsupportedLayout` otherwise
/// - an unsplit operand is narrowed to the split operand's chunk
/// - the output takes the first operand's split when it has one, else the
///   second's, and inherits device and communicator from the split operand
///   (else from the first tensor operand)
///
/// A scalar counts as a tensor of shape `[1]`, so a scalar combined with a
/// 0-d tensor gives a result of shape `[1]`.
///
/// If a split operand's shard is empty, `op` is not called and the output
/// shard is empty.
#[tracing::instrument(level = "debug", skip_all)]
pub fn binary_op<'a, C, F>(
    op: F,
    t1: impl Into<Operand<'a, C>>,
    t2: impl Into<Operand<'a, C>>,
    world: &Arc<C>,
) -> Result<DistTensor<C>>
where
    C: Communicator,
    F: Fn(&LocalTensor, &LocalTensor) -> Result<LocalTensor>,
{
    let (t1, t2) = (t1.into(), t2.into());
    let (d1, d2) = operand_dtypes(&t1, &t2);
    let promoted = promote(d1, d2);

    let g1 = global_shape(&t1);
    let g2 = global_shape(&t2);
    let out_ndim = g1.ndim().max(g2.ndim());

    let mut lhs = Side::new(t1, d1, out_ndim);
    let mut rhs = Side::new(t2, d2, out_ndim);
    if let (Some(a), Some(b)) = (lhs.split, rhs.split) {
        if a != b {
            return Err(Error::unsupported_layout(format!(
                "operands are split along different axes ({a} and {b})"
            )));
        }
    }
    let out_gshape = broadcast_shape(&g1, &g2)?;
    tracing::debug!(lhs = ?g1, rhs = ?g2, out = ?out_gshape, split1 = ?lhs.split, split2 = ?rhs.split);

    lhs.replicate_singleton_split()?;
    rhs.replicate_singleton_split()?;

    let out_split = lhs.split.or(rhs.split);
    if let Some(axis) = out_split {
        match (lhs.split, rhs.split) {
            (Some(_), None) => rhs.narrow_to(&lhs, axis)?,
            (None, Some(_)) => lhs.narrow_to(&rhs, axis)?,
            _ => {}
        }
    }

    let origin = if lhs.split.is_some() {
        lhs.handle
    } else if rhs.split.is_some() {
        rhs.handle
    } else {
        lhs.handle.or(rhs.handle)
    };
    let (device, comm) = match origin {
        Some(t) => (t.device(), Arc::clone(t.comm())),
        None => (Device::default(), Arc::clone(world)),
    };

    let out_lshape = broadcast_shape(lhs.local.shape(), rhs.local.shape())?;
    let result = if lhs.has_empty_shard() || rhs.has_empty_shard() {
        LocalTensor::zeros(&out_lshape, promoted)
    } else {
        op(&lhs.local.cast(promoted), &rhs.local.cast(promoted))?
    };
    if result.shape() != &out_lshape {
        return Err(Error::shape_mismatch(&out_lshape, result.shape()));
    }

    let dtype = result.dtype();
    DistTensor::new(result, out_gshape, dtype, out_split, device, comm)
}
