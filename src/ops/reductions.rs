//! Reductions over distributed tensors

use super::{Axis, ReduceOp, reduce_op};
use crate::comm::Communicator;
use crate::dtype::DType;
use crate::error::Result;
use crate::tensor::{DistTensor, LocalTensor};

/// Booleans and integers accumulate in the default integer dtype
fn accumulation_dtype(dtype: DType) -> DType {
    if dtype.is_bool() || dtype.is_int() {
        DType::default_int()
    } else {
        dtype
    }
}

fn arithmetic(op: ReduceOp) -> impl Fn(&LocalTensor, Option<usize>) -> Result<LocalTensor> {
    move |t: &LocalTensor, dim: Option<usize>| t.cast(accumulation_dtype(t.dtype())).reduce(op, dim)
}

fn logical(op: ReduceOp) -> impl Fn(&LocalTensor, Option<usize>) -> Result<LocalTensor> {
    move |t: &LocalTensor, dim: Option<usize>| t.cast(DType::Bool).reduce(op, dim)
}

/// Sum of elements over `axis`
///
/// Boolean and integer input is summed as `I64`.
pub fn sum<C: Communicator>(
    x: &DistTensor<C>,
    axis: impl Into<Axis>,
    keepdim: bool,
    out: Option<&mut DistTensor<C>>,
) -> Result<DistTensor<C>> {
    reduce_op(x, arithmetic(ReduceOp::Sum), ReduceOp::Sum, axis, keepdim, out)
}

/// Product of elements over `axis`
///
/// Boolean and integer input is multiplied as `I64`.
pub fn prod<C: Communicator>(
    x: &DistTensor<C>,
    axis: impl Into<Axis>,
    keepdim: bool,
    out: Option<&mut DistTensor<C>>,
) -> Result<DistTensor<C>> {
    reduce_op(x, arithmetic(ReduceOp::Prod), ReduceOp::Prod, axis, keepdim, out)
}

/// Minimum over `axis`
pub fn min<C: Communicator>(
    x: &DistTensor<C>,
    axis: impl Into<Axis>,
    keepdim: bool,
    out: Option<&mut DistTensor<C>>,
) -> Result<DistTensor<C>> {
    reduce_op(x, |t, dim| t.reduce(ReduceOp::Min, dim), ReduceOp::Min, axis, keepdim, out)
}

/// Maximum over `axis`
pub fn max<C: Communicator>(
    x: &DistTensor<C>,
    axis: impl Into<Axis>,
    keepdim: bool,
    out: Option<&mut DistTensor<C>>,
) -> Result<DistTensor<C>> {
    reduce_op(x, |t, dim| t.reduce(ReduceOp::Max, dim), ReduceOp::Max, axis, keepdim, out)
}

/// True where every element over `axis` is non-zero
pub fn all<C: Communicator>(
    x: &DistTensor<C>,
    axis: impl Into<Axis>,
    keepdim: bool,
    out: Option<&mut DistTensor<C>>,
) -> Result<DistTensor<C>> {
    reduce_op(x, logical(ReduceOp::LAnd), ReduceOp::LAnd, axis, keepdim, out)
}

/// True where any element over `axis` is non-zero
pub fn any<C: Communicator>(
    x: &DistTensor<C>,
    axis: impl Into<Axis>,
    keepdim: bool,
    out: Option<&mut DistTensor<C>>,
) -> Result<DistTensor<C>> {
    reduce_op(x, logical(ReduceOp::LOr), ReduceOp::LOr, axis, keepdim, out)
}
