//! Local (unary) operation dispatcher

use super::broadcast_shape;
use crate::comm::Communicator;
use crate::dtype::{promote, promote_to_float};
use crate::error::{Error, Result};
use crate::tensor::{DistTensor, LocalTensor, Shape};
use std::sync::Arc;

/// Tile `input` so that it has exactly `target`'s shape
///
/// `target` must be the broadcast of `input`'s shape with something else, so
/// every axis of `input` (padded with leading 1s) either already matches or
/// has extent 1.
fn tile_to(input: &LocalTensor, target: &Shape) -> Result<LocalTensor> {
    let pad = target.ndim() - input.ndim();
    let multiples: Vec<usize> = target
        .iter()
        .enumerate()
        .map(|(axis, &t)| {
            let extent = if axis < pad { 1 } else { input.shape()[axis - pad] };
            if extent == t { 1 } else { t }
        })
        .collect();
    input.repeat(&multiples)
}

/// Apply an element-wise function to every element of `x`'s shard
///
/// The shard is cast to at least the default float dtype before `op` runs.
///
/// Without `out`, the result is a new handle with `x`'s global shape, split,
/// device and communicator, and the dtype `op` produced.
///
/// With `out`, the computation dtype must be representable in `out`'s dtype
/// (else `InvalidOperand`). The input is tiled to the broadcast of its shard
/// shape with `out`'s shard shape, `op` runs on it and the result is written
/// into `out`'s shard. A result whose shape differs from `out`'s shard fails
/// with `ShapeMismatch` and leaves `out` untouched. The returned handle shares
/// storage with `out`.
///
/// Never communicates.
#[tracing::instrument(level = "debug", skip_all, fields(gshape = ?x.gshape(), split = ?x.split()))]
pub fn local_op<C, F>(op: F, x: &DistTensor<C>, out: Option<&mut DistTensor<C>>) -> Result<DistTensor<C>>
where
    C: Communicator,
    F: Fn(&LocalTensor) -> Result<LocalTensor>,
{
    let dtype = promote_to_float(x.dtype());
    let input = x.local().cast(dtype);

    let Some(out) = out else {
        let result = op(&input)?;
        let result_dtype = result.dtype();
        return DistTensor::new(
            result,
            x.gshape().clone(),
            result_dtype,
            x.split(),
            x.device(),
            Arc::clone(x.comm()),
        );
    };

    if promote(dtype, out.dtype()) != out.dtype() {
        return Err(Error::invalid_operand(format!(
            "cannot store {dtype} results in an output of dtype {}",
            out.dtype()
        )));
    }
    let target = broadcast_shape(x.lshape(), out.lshape())?;
    let input = tile_to(&input, &target)?;
    let result = op(&input)?;
    if result.shape() != out.lshape() {
        return Err(Error::shape_mismatch(out.lshape(), result.shape()));
    }
    out.local_mut().assign(&result)?;
    Ok(out.clone())
}
