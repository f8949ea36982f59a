//! Reduction operation dispatcher

use super::{Axis, ReduceOp, reduce_output_shape, sanitize_axis};
use crate::comm::Communicator;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::tensor::{DistTensor, LocalTensor, Shape};
use std::sync::Arc;

/// Reduce `x` over `axis`
///
/// `partial` performs the shard-local reduction: `partial(t, None)` reduces
/// every element to shape `[1]`, `partial(t, Some(d))` reduces axis `d`
/// keeping it with extent 1. It is applied once per reduced axis.
///
/// When the reduced axes include the split axis, the partial results are
/// combined across ranks with a single `all_reduce(combine)` and the result
/// is unsplit. Otherwise no communication happens and the split axis is
/// kept (shifted left past dropped axes when `keepdim` is false).
///
/// [`Axis::All`] produces a global shape of `[1]`, or all ones with
/// `keepdim`. Boolean combines (`LAnd`, `LOr`, `BAnd`, `BOr`) produce a
/// `Bool` result.
///
/// If `out` is given it must have exactly the output global shape, checked
/// before any communication; it is then overwritten and a handle sharing its
/// storage is returned.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(gshape = ?x.gshape(), split = ?x.split(), combine = ?combine, keepdim = keepdim)
)]
pub fn reduce_op<C, F>(
    x: &DistTensor<C>,
    partial: F,
    combine: ReduceOp,
    axis: impl Into<Axis>,
    keepdim: bool,
    out: Option<&mut DistTensor<C>>,
) -> Result<DistTensor<C>>
where
    C: Communicator,
    F: Fn(&LocalTensor, Option<usize>) -> Result<LocalTensor>,
{
    let axis = axis.into();
    let axes = sanitize_axis(x.gshape(), &axis)?;
    let ndim = x.ndim();

    let out_gshape = match &axes {
        None if keepdim => Shape::from(vec![1; ndim]),
        None => Shape::from([1]),
        Some(axes) => reduce_output_shape(x.gshape(), axes, keepdim),
    };
    if let Some(o) = out.as_deref() {
        if o.gshape() != &out_gshape {
            return Err(Error::shape_mismatch(&out_gshape, o.gshape()));
        }
    }

    let reduces_split = match (x.split(), &axes) {
        (Some(_), None) => true,
        (Some(s), Some(axes)) => axes.contains(&s),
        (None, _) => false,
    };

    let mut local = match &axes {
        None => partial(x.local(), None)?.reshape(&out_gshape)?,
        Some(axes) => {
            let mut acc = x.local().clone();
            for &d in axes {
                acc = partial(&acc, Some(d))?;
            }
            if keepdim {
                acc
            } else {
                let shape = reduce_output_shape(acc.shape(), axes, false);
                acc.reshape(&shape)?
            }
        }
    };

    let out_split = if reduces_split {
        None
    } else {
        x.split().map(|s| match (&axes, keepdim) {
            (Some(axes), false) => s - axes.iter().filter(|&&a| a < s).count(),
            _ => s,
        })
    };

    if reduces_split && x.comm().is_distributed() {
        let mut buffer = local.data().clone();
        x.comm().all_reduce(&mut buffer, combine)?;
        if buffer.len() != local.numel() {
            return Err(Error::Communication(format!(
                "all_reduce returned {} elements, expected {}",
                buffer.len(),
                local.numel()
            )));
        }
        local = LocalTensor::new(local.shape().clone(), buffer)?;
    }

    let dtype = if combine.is_boolean() {
        DType::Bool
    } else {
        local.dtype()
    };
    let result = DistTensor::new(
        local.cast(dtype),
        out_gshape,
        dtype,
        out_split,
        x.device(),
        Arc::clone(x.comm()),
    )?;

    match out {
        Some(o) => {
            *o = result;
            Ok(o.clone())
        }
        None => Ok(result),
    }
}
