//! Distributed tensor operations
//!
//! Every operation is built on one of three dispatchers that take care of
//! layout and communication, leaving the caller to supply a shard-local
//! computation on [`LocalTensor`](crate::tensor::LocalTensor)s:
//!
//! ```text
//! binary_op(op, t1, t2, world)             add, sub, mul, div, pow, maximum, minimum
//!   ├── promote operand dtypes
//!   ├── broadcast global shapes
//!   ├── replicate operands split along an extent-1 axis   (all_reduce + broadcast)
//!   └── narrow unsplit operands to the split operand's chunk
//!
//! local_op(op, x, out)                     sqrt, exp, log, abs, sin, cos, ...
//!   └── never communicates
//!
//! reduce_op(x, partial, combine, axis, keepdim, out)
//!   ├── shard-local partial reduction                  sum, prod, min, max, all, any
//!   └── one all_reduce when the split axis is reduced
//! ```
//!
//! Shape helpers ([`broadcast_shape`], [`sanitize_axis`],
//! [`reduce_output_shape`]) and [`promote_types`] are exported for callers
//! that build their own operations.
//!
//! All ranks of a communicator must call the same operations in the same
//! order with tensors of the same global metadata. Whether a collective runs
//! depends only on that metadata, so every rank takes the same path.

mod arithmetic;
mod binary;
mod dispatch;
mod elementwise;
mod local;
mod operand;
mod reduce;
mod reduction;
mod reductions;

pub use arithmetic::*;
pub use binary::binary_op;
pub use elementwise::*;
pub use local::local_op;
pub use operand::Operand;
pub use reduce::*;
pub use reduction::reduce_op;
pub use reductions::*;

pub use crate::dtype::promote as promote_types;
