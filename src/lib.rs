//! # shardnum
//!
//! **Distributed n-dimensional arrays for Rust, split along one axis across
//! the ranks of a communicator.**
//!
//! Every rank runs the same program (SPMD). A [`DistTensor`](tensor::DistTensor)
//! holds this rank's shard of a global array together with the global shape,
//! dtype, split axis and communicator. Operations promote dtypes, broadcast
//! shapes and insert the collectives needed to keep every rank's shard
//! consistent with the global result.
//!
//! ## Features
//!
//! - **Element-wise ops**: binary arithmetic with NumPy broadcasting, unary math
//! - **Reductions**: sum, prod, min, max, all, any over any set of axes
//! - **Type promotion**: `bool < u8 < i8 < i16 < i32 < i64 < f32 < f64`
//! - **Communicators**: a single-process [`SelfComm`](comm::SelfComm) and an
//!   in-process [`ThreadComm`](comm::ThreadComm) group with one thread per rank
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shardnum::prelude::*;
//! use std::sync::Arc;
//!
//! let comms = ThreadComm::group(4)?;
//! // on each rank's thread:
//! let comm = Arc::new(comm);
//! let x = DistTensor::from_global(LocalTensor::from_vec(data, &[8, 3])?, Some(0), comm.clone())?;
//! let y = ops::add(&x, 1.0, &comm)?;
//! let total = ops::sum(&y, Axis::All, false, None)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded shard-local kernels

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comm;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod ops;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::comm::{Communicator, SelfComm, ThreadComm};
    pub use crate::dtype::{DType, Element, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{self, Axis, BinaryOp, Operand, ReduceOp, UnaryOp};
    pub use crate::tensor::{Device, DistTensor, LocalTensor, Shape};
}
