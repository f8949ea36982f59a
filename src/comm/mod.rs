//! Communicator abstraction for SPMD execution
//!
//! Every rank runs the same program on its own shard and coordinates through
//! a [`Communicator`]. Collectives are blocking and must be called by every
//! rank of the group in the same order.
//!
//! Implementations:
//! - [`SelfComm`]: a single process, collectives are no-ops
//! - [`ThreadComm`]: several ranks inside one process, one thread per rank

mod single;
mod thread;

pub use single::SelfComm;
pub use thread::ThreadComm;

use crate::error::Result;
use crate::ops::ReduceOp;
use crate::tensor::Buffer;
use std::fmt;
use std::ops::Range;

/// Inter-rank communication used by the distributed dispatchers
pub trait Communicator: Send + Sync + fmt::Debug + 'static {
    /// This process's rank in `0..size()`
    fn rank(&self) -> usize;

    /// Number of ranks in the group
    fn size(&self) -> usize;

    /// Returns true if more than one rank participates
    fn is_distributed(&self) -> bool {
        self.size() > 1
    }

    /// Replace `buffer` on every rank with the contents of `root`'s buffer
    ///
    /// Every rank must pass a buffer of the same dtype and length.
    fn broadcast(&self, buffer: &mut Buffer, root: usize) -> Result<()>;

    /// Combine `buffer` element-wise across all ranks with `op`, in place
    ///
    /// Contributions are folded in rank order, so every rank ends up with a
    /// bit-identical result.
    fn all_reduce(&self, buffer: &mut Buffer, op: ReduceOp) -> Result<()>;

    /// This rank's slice of an axis of length `extent`
    fn chunk(&self, extent: usize) -> Range<usize> {
        chunk_range(extent, self.rank(), self.size())
    }
}

/// Balanced partition of `extent` over `size` ranks
///
/// Each rank gets `extent / size` elements and the first `extent % size`
/// ranks get one more, so slices are contiguous and ordered by rank.
pub fn chunk_range(extent: usize, rank: usize, size: usize) -> Range<usize> {
    let base = extent / size;
    let rem = extent % size;
    let start = rank * base + rank.min(rem);
    let len = base + usize::from(rank < rem);
    start..start + len
}
