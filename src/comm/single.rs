//! Single-process communicator

use super::Communicator;
use crate::error::{Error, Result};
use crate::ops::ReduceOp;
use crate::tensor::Buffer;

/// Communicator for a group of one
///
/// Collectives leave the buffer unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelfComm;

impl Communicator for SelfComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast(&self, _buffer: &mut Buffer, root: usize) -> Result<()> {
        if root != 0 {
            return Err(Error::invalid_argument(
                "root",
                format!("rank {root} does not exist in a group of 1"),
            ));
        }
        Ok(())
    }

    fn all_reduce(&self, buffer: &mut Buffer, op: ReduceOp) -> Result<()> {
        if op.is_bitwise() && buffer.dtype().is_float() {
            return Err(Error::unsupported_dtype(buffer.dtype(), op.name()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_comm_is_noop() {
        let comm = SelfComm;
        assert_eq!(comm.rank(), 0);
        assert_eq!(comm.size(), 1);
        assert!(!comm.is_distributed());
        assert_eq!(comm.chunk(5), 0..5);

        let mut buf = Buffer::I32(vec![1, 2]);
        comm.all_reduce(&mut buf, ReduceOp::Sum).unwrap();
        comm.broadcast(&mut buf, 0).unwrap();
        assert_eq!(buf, Buffer::I32(vec![1, 2]));
    }

    #[test]
    fn test_self_comm_rejects_foreign_root() {
        let mut buf = Buffer::I32(vec![1]);
        assert!(SelfComm.broadcast(&mut buf, 1).is_err());
    }
}
