//! In-process communicator: one thread per rank

use super::Communicator;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::ops::ReduceOp;
use crate::tensor::Buffer;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Barrier};

/// A buffer in transit: dtype tag plus native-endian bytes
#[derive(Clone)]
struct Payload {
    dtype: DType,
    bytes: Vec<u8>,
}

impl Payload {
    fn encode(buffer: &Buffer) -> Self {
        Self {
            dtype: buffer.dtype(),
            bytes: buffer.to_bytes(),
        }
    }

    fn decode(&self, rank: usize, expected: DType) -> Result<Buffer> {
        if self.dtype != expected {
            return Err(Error::Communication(format!(
                "rank {rank} sent {} data, expected {expected}",
                self.dtype
            )));
        }
        Buffer::from_bytes(self.dtype, &self.bytes)
    }
}

struct Shared {
    size: usize,
    barrier: Barrier,
    slots: Mutex<Vec<Option<Payload>>>,
}

/// Communicator for ranks running as threads of one process
///
/// [`ThreadComm::group`] creates the handles of a group; hand one to each
/// thread. A collective publishes every rank's contribution in a shared
/// exchange area, waits on a barrier, reads the contributions and waits
/// again before the area can be reused.
#[derive(Clone)]
pub struct ThreadComm {
    rank: usize,
    shared: Arc<Shared>,
}

impl ThreadComm {
    /// Create the `size` handles of a new group, ordered by rank
    pub fn group(size: usize) -> Result<Vec<ThreadComm>> {
        if size == 0 {
            return Err(Error::invalid_argument("size", "a group needs at least one rank"));
        }
        let shared = Arc::new(Shared {
            size,
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![None; size]),
        });
        Ok((0..size)
            .map(|rank| ThreadComm {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect())
    }

    /// Publish `payload` and collect every rank's contribution
    fn exchange(&self, payload: Payload) -> Result<Vec<Payload>> {
        self.shared.slots.lock()[self.rank] = Some(payload);
        self.shared.barrier.wait();
        let all: Option<Vec<Payload>> = self.shared.slots.lock().iter().cloned().collect();
        self.shared.barrier.wait();
        all.ok_or_else(|| Error::Communication("a rank did not contribute".to_string()))
    }
}

impl fmt::Debug for ThreadComm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadComm")
            .field("rank", &self.rank)
            .field("size", &self.shared.size)
            .finish()
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn broadcast(&self, buffer: &mut Buffer, root: usize) -> Result<()> {
        if root >= self.size() {
            return Err(Error::invalid_argument(
                "root",
                format!("rank {root} does not exist in a group of {}", self.size()),
            ));
        }
        tracing::trace!(rank = self.rank, root, len = buffer.len(), "broadcast");

        // Only the root's bytes are read
        let payload = if self.rank == root {
            Payload::encode(buffer)
        } else {
            Payload {
                dtype: buffer.dtype(),
                bytes: Vec::new(),
            }
        };
        let payloads = self.exchange(payload)?;
        if self.rank == root {
            return Ok(());
        }

        let data = payloads[root].decode(root, buffer.dtype())?;
        if data.len() != buffer.len() {
            return Err(Error::Communication(format!(
                "broadcast from rank {root} carried {} elements, expected {}",
                data.len(),
                buffer.len()
            )));
        }
        *buffer = data;
        Ok(())
    }

    fn all_reduce(&self, buffer: &mut Buffer, op: ReduceOp) -> Result<()> {
        tracing::trace!(rank = self.rank, ?op, len = buffer.len(), "all_reduce");

        let payloads = self.exchange(Payload::encode(buffer))?;
        if op.is_bitwise() && buffer.dtype().is_float() {
            return Err(Error::unsupported_dtype(buffer.dtype(), op.name()));
        }

        let dtype = buffer.dtype();
        let mut acc = payloads[0].decode(0, dtype)?;
        for (rank, payload) in payloads.iter().enumerate().skip(1) {
            let part = payload.decode(rank, dtype)?;
            if part.len() != acc.len() {
                return Err(Error::Communication(format!(
                    "rank {rank} contributed {} elements, expected {}",
                    part.len(),
                    acc.len()
                )));
            }
            acc.combine(&part, op)?;
        }
        if acc.len() != buffer.len() {
            return Err(Error::Communication(format!(
                "all_reduce produced {} elements, expected {}",
                acc.len(),
                buffer.len()
            )));
        }
        *buffer = acc;
        Ok(())
    }
}
