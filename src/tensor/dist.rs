//! Distributed tensor handle

use super::{Buffer, Device, LocalTensor, Shape};
use crate::comm::Communicator;
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::kernel;
use crate::ops::ReduceOp;
use std::fmt;
use std::sync::Arc;

/// An n-dimensional array partitioned along at most one axis
///
/// `DistTensor` consists of:
/// - **Global shape**: the shape of the logical array
/// - **Split axis**: the partitioned axis, or `None` when every rank holds
///   the whole array
/// - **Local shard**: this rank's contiguous slice along the split axis
/// - **Communicator**: the group of ranks the array is spread over
///
/// The local shape equals the global shape except along the split axis,
/// where it holds this rank's slice length (possibly 0).
///
/// Cloning a handle shares the shard storage; writes go through
/// copy-on-write.
pub struct DistTensor<C: Communicator> {
    local: LocalTensor,
    gshape: Shape,
    dtype: DType,
    split: Option<usize>,
    device: Device,
    comm: Arc<C>,
}

impl<C: Communicator> DistTensor<C> {
    /// Assemble a handle from its parts
    ///
    /// Fails if `split` is not an axis of `gshape`, if the shard's rank or
    /// extents disagree with the global shape (outside the split axis the
    /// extents must be equal, along it the shard may not be larger), or if
    /// the shard's dtype is not `dtype`.
    pub fn new(
        local: LocalTensor,
        gshape: impl Into<Shape>,
        dtype: DType,
        split: Option<usize>,
        device: Device,
        comm: Arc<C>,
    ) -> Result<Self> {
        let gshape = gshape.into();
        let ndim = gshape.ndim();
        if let Some(s) = split {
            if s >= ndim {
                return Err(Error::InvalidAxis {
                    axis: s as isize,
                    ndim,
                });
            }
        }
        if local.dtype() != dtype {
            return Err(Error::DTypeMismatch {
                lhs: dtype,
                rhs: local.dtype(),
            });
        }

        let lshape = local.shape();
        let consistent = lshape.ndim() == ndim
            && lshape.iter().zip(gshape.iter()).enumerate().all(|(axis, (&l, &g))| {
                if Some(axis) == split { l <= g } else { l == g }
            });
        if !consistent {
            return Err(Error::shape_mismatch(&gshape, lshape));
        }

        Ok(Self {
            local,
            gshape,
            dtype,
            split,
            device,
            comm,
        })
    }

    /// Distribute a tensor that every rank holds in full
    ///
    /// Each rank keeps its balanced chunk of `split` (see
    /// [`Communicator::chunk`]); with `split == None` the tensor is
    /// replicated as is.
    pub fn from_global(global: LocalTensor, split: Option<usize>, comm: Arc<C>) -> Result<Self> {
        let gshape = global.shape().clone();
        let dtype = global.dtype();
        let local = match split {
            Some(s) if s < gshape.ndim() => {
                let range = comm.chunk(gshape[s]);
                global.narrow(s, range.start, range.len())?
            }
            _ => global,
        };
        Self::new(local, gshape, dtype, split, Device::default(), comm)
    }

    /// Global shape
    #[inline]
    pub fn gshape(&self) -> &Shape {
        &self.gshape
    }

    /// Shape of this rank's shard
    #[inline]
    pub fn lshape(&self) -> &Shape {
        self.local.shape()
    }

    /// Partitioned axis, if any
    #[inline]
    pub fn split(&self) -> Option<usize> {
        self.split
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Device tag
    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Communicator shared by the ranks holding this array
    #[inline]
    pub fn comm(&self) -> &Arc<C> {
        &self.comm
    }

    /// This rank's shard
    #[inline]
    pub fn local(&self) -> &LocalTensor {
        &self.local
    }

    /// Mutable access to this rank's shard
    ///
    /// Replacing the shard with one of a different shape or dtype breaks the
    /// handle's invariants.
    #[inline]
    pub fn local_mut(&mut self) -> &mut LocalTensor {
        &mut self.local
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.gshape.ndim()
    }

    /// Returns true if the array is partitioned over more than one rank
    pub fn is_distributed(&self) -> bool {
        self.split.is_some() && self.comm.is_distributed()
    }

    /// Reassemble the full array on every rank
    ///
    /// Collective: every rank of the communicator must call it. Shards are
    /// placed in rank order along the split axis; the shard lengths must add
    /// up to the global extent.
    pub fn to_global(&self) -> Result<LocalTensor> {
        let split = match self.split {
            Some(s) if self.comm.is_distributed() => s,
            _ => return Ok(self.local.clone()),
        };

        // Learn every rank's slice length to find our offset
        let mut lengths = vec![0i64; self.comm.size()];
        lengths[self.comm.rank()] = self.lshape()[split] as i64;
        let mut lengths_buf = Buffer::I64(lengths);
        self.comm.all_reduce(&mut lengths_buf, ReduceOp::Sum)?;
        let lengths = lengths_buf.to_vec::<i64>();

        let total: i64 = lengths.iter().sum();
        if total != self.gshape[split] as i64 {
            return Err(Error::unsupported_layout(format!(
                "shards along axis {split} hold {total} elements, global extent is {}",
                self.gshape[split]
            )));
        }
        let start: i64 = lengths[..self.comm.rank()].iter().sum();

        let mut global = Buffer::zeros(self.dtype, self.gshape.numel());
        let offsets =
            kernel::index::narrow_offsets(&self.gshape, split, start as usize, self.lshape()[split]);
        global.scatter(&offsets, self.local.data())?;
        self.comm.all_reduce(&mut global, ReduceOp::Sum)?;
        LocalTensor::new(self.gshape.clone(), global)
    }
}

impl<C: Communicator> Clone for DistTensor<C> {
    fn clone(&self) -> Self {
        Self {
            local: self.local.clone(),
            gshape: self.gshape.clone(),
            dtype: self.dtype,
            split: self.split,
            device: self.device,
            comm: Arc::clone(&self.comm),
        }
    }
}

impl<C: Communicator> fmt::Debug for DistTensor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistTensor")
            .field("gshape", &self.gshape)
            .field("lshape", self.lshape())
            .field("split", &self.split)
            .field("dtype", &self.dtype)
            .field("device", &self.device)
            .field("comm", &self.comm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::SelfComm;
    use crate::tensor::local::arange;

    fn comm() -> Arc<SelfComm> {
        Arc::new(SelfComm)
    }

    #[test]
    fn test_new_validates_split_axis() {
        let local = arange(&[2, 3], DType::F32);
        let err = DistTensor::new(local, [2, 3], DType::F32, Some(2), Device::cpu(), comm())
            .unwrap_err();
        assert_eq!(err, Error::InvalidAxis { axis: 2, ndim: 2 });
    }

    #[test]
    fn test_new_validates_shard_shape() {
        let local = arange(&[2, 3], DType::F32);
        // shard shorter along the split axis is fine
        assert!(
            DistTensor::new(local.clone(), [5, 3], DType::F32, Some(0), Device::cpu(), comm())
                .is_ok()
        );
        // but not along an unsplit axis
        assert!(matches!(
            DistTensor::new(local.clone(), [2, 4], DType::F32, Some(0), Device::cpu(), comm()),
            Err(Error::ShapeMismatch { .. })
        ));
        // nor longer than the global extent
        assert!(
            DistTensor::new(local.clone(), [1, 3], DType::F32, Some(0), Device::cpu(), comm())
                .is_err()
        );
        // rank mismatch
        assert!(
            DistTensor::new(local, [6], DType::F32, None, Device::cpu(), comm()).is_err()
        );
    }

    #[test]
    fn test_new_validates_dtype() {
        let local = arange(&[2], DType::I32);
        assert!(matches!(
            DistTensor::new(local, [2], DType::F32, None, Device::cpu(), comm()),
            Err(Error::DTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_global_single_rank_keeps_everything() {
        let t = DistTensor::from_global(arange(&[4, 2], DType::I64), Some(0), comm()).unwrap();
        assert_eq!(t.gshape().as_slice(), &[4, 2]);
        assert_eq!(t.lshape().as_slice(), &[4, 2]);
        assert_eq!(t.split(), Some(0));
        assert!(!t.is_distributed());
        assert_eq!(t.to_global().unwrap(), arange(&[4, 2], DType::I64));
    }

    #[test]
    fn test_clone_shares_storage() {
        let t = DistTensor::from_global(arange(&[3], DType::F64), None, comm()).unwrap();
        let c = t.clone();
        assert!(c.local().shares_storage(t.local()));
        assert!(Arc::ptr_eq(c.comm(), t.comm()));
    }
}
