//! Tensor types
//!
//! - [`LocalTensor`]: one rank's contiguous shard (shape plus shared [`Buffer`])
//! - [`DistTensor`]: the distributed handle tying a shard to its global shape,
//!   split axis and communicator

mod buffer;
mod device;
mod dist;
pub(crate) mod local;
mod shape;

pub use buffer::Buffer;
pub use device::Device;
pub use dist::DistTensor;
pub use local::LocalTensor;
pub use shape::Shape;
