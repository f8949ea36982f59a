//! CPU kernels for shard-local computation
//!
//! Kernels operate on contiguous row-major slices of a concrete element type.
//! Layout work (broadcasting, tiling, narrowing) is expressed as gathers over
//! precomputed source offsets, see [`index`].
//!
//! With the `rayon` feature (default), element-wise kernels and reductions
//! over many rows run in parallel once the work exceeds
//! [`PARALLEL_THRESHOLD`] elements.

pub mod elementwise;
pub mod index;
pub mod reduce;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Minimum number of elements before a kernel is split across threads
pub const PARALLEL_THRESHOLD: usize = 1 << 15;

/// Apply `f` to every element of `a`
pub(crate) fn map<T, U, F>(a: &[T], f: F) -> Vec<U>
where
    T: Copy + Send + Sync,
    U: Send,
    F: Fn(T) -> U + Send + Sync,
{
    #[cfg(feature = "rayon")]
    {
        if a.len() >= PARALLEL_THRESHOLD {
            return a.par_iter().map(|&x| f(x)).collect();
        }
    }

    a.iter().map(|&x| f(x)).collect()
}

/// Apply `f` pairwise to two slices of equal length
pub(crate) fn zip_map<T, U, F>(a: &[T], b: &[T], f: F) -> Vec<U>
where
    T: Copy + Send + Sync,
    U: Send,
    F: Fn(T, T) -> U + Send + Sync,
{
    debug_assert_eq!(a.len(), b.len());

    #[cfg(feature = "rayon")]
    {
        if a.len() >= PARALLEL_THRESHOLD {
            return a
                .par_iter()
                .zip(b.par_iter())
                .map(|(&x, &y)| f(x, y))
                .collect();
        }
    }

    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}
