//! Offset computation for layout kernels
//!
//! Every layout transformation on a contiguous shard is a gather: for each
//! element of the destination (in row-major order) we compute the flat
//! offset of the source element it copies.

/// Row-major strides of a contiguous tensor
pub fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Walk `dst_shape` in row-major order and collect source offsets
///
/// `src_index(axis, i)` maps a destination coordinate to the source
/// coordinate along `axis`; `src_strides` has one entry per destination axis.
fn gather_offsets(
    dst_shape: &[usize],
    src_strides: &[usize],
    src_index: impl Fn(usize, usize) -> usize,
) -> Vec<usize> {
    let numel: usize = dst_shape.iter().product();
    let mut offsets = Vec::with_capacity(numel);
    if numel == 0 {
        return offsets;
    }

    let ndim = dst_shape.len();
    let mut coord = vec![0usize; ndim];
    for _ in 0..numel {
        offsets.push(
            coord
                .iter()
                .enumerate()
                .map(|(axis, &i)| src_index(axis, i) * src_strides[axis])
                .sum(),
        );
        for axis in (0..ndim).rev() {
            coord[axis] += 1;
            if coord[axis] < dst_shape[axis] {
                break;
            }
            coord[axis] = 0;
        }
    }
    offsets
}

/// Offsets that materialise `src_shape` broadcast to `dst_shape`
///
/// `src_shape` is right-aligned against `dst_shape`; axes of extent 1 (and
/// missing leading axes) are repeated. The caller guarantees the shapes are
/// broadcast compatible.
pub fn broadcast_offsets(src_shape: &[usize], dst_shape: &[usize]) -> Vec<usize> {
    let pad = dst_shape.len() - src_shape.len();
    let padded: Vec<usize> = std::iter::repeat_n(1, pad)
        .chain(src_shape.iter().copied())
        .collect();
    let strides = contiguous_strides(&padded);
    gather_offsets(dst_shape, &strides, |axis, i| {
        if padded[axis] == 1 { 0 } else { i }
    })
}

/// Offsets that tile `src_shape` `multiples[axis]` times along each axis
///
/// `multiples` has the same length as `src_shape`.
pub fn repeat_offsets(src_shape: &[usize], multiples: &[usize]) -> Vec<usize> {
    let dst_shape: Vec<usize> = src_shape
        .iter()
        .zip(multiples)
        .map(|(&s, &m)| s * m)
        .collect();
    let strides = contiguous_strides(src_shape);
    gather_offsets(&dst_shape, &strides, |axis, i| i % src_shape[axis])
}

/// Offsets of the slice `start..start + len` along `dim`
pub fn narrow_offsets(shape: &[usize], dim: usize, start: usize, len: usize) -> Vec<usize> {
    let mut dst_shape = shape.to_vec();
    dst_shape[dim] = len;
    let strides = contiguous_strides(shape);
    gather_offsets(&dst_shape, &strides, |axis, i| {
        if axis == dim { i + start } else { i }
    })
}
