//! Reduction kernels

use super::elementwise::{maximum, minimum};
use crate::dtype::Element;
use crate::ops::ReduceOp;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Identity element of `op`: folding it into any value leaves the value unchanged
#[inline]
pub fn identity<T: Element>(op: ReduceOp) -> T {
    match op {
        ReduceOp::Sum | ReduceOp::LOr | ReduceOp::BOr => T::zero(),
        ReduceOp::Prod | ReduceOp::LAnd => T::one(),
        ReduceOp::Min => T::highest(),
        ReduceOp::Max => T::lowest(),
        ReduceOp::BAnd => T::all_ones(),
    }
}

/// Combine two values with `op`
#[inline]
pub fn fold<T: Element>(op: ReduceOp, a: T, b: T) -> T {
    match op {
        ReduceOp::Sum => a.add(b),
        ReduceOp::Prod => a.mul(b),
        ReduceOp::Min => minimum(a, b),
        ReduceOp::Max => maximum(a, b),
        ReduceOp::LAnd => T::from_bool(a.is_truthy() && b.is_truthy()),
        ReduceOp::LOr => T::from_bool(a.is_truthy() || b.is_truthy()),
        ReduceOp::BAnd => a.bit_and(b),
        ReduceOp::BOr => a.bit_or(b),
    }
}

/// Reduce every element of `data` to a single value
pub fn reduce_all<T: Element>(op: ReduceOp, data: &[T]) -> T {
    #[cfg(feature = "rayon")]
    {
        if data.len() >= super::PARALLEL_THRESHOLD {
            return data
                .par_iter()
                .copied()
                .reduce(|| identity(op), |a, b| fold(op, a, b));
        }
    }

    data.iter().fold(identity(op), |acc, &x| fold(op, acc, x))
}

/// Reduce the middle axis of a tensor viewed as `[outer, reduce_size, inner]`
///
/// Returns `outer * inner` values in row-major order. A zero `reduce_size`
/// yields the identity of `op` everywhere.
pub fn reduce_axis<T: Element>(
    op: ReduceOp,
    data: &[T],
    outer_size: usize,
    reduce_size: usize,
    inner_size: usize,
) -> Vec<T> {
    let row = |outer: usize| -> Vec<T> {
        let base = outer * reduce_size * inner_size;
        let mut acc = vec![identity::<T>(op); inner_size];
        for r in 0..reduce_size {
            let start = base + r * inner_size;
            for (a, &x) in acc.iter_mut().zip(&data[start..start + inner_size]) {
                *a = fold(op, *a, x);
            }
        }
        acc
    };

    #[cfg(feature = "rayon")]
    {
        if outer_size > 1 && data.len() >= super::PARALLEL_THRESHOLD {
            return (0..outer_size).into_par_iter().flat_map_iter(row).collect();
        }
    }

    (0..outer_size).flat_map(row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identities() {
        assert_eq!(identity::<i32>(ReduceOp::Sum), 0);
        assert_eq!(identity::<i32>(ReduceOp::Prod), 1);
        assert_eq!(identity::<u8>(ReduceOp::Min), u8::MAX);
        assert_eq!(identity::<f32>(ReduceOp::Max), f32::NEG_INFINITY);
        assert!(identity::<bool>(ReduceOp::LAnd));
        assert!(!identity::<bool>(ReduceOp::LOr));
        assert_eq!(identity::<i8>(ReduceOp::BAnd), -1);
    }

    #[test]
    fn test_fold_logical_on_numbers() {
        assert_eq!(fold(ReduceOp::LAnd, 2i32, 3), 1);
        assert_eq!(fold(ReduceOp::LAnd, 2i32, 0), 0);
        assert_eq!(fold(ReduceOp::LOr, 0.0f64, -1.0), 1.0);
    }

    #[test]
    fn test_reduce_all() {
        assert_eq!(reduce_all(ReduceOp::Sum, &[1i64, 2, 3]), 6);
        assert_eq!(reduce_all(ReduceOp::Prod, &[2.0f64, 3.0]), 6.0);
        assert_eq!(reduce_all::<i32>(ReduceOp::Sum, &[]), 0);
    }

    #[test]
    fn test_reduce_axis() {
        // [[1, 2, 3], [4, 5, 6]]
        let data = [1i32, 2, 3, 4, 5, 6];
        // axis 0
        assert_eq!(reduce_axis(ReduceOp::Sum, &data, 1, 2, 3), vec![5, 7, 9]);
        // axis 1
        assert_eq!(reduce_axis(ReduceOp::Max, &data, 2, 3, 1), vec![3, 6]);
        // empty axis
        assert_eq!(reduce_axis::<i32>(ReduceOp::Prod, &[], 2, 0, 1), vec![1, 1]);
    }
}
