//! Element-wise binary and unary kernels

use super::{map, zip_map};
use crate::dtype::Element;
use crate::ops::{BinaryOp, UnaryOp};
use std::cmp::Ordering;

/// Apply a binary operation to a single pair of values
#[inline]
pub fn apply_binary<T: Element>(op: BinaryOp, a: T, b: T) -> T {
    match op {
        BinaryOp::Add => a.add(b),
        BinaryOp::Sub => a.sub(b),
        BinaryOp::Mul => a.mul(b),
        BinaryOp::Div => a.div(b),
        BinaryOp::Pow => a.pow(b),
        BinaryOp::Max => maximum(a, b),
        BinaryOp::Min => minimum(a, b),
    }
}

/// Larger of two values; NaN propagates
#[inline]
pub fn maximum<T: Element>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        Some(_) => a,
        None => nan_of(a, b),
    }
}

/// Smaller of two values; NaN propagates
#[inline]
pub fn minimum<T: Element>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        Some(_) => a,
        None => nan_of(a, b),
    }
}

#[inline]
fn nan_of<T: Element>(a: T, b: T) -> T {
    if a.partial_cmp(&a).is_none() { a } else { b }
}

/// Element-wise binary operation over two slices of equal length
pub fn binary<T: Element>(op: BinaryOp, a: &[T], b: &[T]) -> Vec<T> {
    zip_map(a, b, |x, y| apply_binary(op, x, y))
}

/// Element-wise unary operation, evaluated in f64
pub fn unary<T: Element>(op: UnaryOp, a: &[T]) -> Vec<T> {
    map(a, |x| T::from_f64(op.apply(x.to_f64())))
}
