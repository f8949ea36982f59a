//! Reduction operations helpers
//!
//! Reduction kinds (shared with the communicator's all-reduce), the axis
//! argument accepted by reductions and its normalisation.

use crate::error::{Error, Result};
use crate::tensor::Shape;

/// Reduction operation kind
///
/// Used both for local reductions and to combine partial results across
/// ranks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// Sum of elements
    Sum,
    /// Product of elements
    Prod,
    /// Minimum element
    Min,
    /// Maximum element
    Max,
    /// Logical AND
    LAnd,
    /// Logical OR
    LOr,
    /// Bitwise AND
    BAnd,
    /// Bitwise OR
    BOr,
}

impl ReduceOp {
    /// Reductions whose result is a boolean
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::LAnd | Self::LOr | Self::BAnd | Self::BOr)
    }

    /// Reductions defined on the bit pattern of the elements
    pub const fn is_bitwise(self) -> bool {
        matches!(self, Self::BAnd | Self::BOr)
    }

    /// Name used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Prod => "prod",
            Self::Min => "min",
            Self::Max => "max",
            Self::LAnd => "logical_and",
            Self::LOr => "logical_or",
            Self::BAnd => "bitwise_and",
            Self::BOr => "bitwise_or",
        }
    }
}

/// Axis argument of a reduction
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Axis {
    /// Reduce over every element
    #[default]
    All,
    /// Reduce over one axis; negative values count from the end
    Single(isize),
    /// Reduce over several axes; negative values count from the end
    Many(Vec<isize>),
}

impl From<isize> for Axis {
    fn from(axis: isize) -> Self {
        Self::Single(axis)
    }
}

impl From<i32> for Axis {
    fn from(axis: i32) -> Self {
        Self::Single(axis as isize)
    }
}

impl From<usize> for Axis {
    fn from(axis: usize) -> Self {
        Self::Single(axis as isize)
    }
}

impl From<Vec<isize>> for Axis {
    fn from(axes: Vec<isize>) -> Self {
        Self::Many(axes)
    }
}

impl From<&[isize]> for Axis {
    fn from(axes: &[isize]) -> Self {
        Self::Many(axes.to_vec())
    }
}

impl<const N: usize> From<[isize; N]> for Axis {
    fn from(axes: [isize; N]) -> Self {
        Self::Many(axes.to_vec())
    }
}

impl From<Option<isize>> for Axis {
    fn from(axis: Option<isize>) -> Self {
        axis.map_or(Self::All, Self::Single)
    }
}

fn normalize_axis(axis: isize, ndim: usize) -> Result<usize> {
    let n = ndim as isize;
    if axis < -n || axis >= n {
        return Err(Error::InvalidAxis { axis, ndim });
    }
    Ok(if axis < 0 { (axis + n) as usize } else { axis as usize })
}

/// Normalise a reduction axis argument against `shape`
///
/// Returns `None` for [`Axis::All`], otherwise the non-negative axes in the
/// order given. Fails with `InvalidAxis` for values outside
/// `[-ndim, ndim)` and with `DuplicateAxis` when two entries name the same
/// axis after normalisation.
pub fn sanitize_axis(shape: &[usize], axis: &Axis) -> Result<Option<Vec<usize>>> {
    let ndim = shape.len();
    let raw: &[isize] = match axis {
        Axis::All => return Ok(None),
        Axis::Single(a) => std::slice::from_ref(a),
        Axis::Many(axes) => axes,
    };

    let mut axes = Vec::with_capacity(raw.len());
    for &a in raw {
        let a = normalize_axis(a, ndim)?;
        if axes.contains(&a) {
            return Err(Error::DuplicateAxis { axis: a });
        }
        axes.push(a);
    }
    Ok(Some(axes))
}

/// Compute output shape for reduction
///
/// # Arguments
/// * `input_shape` - Shape of input tensor
/// * `axes` - Axes to reduce over
/// * `keepdim` - If true, keep reduced axes as size 1
pub fn reduce_output_shape(input_shape: &[usize], axes: &[usize], keepdim: bool) -> Shape {
    if keepdim {
        input_shape
            .iter()
            .enumerate()
            .map(|(i, &s)| if axes.contains(&i) { 1 } else { s })
            .collect()
    } else {
        Shape::from(input_shape).without_axes(axes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_output_shape() {
        assert_eq!(reduce_output_shape(&[2, 3, 4], &[1], false), Shape::from([2, 4]));
        assert_eq!(reduce_output_shape(&[2, 3, 4], &[1], true), Shape::from([2, 1, 4]));
        assert_eq!(reduce_output_shape(&[2, 3, 4], &[0, 2], false), Shape::from([3]));
        assert_eq!(
            reduce_output_shape(&[2, 3, 4], &[0, 1, 2], true),
            Shape::from([1, 1, 1])
        );
        assert!(reduce_output_shape(&[2, 3, 4], &[0, 1, 2], false).is_empty());
    }

    #[test]
    fn test_sanitize_axis() {
        let shape = [2, 3, 4];
        assert_eq!(sanitize_axis(&shape, &Axis::All).unwrap(), None);
        assert_eq!(sanitize_axis(&shape, &Axis::Single(-1)).unwrap(), Some(vec![2]));
        assert_eq!(
            sanitize_axis(&shape, &Axis::Many(vec![0, -2])).unwrap(),
            Some(vec![0, 1])
        );
        assert_eq!(sanitize_axis(&shape, &Axis::Single(-3)).unwrap(), Some(vec![0]));
    }

    #[test]
    fn test_sanitize_axis_errors() {
        let shape = [2, 3, 4];
        assert_eq!(
            sanitize_axis(&shape, &Axis::Single(3)).unwrap_err(),
            Error::InvalidAxis { axis: 3, ndim: 3 }
        );
        assert!(sanitize_axis(&shape, &Axis::Single(-4)).unwrap_err().is_axis_error());
        assert_eq!(
            sanitize_axis(&shape, &Axis::Many(vec![0, 0])).unwrap_err(),
            Error::DuplicateAxis { axis: 0 }
        );
        assert_eq!(
            sanitize_axis(&shape, &Axis::Many(vec![2, -1])).unwrap_err(),
            Error::DuplicateAxis { axis: 2 }
        );
    }

    #[test]
    fn test_reduce_op_kinds() {
        assert!(ReduceOp::LAnd.is_boolean());
        assert!(ReduceOp::BOr.is_boolean());
        assert!(!ReduceOp::Sum.is_boolean());
        assert!(ReduceOp::BAnd.is_bitwise());
        assert!(!ReduceOp::LOr.is_bitwise());
    }
}
