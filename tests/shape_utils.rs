//! Integration tests for broadcasting, axis normalisation and type promotion

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shardnum::dtype::{DType, Scalar};
use shardnum::error::Error;
use shardnum::ops::{Axis, broadcast_shape, promote_types, reduce_output_shape, sanitize_axis};
use shardnum::tensor::Shape;

// ============================================================================
// Type promotion
// ============================================================================

#[test]
fn test_promote_types_is_a_join() {
    for &a in &DType::ALL {
        assert_eq!(promote_types(a, a), a);
        for &b in &DType::ALL {
            let p = promote_types(a, b);
            assert_eq!(p, promote_types(b, a), "{a} {b}");
            assert!(p.lattice_rank() >= a.lattice_rank());
            assert!(p == a || p == b);
            for &c in &DType::ALL {
                assert_eq!(
                    promote_types(p, c),
                    promote_types(a, promote_types(b, c)),
                    "{a} {b} {c}"
                );
            }
        }
    }
}

#[test]
fn test_promote_types_examples() {
    assert_eq!(promote_types(DType::Bool, DType::U8), DType::U8);
    assert_eq!(promote_types(DType::U8, DType::I8), DType::I8);
    assert_eq!(promote_types(DType::I64, DType::F32), DType::F32);
    assert_eq!(promote_types(DType::F32, DType::F64), DType::F64);
}

#[test]
fn test_scalar_dtype_alongside_arrays() {
    assert_eq!(Scalar::Int(5).dtype_alongside(DType::U8), DType::U8);
    assert_eq!(Scalar::Float(0.5).dtype_alongside(DType::F64), DType::F64);
    assert_eq!(Scalar::Float(0.5).dtype_alongside(DType::I16), DType::F32);
    assert_eq!(Scalar::Bool(true).dtype_alongside(DType::I32), DType::I32);
    assert_eq!(Scalar::Int(1).dtype_alongside(DType::Bool), DType::I64);
}

// ============================================================================
// Broadcasting
// ============================================================================

#[test]
fn test_broadcast_shape_examples() {
    assert_eq!(broadcast_shape(&[1], &[1]).unwrap(), Shape::from([1]));
    assert_eq!(broadcast_shape(&[3, 1], &[1, 4]).unwrap(), Shape::from([3, 4]));
    assert_eq!(broadcast_shape(&[5, 1, 2], &[4, 1]).unwrap(), Shape::from([5, 4, 2]));
    assert_eq!(broadcast_shape(&[0, 3], &[1, 3]).unwrap(), Shape::from([0, 3]));
    assert!(matches!(
        broadcast_shape(&[2, 3], &[4, 5]),
        Err(Error::BroadcastError { .. })
    ));
}

#[test]
fn test_random_broadcasts() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let ndim = rng.random_range(0..=4);
        let out: Vec<usize> = (0..ndim).map(|_| rng.random_range(2..=6)).collect();
        let squeeze = |rng: &mut StdRng, dims: &[usize]| -> Vec<usize> {
            dims.iter()
                .map(|&d| if rng.random_bool(0.4) { 1 } else { d })
                .collect()
        };
        let a = squeeze(&mut rng, &out);
        let skip = rng.random_range(0..=ndim);
        let b = squeeze(&mut rng, &out[skip..]);

        let ab = broadcast_shape(&a, &b).unwrap();
        assert_eq!(ab, broadcast_shape(&b, &a).unwrap());
        // each axis takes the larger of the aligned extents
        for (axis, &extent) in ab.iter().enumerate() {
            let from_b = axis.checked_sub(skip).map(|i| b[i]).unwrap_or(1);
            assert_eq!(extent, a[axis].max(from_b));
        }

        // a mismatch on any axis is rejected
        if ndim > 0 {
            let mut bad = out.clone();
            bad[0] += 1;
            assert!(broadcast_shape(&out, &bad).is_err());
        }
    }
}

// ============================================================================
// Axis normalisation
// ============================================================================

#[test]
fn test_sanitize_axis_rank_three() {
    let shape = [2, 3, 4];
    assert_eq!(sanitize_axis(&shape, &Axis::Single(-1)).unwrap(), Some(vec![2]));
    assert_eq!(sanitize_axis(&shape, &Axis::All).unwrap(), None);
    assert_eq!(
        sanitize_axis(&shape, &Axis::Many(vec![-3, 1])).unwrap(),
        Some(vec![0, 1])
    );
    assert!(matches!(
        sanitize_axis(&shape, &Axis::Single(3)),
        Err(Error::InvalidAxis { axis: 3, ndim: 3 })
    ));
    assert!(matches!(
        sanitize_axis(&shape, &Axis::Single(-4)),
        Err(Error::InvalidAxis { .. })
    ));
    assert!(matches!(
        sanitize_axis(&shape, &Axis::Many(vec![0, 0])),
        Err(Error::DuplicateAxis { axis: 0 })
    ));
    assert!(sanitize_axis(&shape, &Axis::Many(vec![0, 0])).unwrap_err().is_axis_error());
}

#[test]
fn test_axis_conversions() {
    assert_eq!(Axis::from(-1isize), Axis::Single(-1));
    assert_eq!(Axis::from(2usize), Axis::Single(2));
    assert_eq!(Axis::from([0isize, 2]), Axis::Many(vec![0, 2]));
    assert_eq!(Axis::from(None::<isize>), Axis::All);
    assert_eq!(Axis::default(), Axis::All);
}

#[test]
fn test_reduce_output_shape() {
    assert_eq!(reduce_output_shape(&[2, 3, 4], &[0, 2], false), Shape::from([3]));
    assert_eq!(reduce_output_shape(&[2, 3, 4], &[0, 2], true), Shape::from([1, 3, 1]));
    assert_eq!(reduce_output_shape(&[5], &[0], false).ndim(), 0);
}
