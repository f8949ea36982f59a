//! Type promotion rules for binary operations

use super::DType;

/// Promote two dtypes to a common dtype for binary operations
///
/// The dtypes form a total order (`Bool < U8 < I8 < I16 < I32 < I64 < F32 < F64`)
/// and the promoted type is the join, i.e. the later of the two:
/// - Floats always win over integers
/// - Wider types win over narrower types
/// - Any numeric type wins over bool
///
/// Being a join on a total order, promotion is commutative, associative and
/// idempotent.
pub fn promote(lhs: DType, rhs: DType) -> DType {
    if lhs.lattice_rank() >= rhs.lattice_rank() {
        lhs
    } else {
        rhs
    }
}

/// Promote a dtype to at least the default floating point precision
///
/// Local operations such as `sqrt` need floating point semantics even for
/// integer or boolean input.
pub fn promote_to_float(dtype: DType) -> DType {
    promote(dtype, DType::default_float())
}

#[cfg(test)]
mod tests {
    use super::*;
    use DType::*;

    #[test]
    fn test_same_type_promotion() {
        assert_eq!(promote(F32, F32), F32);
        assert_eq!(promote(I64, I64), I64);
        assert_eq!(promote(Bool, Bool), Bool);
    }

    #[test]
    fn test_float_promotion() {
        assert_eq!(promote(F32, F64), F64);
        assert_eq!(promote(F64, F32), F64);
    }

    #[test]
    fn test_int_float_promotion() {
        // Float always wins
        assert_eq!(promote(I64, F32), F32);
        assert_eq!(promote(I32, F64), F64);
        assert_eq!(promote(U8, F32), F32);
    }

    #[test]
    fn test_int_width_promotion() {
        assert_eq!(promote(I8, I32), I32);
        assert_eq!(promote(U8, I8), I8);
        assert_eq!(promote(I16, U8), I16);
    }

    #[test]
    fn test_bool_promotion() {
        assert_eq!(promote(Bool, U8), U8);
        assert_eq!(promote(F64, Bool), F64);
    }

    #[test]
    fn test_promotion_commutative_and_idempotent() {
        for &a in DType::ALL.iter() {
            assert_eq!(promote(a, a), a);
            for &b in DType::ALL.iter() {
                assert_eq!(promote(a, b), promote(b, a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_promotion_associative() {
        for &a in DType::ALL.iter() {
            for &b in DType::ALL.iter() {
                for &c in DType::ALL.iter() {
                    assert_eq!(promote(promote(a, b), c), promote(a, promote(b, c)));
                }
            }
        }
    }

    #[test]
    fn test_promote_to_float() {
        assert_eq!(promote_to_float(Bool), F32);
        assert_eq!(promote_to_float(I64), F32);
        assert_eq!(promote_to_float(F32), F32);
        assert_eq!(promote_to_float(F64), F64);
    }
}
