//! Entry points: validate dimensions, pick a strategy, dispatch.
//!
//! Every entry point takes the destination by `&mut` and returns it on
//! success so calls can be chained. Shapes are checked before anything is
//! read or written, so a mismatch leaves the destination untouched.

mod bridge;
mod chunked;
mod unrolled;

use tracing::{debug, trace};

use crate::array::Destination;
use crate::error::{shape_mismatch, Result};
use crate::policy::{Assign, MulAdd, ScaleAccumulate};
use crate::scalar::Scalar;
use crate::shape::{Described, Descriptor};
use crate::strategy::{self, OperandInfo, Strategy};
use crate::structure::Operand;

/// Checks that `dest = A * B` is well formed.
///
/// `A`'s columns must match `B`'s rows, and `dest` must be `A.rows x B.cols`.
/// The operand-only mismatch is reported without a destination shape.
pub fn check_dims(dest: &Descriptor, a: &Descriptor, b: &Descriptor) -> Result<()> {
    let (a_rows, a_cols) = a.dims();
    let (b_rows, b_cols) = b.dims();
    if a_cols != b_rows {
        return Err(shape_mismatch(a.shape, b.shape, None));
    }
    if dest.dims() != (a_rows, b_cols) {
        return Err(shape_mismatch(a.shape, b.shape, Some(dest.shape)));
    }
    Ok(())
}

/// `dest = A * B`.
///
/// # Examples
///
/// ```
/// use statmul::{multiply_in_place, SMatrix, SVector};
///
/// let a = SMatrix::from_rows([[1, 2, 3], [4, 5, 6]]);
/// let x = SVector::new([1, 0, -1]);
/// let mut y = SVector::<i32, 2>::zeros();
/// multiply_in_place(&mut y, a.view(), x.view()).unwrap();
/// assert_eq!(y, SVector::new([-2, -2]));
/// ```
pub fn multiply_in_place<
    'd,
    T,
    D,
    const M: usize,
    const N: usize,
    const RA: usize,
    const CA: usize,
    const RB: usize,
    const CB: usize,
>(
    dest: &'d mut D,
    a: Operand<'_, T, RA, CA>,
    b: Operand<'_, T, RB, CB>,
) -> Result<&'d mut D>
where
    T: Scalar,
    D: Destination<T, M, N>,
{
    multiply_with_policy(dest, a, b, Assign)
}

/// `dest = alpha * (A * B) + beta * dest`.
///
/// With `beta == 0` the old contents of `dest` are never read.
pub fn multiply_add_in_place<
    'd,
    T,
    D,
    const M: usize,
    const N: usize,
    const RA: usize,
    const CA: usize,
    const RB: usize,
    const CB: usize,
>(
    dest: &'d mut D,
    a: Operand<'_, T, RA, CA>,
    b: Operand<'_, T, RB, CB>,
    alpha: T,
    beta: T,
) -> Result<&'d mut D>
where
    T: Scalar,
    D: Destination<T, M, N>,
{
    multiply_with_policy(dest, a, b, MulAdd::new(alpha, beta))
}

/// `dest = policy(A * B)` with the strategy picked by [`strategy::select`].
pub fn multiply_with_policy<
    'd,
    T,
    D,
    P,
    const M: usize,
    const N: usize,
    const RA: usize,
    const CA: usize,
    const RB: usize,
    const CB: usize,
>(
    dest: &'d mut D,
    a: Operand<'_, T, RA, CA>,
    b: Operand<'_, T, RB, CB>,
    policy: P,
) -> Result<&'d mut D>
where
    T: Scalar,
    D: Destination<T, M, N>,
    P: ScaleAccumulate<T>,
{
    let strategy = strategy::select(&OperandInfo::of(&a), &OperandInfo::of(&b), T::KIND);
    multiply_using(strategy, dest, a, b, policy)
}

/// `dest = policy(A * B)` with a caller-chosen strategy.
///
/// Forcing [`Strategy::Kernel`] on operands the kernel cannot read runs the
/// chunked multiplier instead.
pub fn multiply_using<
    'd,
    T,
    D,
    P,
    const M: usize,
    const N: usize,
    const RA: usize,
    const CA: usize,
    const RB: usize,
    const CB: usize,
>(
    strategy: Strategy,
    dest: &'d mut D,
    a: Operand<'_, T, RA, CA>,
    b: Operand<'_, T, RB, CB>,
    policy: P,
) -> Result<&'d mut D>
where
    T: Scalar,
    D: Destination<T, M, N>,
    P: ScaleAccumulate<T>,
{
    check_dims(&dest.descriptor(), &a.descriptor(), &b.descriptor())?;

    let a_info = OperandInfo::of(&a);
    let b_info = OperandInfo::of(&b);
    let strategy = match strategy {
        Strategy::Kernel if !strategy::kernel_eligible(&a_info, &b_info, T::KIND) => {
            debug!(
                a = ?a.structure(),
                b = ?b.structure(),
                element = ?T::KIND,
                "kernel not applicable, using chunked multiplier"
            );
            Strategy::Chunked
        }
        strategy => strategy,
    };

    trace!(?strategy, m = M, n = N, k = CA, "multiply");
    run(strategy, dest, &a, &b, policy);
    Ok(dest)
}

fn run<
    T,
    D,
    P,
    const M: usize,
    const N: usize,
    const RA: usize,
    const CA: usize,
    const RB: usize,
    const CB: usize,
>(
    strategy: Strategy,
    dest: &mut D,
    a: &Operand<'_, T, RA, CA>,
    b: &Operand<'_, T, RB, CB>,
    policy: P,
) where
    T: Scalar,
    D: Destination<T, M, N>,
    P: ScaleAccumulate<T>,
{
    if CA == 0 {
        unrolled::multiply(dest, a, b, policy);
        return;
    }

    match strategy {
        Strategy::Unrolled => unrolled::multiply(dest, a, b, policy),
        Strategy::Chunked => chunked::multiply(dest, a, b, policy),
        Strategy::Kernel => {
            debug!(m = M, n = N, k = CA, "dense kernel");
            if !bridge::multiply(dest, a, b, policy) {
                debug!(element = ?T::KIND, "no kernel for element type, using chunked multiplier");
                chunked::multiply(dest, a, b, policy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{SMatrix, SVector};
    use crate::error::MulError;
    use crate::shape::{Layout, Shape};
    use crate::structure::Structure;

    #[test]
    fn test_check_dims() {
        let plain = |r, c| Descriptor::new(Shape::Matrix(r, c), Layout::Plain);
        assert!(check_dims(&plain(2, 4), &plain(2, 3), &plain(3, 4)).is_ok());

        let err = check_dims(&plain(2, 2), &plain(2, 3), &plain(4, 2)).unwrap_err();
        assert_eq!(
            err,
            MulError::ShapeMismatch {
                a: Shape::Matrix(2, 3),
                b: Shape::Matrix(4, 2),
                dest: None,
            }
        );

        let err = check_dims(&plain(3, 4), &plain(2, 3), &plain(3, 4)).unwrap_err();
        assert_eq!(
            err,
            MulError::ShapeMismatch {
                a: Shape::Matrix(2, 3),
                b: Shape::Matrix(3, 4),
                dest: Some(Shape::Matrix(3, 4)),
            }
        );
    }

    #[test]
    fn test_check_dims_row_vector() {
        let column = Descriptor::new(Shape::Vector(3), Layout::Plain);
        let row = column.transpose();
        let scalar = Descriptor::new(Shape::Matrix(1, 1), Layout::Plain);
        let outer = Descriptor::new(Shape::Matrix(3, 3), Layout::Plain);
        assert!(check_dims(&scalar, &row, &column).is_ok());
        assert!(check_dims(&outer, &column, &row).is_ok());
        assert!(check_dims(&outer, &column, &column).is_err());
    }

    #[test]
    fn test_mismatch_leaves_destination_untouched() {
        let a = SMatrix::<f64, 2, 3>::from_fn(|i, j| (i + j) as f64);
        let b = SMatrix::<f64, 4, 2>::from_fn(|i, j| (i * j) as f64);
        let mut c = SMatrix::<f64, 2, 2>::from_rows([[7.0, 7.0], [7.0, 7.0]]);
        let result = multiply_in_place(&mut c, a.view(), b.view());
        assert!(matches!(result, Err(MulError::ShapeMismatch { dest: None, .. })));
        assert_eq!(c, SMatrix::from_rows([[7.0, 7.0], [7.0, 7.0]]));
    }

    #[test]
    fn test_wrong_destination_shape() {
        let a = SMatrix::<i32, 2, 3>::zeros();
        let b = SMatrix::<i32, 3, 2>::zeros();
        let mut c = SMatrix::<i32, 3, 3>::from_fn(|_, _| 1);
        let err = multiply_in_place(&mut c, a.view(), b.view()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Shape mismatch: cannot multiply 2x3 by 3x2 into 3x3"
        );
        assert_eq!(c, SMatrix::from_fn(|_, _| 1));
    }

    #[test]
    fn test_forced_strategies_agree() {
        let a = SMatrix::<f64, 4, 4>::from_fn(|i, j| (i as f64) - 2.0 * (j as f64));
        let b = SMatrix::<f64, 4, 4>::from_fn(|i, j| 1.0 / (1.0 + (i + j) as f64));
        let mut results = Vec::new();
        for strategy in [Strategy::Unrolled, Strategy::Chunked, Strategy::Kernel] {
            let mut c = SMatrix::<f64, 4, 4>::zeros();
            multiply_using(strategy, &mut c, a.view(), b.view(), Assign).unwrap();
            results.push(c);
        }
        for c in &results[1..] {
            for i in 0..4 {
                for j in 0..4 {
                    assert!((c[(i, j)] - results[0][(i, j)]).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_forced_kernel_on_structured_operand() {
        let a = SMatrix::<f64, 3, 3>::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let mut c = SMatrix::<f64, 3, 3>::zeros();
        multiply_using(
            Strategy::Kernel,
            &mut c,
            SMatrix::<f64, 3, 3>::identity().view(),
            a.structured(Structure::UpperTriangular),
            Assign,
        )
        .unwrap();
        assert_eq!(
            c,
            SMatrix::from_rows([[1.0, 2.0, 3.0], [0.0, 5.0, 6.0], [0.0, 0.0, 9.0]])
        );
    }

    #[test]
    fn test_forced_kernel_on_integers() {
        let a = SMatrix::<i64, 2, 2>::from_rows([[1, 2], [3, 4]]);
        let mut c = SMatrix::<i64, 2, 2>::zeros();
        multiply_using(Strategy::Kernel, &mut c, a.view(), a.view(), Assign).unwrap();
        assert_eq!(c, SMatrix::from_rows([[7, 10], [15, 22]]));
    }

    #[test]
    fn test_returns_destination_for_chaining() {
        let a = SMatrix::<i32, 2, 2>::identity();
        let x = SVector::new([3, 4]);
        let mut y = SVector::<i32, 2>::zeros();
        let y = multiply_add_in_place(&mut y, a.view(), x.view(), 2, 0).unwrap();
        y[0] += 1;
        assert_eq!(*y, SVector::new([7, 8]));
    }
}
