//! Multiplication of runtime-shaped `ndarray` matrices.
//!
//! Fixed-size arrays go through [`crate::mul`]. Anything whose shape is only
//! known at runtime is handed to `ndarray`'s general matrix multiply, after
//! the same shape validation the fixed-size path performs.

use ndarray::{linalg::general_mat_mul, Array2, ArrayView2, ArrayViewMut2, LinalgScalar};

use crate::error::{shape_mismatch, Result};
use crate::shape::Shape;

fn shape_of<T>(view: &ArrayView2<'_, T>) -> Shape {
    let (rows, cols) = view.dim();
    Shape::Matrix(rows, cols)
}

/// `c = alpha * (a * b) + beta * c`.
///
/// Returns a shape mismatch without touching `c` when the operands or the
/// destination do not line up.
pub fn multiply_add<T: LinalgScalar>(
    mut c: ArrayViewMut2<'_, T>,
    a: ArrayView2<'_, T>,
    b: ArrayView2<'_, T>,
    alpha: T,
    beta: T,
) -> Result<()> {
    let (a_rows, a_cols) = a.dim();
    let (b_rows, b_cols) = b.dim();
    if a_cols != b_rows {
        return Err(shape_mismatch(shape_of(&a), shape_of(&b), None));
    }
    let (c_rows, c_cols) = c.dim();
    if (c_rows, c_cols) != (a_rows, b_cols) {
        return Err(shape_mismatch(
            shape_of(&a),
            shape_of(&b),
            Some(Shape::Matrix(c_rows, c_cols)),
        ));
    }

    general_mat_mul(alpha, &a, &b, beta, &mut c);
    Ok(())
}

/// `a * b` into a freshly allocated array.
pub fn multiply<T: LinalgScalar>(a: ArrayView2<'_, T>, b: ArrayView2<'_, T>) -> Result<Array2<T>> {
    let mut c = Array2::zeros((a.nrows(), b.ncols()));
    multiply_add(c.view_mut(), a, b, T::one(), T::zero())?;
    Ok(c)
}
