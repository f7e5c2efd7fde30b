//! Column-at-a-time multiplication.
//!
//! `A * B` becomes `N` independent products `A * B[:, j]`. Each column of `B`
//! is copied into a stack array first, so views whose storage cannot be
//! indexed as a dense column (triangular, symmetric, ...) cost nothing extra
//! and no heap memory is touched.

use crate::array::Destination;
use crate::mul::unrolled;
use crate::policy::ScaleAccumulate;
use crate::scalar::Scalar;
use crate::structure::Operand;

/// `dest = policy(A * B)`, one unrolled matrix-vector product per column.
///
/// Dimensions must already be validated: `M == RA`, `CA == RB`, `N == CB`.
pub(crate) fn multiply<
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

    for j in 0..N {
        let column: [T; RB] = std::array::from_fn(|p| b.access(p, j));
        let products: [T; M] = unrolled::mat_vec(a, &column);
        for (i, product) in products.into_iter().enumerate() {
            let value = policy.update(product, || dest.get(i, j));
            dest.set(i, j, value);
        }
    }
}
