//! Fully unrolled multiplication.
//!
//! All loop bounds are const generics, so after monomorphization the
//! optimizer flattens each output element into a single sum of products.

use crate::array::Destination;
use crate::policy::ScaleAccumulate;
use crate::scalar::Scalar;
use crate::structure::{combine_products, Operand};

/// `dest = policy(A * B)`, one sum of products per output element.
///
/// Dimensions must already be validated: `M == RA`, `CA == RB`, `N == CB`.
#[inline(always)]
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
    // An empty product leaves `beta * dest`. An overwriting policy never
    // reads the destination, which may be uninitialized.
    if CA == 0 {
        for j in 0..N {
            for i in 0..M {
                let value = if P::OVERWRITES {
                    T::zero()
                } else {
                    policy.scale(dest.get(i, j))
                };
                dest.set(i, j, value);
            }
        }
        return;
    }

    // Column times row: no sum to build.
    if CA == 1 && a.is_vector() && b.is_vector() {
        for j in 0..N {
            let b_j = b.access(0, j);
            for i in 0..M {
                let product = a.access(i, 0) * b_j;
                let value = policy.update(product, || dest.get(i, j));
                dest.set(i, j, value);
            }
        }
        return;
    }

    for j in 0..N {
        for i in 0..M {
            let product = combine_products(
                a.access(i, 0) * b.access(0, j),
                (1..CA).map(|p| a.access(i, p) * b.access(p, j)),
            );
            let value = policy.update(product, || dest.get(i, j));
            dest.set(i, j, value);
        }
    }
}

/// `A * x` for a non-empty inner dimension, returned by value.
#[inline(always)]
pub(crate) fn mat_vec<T: Scalar, const M: usize, const RA: usize, const CA: usize>(
    a: &Operand<'_, T, RA, CA>,
    x: &[T],
) -> [T; M] {
    debug_assert!(CA > 0 && x.len() == CA);
    std::array::from_fn(|i| {
        combine_products(
            a.access(i, 0) * x[0],
            (1..CA).map(|p| a.access(i, p) * x[p]),
        )
    })
}
