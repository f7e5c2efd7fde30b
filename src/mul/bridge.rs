//! Hand-off to the blocked dense kernel.
//!
//! Operands and destination are re-described as column-major slices with a
//! leading dimension and a transpose flag. A destination whose storage holds
//! the transpose of the result is served by computing `B^T * A^T` into it.

use tracing::debug;

use crate::array::Destination;
use crate::matmul::Transpose;
use crate::policy::ScaleAccumulate;
use crate::scalar::Scalar;
use crate::shape::Described;
use crate::structure::Operand;

/// Column-major storage as the kernel reads it.
#[derive(Clone, Copy)]
struct DenseRef<'a, T> {
    data: &'a [T],
    ld: usize,
    trans: Transpose,
}

impl<'a, T: Scalar> DenseRef<'a, T> {
    fn of<const R: usize, const C: usize>(operand: &Operand<'a, T, R, C>) -> Self {
        let trans = if operand.descriptor().is_transposed() {
            Transpose::Ordinary
        } else {
            Transpose::None
        };
        Self {
            data: operand.storage(),
            ld: operand.ld(),
            trans,
        }
    }

    fn transpose(self) -> Self {
        let trans = self.trans.forward(Transpose::Ordinary, Transpose::None);
        Self { trans, ..self }
    }
}

/// `dest = policy(A * B)` on the dense kernel.
///
/// Returns `false` without touching `dest` when the element type has no
/// kernel. Operands must be dense (plain, transposed or adjoint of a real
/// type) and dimensions already validated.
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
) -> bool
where
    T: Scalar,
    D: Destination<T, M, N>,
    P: ScaleAccumulate<T>,
{
    debug_assert!(a.structure().is_dense() && b.structure().is_dense());

    let a = DenseRef::of(a);
    let b = DenseRef::of(b);
    let transposed = dest.descriptor().is_transposed();
    let (m, n, a, b) = if transposed {
        debug!(m = N, n = M, k = CA, "kernel writing through a transposed destination");
        (N, M, b.transpose(), a.transpose())
    } else {
        (M, N, a, b)
    };

    let (c, ldc) = dest.storage_mut();
    T::dense_gemm(
        a.trans,
        b.trans,
        m,
        n,
        CA,
        policy.alpha(),
        a.data,
        a.ld,
        b.data,
        b.ld,
        policy.kernel_beta(),
        c,
        ldc,
    )
}
