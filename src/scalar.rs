//! Element types accepted by the static multipliers.

use std::fmt::Debug;

use ndarray::LinalgScalar;
use num::complex::{Complex32, Complex64};

use crate::matmul::{self, Transpose};

/// Runtime tag for an element type, consumed by the strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    F32,
    F64,
    Complex32,
    Complex64,
    Integer,
}

impl ElementKind {
    /// Whether the dense kernel accepts this element type.
    pub const fn is_kernel_eligible(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, ElementKind::Complex32 | ElementKind::Complex64)
    }
}

/// An element of a fixed-size array.
///
/// `conj` and `real_part` are identities for real types. `dense_gemm` is the
/// hook into the optimized kernel: types the kernel accepts forward to
/// [`matmul::gemm`] and return `true`, every other type keeps the default and
/// returns `false`.
pub trait Scalar: LinalgScalar + PartialEq + Debug + Send + Sync {
    const KIND: ElementKind;

    #[inline(always)]
    fn conj(self) -> Self {
        self
    }

    /// Projection onto the real axis.
    #[inline(always)]
    fn real_part(self) -> Self {
        self
    }

    #[allow(clippy::too_many_arguments, unused_variables)]
    fn dense_gemm(
        transa: Transpose,
        transb: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: Self,
        a: &[Self],
        lda: usize,
        b: &[Self],
        ldb: usize,
        beta: Option<Self>,
        c: &mut [Self],
        ldc: usize,
    ) -> bool {
        false
    }
}

macro_rules! impl_kernel_float {
    ($t:ty, $kind:expr) => {
        impl Scalar for $t {
            const KIND: ElementKind = $kind;

            fn dense_gemm(
                transa: Transpose,
                transb: Transpose,
                m: usize,
                n: usize,
                k: usize,
                alpha: Self,
                a: &[Self],
                lda: usize,
                b: &[Self],
                ldb: usize,
                beta: Option<Self>,
                c: &mut [Self],
                ldc: usize,
            ) -> bool {
                matmul::gemm(
                    transa, transb, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc,
                );
                true
            }
        }
    };
}

impl_kernel_float!(f32, ElementKind::F32);
impl_kernel_float!(f64, ElementKind::F64);

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const KIND: ElementKind = ElementKind::Integer;
            }
        )*
    };
}

impl_integer!(i32, i64);

macro_rules! impl_complex {
    ($t:ty, $kind:expr) => {
        impl Scalar for $t {
            const KIND: ElementKind = $kind;

            #[inline(always)]
            fn conj(self) -> Self {
                <$t>::conj(&self)
            }

            #[inline(always)]
            fn real_part(self) -> Self {
                <$t>::new(self.re, 0.0)
            }
        }
    };
}

impl_complex!(Complex32, ElementKind::Complex32);
impl_complex!(Complex64, ElementKind::Complex64);
