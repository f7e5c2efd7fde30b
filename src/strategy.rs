//! Choosing how a multiply is carried out.
//!
//! Selection is a pure function of static shapes, structures and element
//! types, so for a given monomorphized call site it always yields the same
//! strategy and the optimizer folds it to a constant.

use crate::scalar::{ElementKind, Scalar};
use crate::structure::{Operand, Structure};

/// How a multiply is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One sum of products per output element.
    Unrolled,
    /// One matrix-vector product per output column.
    Chunked,
    /// The blocked dense kernel.
    Kernel,
}

/// What the selector needs to know about an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandInfo {
    pub rows: usize,
    pub cols: usize,
    pub structure: Structure,
    pub element: ElementKind,
    /// Whether the storage is a vector rather than a matrix.
    pub vector: bool,
}

impl OperandInfo {
    pub fn of<T: Scalar, const R: usize, const C: usize>(operand: &Operand<'_, T, R, C>) -> Self {
        Self {
            rows: R,
            cols: C,
            structure: operand.structure(),
            element: T::KIND,
            vector: operand.is_vector(),
        }
    }

    /// Dense rank-2 storage the kernel can read, possibly transposed.
    const fn is_kernel_operand(&self) -> bool {
        !self.vector && self.structure.is_dense() && self.element.is_kernel_eligible()
    }
}

/// Cost cut-offs between strategies, in scalar multiplications.
///
/// The defaults are empirical: past `chunk` the chunked path stops paying
/// off against the dense kernel. Calibrate them for the target machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Below this (times the structural penalty) everything is unrolled.
    pub unroll: usize,
    /// Below this the chunked multiplier is used.
    pub chunk: usize,
}

impl Thresholds {
    pub const DEFAULT: Thresholds = Thresholds {
        unroll: 4 * 4 * 4,
        chunk: 14 * 14 * 14,
    };
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scalar multiplications of `A * B`.
pub const fn cost(a: &OperandInfo, b: &OperandInfo) -> usize {
    a.rows * a.cols * b.cols
}

/// Multiplier on the unroll cut-off for triangular operands, which can never
/// reach the kernel: 2 per triangular operand, 8 when both are.
pub const fn penalty(a: &OperandInfo, b: &OperandInfo) -> usize {
    let a_tri = a.structure.is_triangular();
    let b_tri = b.structure.is_triangular();
    let mut penalty = 1;
    if a_tri {
        penalty *= 2;
    }
    if b_tri {
        penalty *= 2;
    }
    if a_tri && b_tri {
        penalty *= 2;
    }
    penalty
}

/// Picks a strategy with the default thresholds.
pub const fn select(a: &OperandInfo, b: &OperandInfo, dest: ElementKind) -> Strategy {
    select_with(&Thresholds::DEFAULT, a, b, dest)
}

pub const fn select_with(
    thresholds: &Thresholds,
    a: &OperandInfo,
    b: &OperandInfo,
    dest: ElementKind,
) -> Strategy {
    let cost = cost(a, b);
    let diagonal = matches!(a.structure, Structure::Diagonal)
        || matches!(b.structure, Structure::Diagonal);

    if cost < thresholds.unroll * penalty(a, b) || diagonal {
        Strategy::Unrolled
    } else if cost < thresholds.chunk {
        Strategy::Chunked
    } else if kernel_eligible(a, b, dest) {
        Strategy::Kernel
    } else {
        Strategy::Chunked
    }
}

/// Whether `A * B` into a `dest` element type may run on the dense kernel.
pub const fn kernel_eligible(a: &OperandInfo, b: &OperandInfo, dest: ElementKind) -> bool {
    let same_element = a.element as u8 == b.element as u8 && b.element as u8 == dest as u8;
    same_element && a.is_kernel_operand() && b.is_kernel_operand()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(rows: usize, cols: usize, structure: Structure, element: ElementKind) -> OperandInfo {
        OperandInfo {
            rows,
            cols,
            structure,
            element,
            vector: false,
        }
    }

    fn plain(rows: usize, cols: usize) -> OperandInfo {
        info(rows, cols, Structure::Plain, ElementKind::F64)
    }

    #[test]
    fn test_small_is_unrolled() {
        assert_eq!(select(&plain(3, 3), &plain(3, 3), ElementKind::F64), Strategy::Unrolled);
        assert_eq!(select(&plain(2, 3), &plain(3, 2), ElementKind::F64), Strategy::Unrolled);
    }

    #[test]
    fn test_medium_is_chunked() {
        // 4*4*4 == 64 is the first cost that is not unrolled.
        assert_eq!(select(&plain(4, 4), &plain(4, 4), ElementKind::F64), Strategy::Chunked);
        assert_eq!(select(&plain(10, 10), &plain(10, 10), ElementKind::F64), Strategy::Chunked);
    }

    #[test]
    fn test_large_dense_float_uses_kernel() {
        assert_eq!(select(&plain(14, 14), &plain(14, 14), ElementKind::F64), Strategy::Kernel);
        let at = info(20, 16, Structure::Transpose, ElementKind::F32);
        let b = info(16, 20, Structure::Adjoint, ElementKind::F32);
        assert_eq!(select(&at, &b, ElementKind::F32), Strategy::Kernel);
    }

    #[test]
    fn test_large_ineligible_falls_back_to_chunked() {
        let ints = info(16, 16, Structure::Plain, ElementKind::Integer);
        assert_eq!(select(&ints, &ints, ElementKind::Integer), Strategy::Chunked);

        let complex = info(16, 16, Structure::Plain, ElementKind::Complex64);
        assert_eq!(select(&complex, &complex, ElementKind::Complex64), Strategy::Chunked);

        let sym = info(16, 16, Structure::SymmetricUpper, ElementKind::F64);
        assert_eq!(select(&sym, &plain(16, 16), ElementKind::F64), Strategy::Chunked);

        let mut vector = plain(16, 1);
        vector.vector = true;
        let wide = plain(16, 16);
        assert_eq!(select(&wide, &vector, ElementKind::F64), Strategy::Chunked);
        let big = plain(64, 64);
        assert_eq!(select(&big, &vector, ElementKind::F64), Strategy::Chunked);

        let mixed = info(16, 16, Structure::Plain, ElementKind::F32);
        assert_eq!(select(&mixed, &plain(16, 16), ElementKind::F64), Strategy::Chunked);
    }

    #[test]
    fn test_triangular_penalty() {
        let tri = info(4, 4, Structure::UpperTriangular, ElementKind::F64);
        assert_eq!(penalty(&tri, &plain(4, 4)), 2);
        assert_eq!(penalty(&plain(4, 4), &tri), 2);
        assert_eq!(penalty(&tri, &tri), 8);
        assert_eq!(penalty(&plain(4, 4), &plain(4, 4)), 1);

        // 64 < 64 * 2
        assert_eq!(select(&tri, &plain(4, 4), ElementKind::F64), Strategy::Unrolled);
        let tri8 = info(8, 8, Structure::UnitLowerTriangular, ElementKind::F64);
        // 512 is not below 64 * 8
        assert_eq!(select(&tri8, &tri8, ElementKind::F64), Strategy::Chunked);
        let tri7 = info(7, 7, Structure::LowerTriangular, ElementKind::F64);
        // 343 < 64 * 8
        assert_eq!(select(&tri7, &tri7, ElementKind::F64), Strategy::Unrolled);
    }

    #[test]
    fn test_diagonal_is_always_unrolled() {
        let diag = info(32, 32, Structure::Diagonal, ElementKind::F64);
        assert_eq!(select(&diag, &plain(32, 32), ElementKind::F64), Strategy::Unrolled);
        assert_eq!(select(&plain(32, 32), &diag, ElementKind::F64), Strategy::Unrolled);
    }

    #[test]
    fn test_custom_thresholds() {
        let eager = Thresholds { unroll: 0, chunk: 0 };
        assert_eq!(
            select_with(&eager, &plain(4, 4), &plain(4, 4), ElementKind::F64),
            Strategy::Kernel
        );
        assert_eq!(Thresholds::default(), Thresholds::DEFAULT);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let a = plain(6, 7);
        let b = plain(7, 5);
        let first = select(&a, &b, ElementKind::F64);
        for _ in 0..10 {
            assert_eq!(select(&a, &b, ElementKind::F64), first);
        }
    }
}
