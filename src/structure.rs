//! Structural views over stored arrays.
//!
//! An [`Operand`] pairs borrowed column-major storage with a [`Structure`]
//! tag. Every multiplier reads operands only through [`Operand::access`], so
//! supporting a new view means extending that one match.

use std::cmp::Ordering;

use crate::array::{SMatrix, SVector};
use crate::matmul::at;
use crate::scalar::Scalar;
use crate::shape::{Described, Descriptor, Layout, Shape};

/// How element `(i, j)` of an operand is derived from its storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    Plain,
    Transpose,
    /// Conjugate transpose.
    Adjoint,
    /// Symmetric, only the upper triangle is read.
    SymmetricUpper,
    SymmetricLower,
    /// Hermitian, only the upper triangle is read. Mirrored entries are
    /// conjugated and the diagonal is taken as real.
    HermitianUpper,
    HermitianLower,
    UpperTriangular,
    LowerTriangular,
    /// Upper triangular with an implicit unit diagonal.
    UnitUpperTriangular,
    UnitLowerTriangular,
    /// Only the diagonal is read; off-diagonal entries are zero.
    Diagonal,
}

impl Structure {
    pub const ALL: [Structure; 12] = [
        Structure::Plain,
        Structure::Transpose,
        Structure::Adjoint,
        Structure::SymmetricUpper,
        Structure::SymmetricLower,
        Structure::HermitianUpper,
        Structure::HermitianLower,
        Structure::UpperTriangular,
        Structure::LowerTriangular,
        Structure::UnitUpperTriangular,
        Structure::UnitLowerTriangular,
        Structure::Diagonal,
    ];

    /// Whether the view swaps rows and columns of the storage.
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Structure::Transpose | Structure::Adjoint)
    }

    /// The triangular family, which the dense kernel cannot consume.
    pub const fn is_triangular(self) -> bool {
        matches!(
            self,
            Structure::UpperTriangular
                | Structure::LowerTriangular
                | Structure::UnitUpperTriangular
                | Structure::UnitLowerTriangular
        )
    }

    /// Plain storage or a (conjugate) transpose of it.
    pub const fn is_dense(self) -> bool {
        matches!(
            self,
            Structure::Plain | Structure::Transpose | Structure::Adjoint
        )
    }

    pub const fn layout(self) -> Layout {
        match self {
            Structure::Plain => Layout::Plain,
            Structure::Transpose | Structure::Adjoint => Layout::Transposed,
            _ => Layout::Unspecified,
        }
    }
}

/// A borrowed, structured, logically `R x C` operand.
#[derive(Debug, Clone, Copy)]
pub struct Operand<'a, T, const R: usize, const C: usize> {
    data: &'a [T],
    storage: Shape,
    structure: Structure,
}

impl<'a, T: Scalar, const R: usize, const C: usize> Operand<'a, T, R, C> {
    fn new(data: &'a [T], storage: Shape, structure: Structure) -> Self {
        debug_assert_eq!(data.len(), storage.product());
        Self {
            data,
            storage,
            structure,
        }
    }

    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// The borrowed column-major storage.
    pub fn storage(&self) -> &'a [T] {
        self.data
    }

    pub fn storage_shape(&self) -> Shape {
        self.storage
    }

    /// Leading dimension of the storage.
    pub fn ld(&self) -> usize {
        self.storage.rows()
    }

    /// Whether the storage is a vector (read as a column or a row).
    pub fn is_vector(&self) -> bool {
        self.storage.rank() == 1
    }

    /// Element `(i, j)` of the logical operand.
    #[inline(always)]
    pub fn access(&self, i: usize, j: usize) -> T {
        let ld = self.ld();
        let stored = |r: usize, c: usize| self.data[at(r, c, ld)];
        match self.structure {
            Structure::Plain => stored(i, j),
            Structure::Transpose => stored(j, i),
            Structure::Adjoint => stored(j, i).conj(),
            Structure::SymmetricUpper => {
                if i <= j {
                    stored(i, j)
                } else {
                    stored(j, i)
                }
            }
            Structure::SymmetricLower => {
                if i >= j {
                    stored(i, j)
                } else {
                    stored(j, i)
                }
            }
            Structure::HermitianUpper => match i.cmp(&j) {
                Ordering::Less => stored(i, j),
                Ordering::Equal => stored(i, i).real_part(),
                Ordering::Greater => stored(j, i).conj(),
            },
            Structure::HermitianLower => match i.cmp(&j) {
                Ordering::Greater => stored(i, j),
                Ordering::Equal => stored(i, i).real_part(),
                Ordering::Less => stored(j, i).conj(),
            },
            Structure::UpperTriangular => {
                if i <= j {
                    stored(i, j)
                } else {
                    T::zero()
                }
            }
            Structure::LowerTriangular => {
                if i >= j {
                    stored(i, j)
                } else {
                    T::zero()
                }
            }
            Structure::UnitUpperTriangular => match i.cmp(&j) {
                Ordering::Less => stored(i, j),
                Ordering::Equal => T::one(),
                Ordering::Greater => T::zero(),
            },
            Structure::UnitLowerTriangular => match i.cmp(&j) {
                Ordering::Greater => stored(i, j),
                Ordering::Equal => T::one(),
                Ordering::Less => T::zero(),
            },
            Structure::Diagonal => {
                if i != j {
                    T::zero()
                } else if self.is_vector() {
                    self.data[i]
                } else {
                    stored(i, i)
                }
            }
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Described for Operand<'_, T, R, C> {
    fn descriptor(&self) -> Descriptor {
        let shape = match self.structure {
            Structure::Diagonal => Shape::Matrix(R, C),
            s if s.swaps_axes() => self.storage.reversed(),
            _ => self.storage,
        };
        Descriptor::new(shape, self.structure.layout())
    }
}

/// Sums products left to right.
///
/// The first term is taken by value so an empty sum cannot be expressed;
/// callers handle an empty inner dimension before getting here.
#[inline(always)]
pub fn combine_products<T: Scalar, I: IntoIterator<Item = T>>(first: T, rest: I) -> T {
    rest.into_iter().fold(first, |acc, term| acc + term)
}

impl<T: Scalar, const R: usize, const C: usize> SMatrix<T, R, C> {
    pub fn view(&self) -> Operand<'_, T, R, C> {
        Operand::new(self.as_slice(), Self::shape(), Structure::Plain)
    }

    /// Transpose without copying.
    pub fn t(&self) -> Operand<'_, T, C, R> {
        Operand::new(self.as_slice(), Self::shape(), Structure::Transpose)
    }

    /// Conjugate transpose without copying.
    pub fn adjoint(&self) -> Operand<'_, T, C, R> {
        Operand::new(self.as_slice(), Self::shape(), Structure::Adjoint)
    }
}

impl<T: Scalar, const N: usize> SMatrix<T, N, N> {
    /// A square view with any structure; `Diagonal` reads the main diagonal.
    pub fn structured(&self, structure: Structure) -> Operand<'_, T, N, N> {
        Operand::new(self.as_slice(), Self::shape(), structure)
    }

    pub fn symmetric_upper(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::SymmetricUpper)
    }

    pub fn symmetric_lower(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::SymmetricLower)
    }

    pub fn hermitian_upper(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::HermitianUpper)
    }

    pub fn hermitian_lower(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::HermitianLower)
    }

    pub fn upper_triangular(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::UpperTriangular)
    }

    pub fn lower_triangular(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::LowerTriangular)
    }

    pub fn unit_upper_triangular(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::UnitUpperTriangular)
    }

    pub fn unit_lower_triangular(&self) -> Operand<'_, T, N, N> {
        self.structured(Structure::UnitLowerTriangular)
    }
}

impl<T: Scalar, const N: usize> SVector<T, N> {
    pub fn view(&self) -> Operand<'_, T, N, 1> {
        Operand::new(self.as_slice(), Self::shape(), Structure::Plain)
    }

    /// The vector read as a `1 x N` row.
    pub fn t(&self) -> Operand<'_, T, 1, N> {
        Operand::new(self.as_slice(), Self::shape(), Structure::Transpose)
    }

    /// The conjugated vector read as a `1 x N` row.
    pub fn adjoint(&self) -> Operand<'_, T, 1, N> {
        Operand::new(self.as_slice(), Self::shape(), Structure::Adjoint)
    }

    /// An `N x N` diagonal matrix with `self` on the diagonal.
    pub fn diagonal(&self) -> Operand<'_, T, N, N> {
        Operand::new(self.as_slice(), Self::shape(), Structure::Diagonal)
    }
}

impl<'a, T: Scalar, const R: usize, const C: usize> From<&'a SMatrix<T, R, C>>
    for Operand<'a, T, R, C>
{
    fn from(matrix: &'a SMatrix<T, R, C>) -> Self {
        matrix.view()
    }
}

impl<'a, T: Scalar, const N: usize> From<&'a SVector<T, N>> for Operand<'a, T, N, 1> {
    fn from(vector: &'a SVector<T, N>) -> Self {
        vector.view()
    }
}
