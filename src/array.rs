//! Fixed-size matrices and vectors, and the destinations a multiply writes to.
//!
//! Storage is column-major: `SMatrix<T, R, C>` holds `C` columns of `R`
//! entries each, so the flattened data is directly usable by the dense
//! kernel with a leading dimension of `R`.

use std::ops::{Index, IndexMut};

use ndarray::{Array1, Array2};
use rand::{
    distr::{Distribution, StandardUniform},
    Rng,
};

use crate::scalar::Scalar;
use crate::shape::{Described, Descriptor, Layout, Shape};

/// An `R x C` matrix stored column by column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SMatrix<T, const R: usize, const C: usize> {
    data: [[T; R]; C],
}

/// A column vector with `N` entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SVector<T, const N: usize> {
    data: [T; N],
}

impl<T: Scalar, const R: usize, const C: usize> SMatrix<T, R, C> {
    pub fn zeros() -> Self {
        Self {
            data: [[T::zero(); R]; C],
        }
    }

    /// Builds a matrix from its columns.
    pub fn from_cols(cols: [[T; R]; C]) -> Self {
        Self { data: cols }
    }

    /// Builds a matrix from its rows, the way it is usually written down.
    pub fn from_rows(rows: [[T; C]; R]) -> Self {
        Self::from_fn(|i, j| rows[i][j])
    }

    pub fn from_fn<F: FnMut(usize, usize) -> T>(mut f: F) -> Self {
        let mut data = [[T::zero(); R]; C];
        for (j, column) in data.iter_mut().enumerate() {
            for (i, value) in column.iter_mut().enumerate() {
                *value = f(i, j);
            }
        }
        Self { data }
    }

    /// Fills every entry with a sample of the standard distribution for `T`.
    pub fn random<G: Rng + ?Sized>(rng: &mut G) -> Self
    where
        StandardUniform: Distribution<T>,
    {
        Self::from_fn(|_, _| rng.random())
    }

    pub const fn shape() -> Shape {
        Shape::Matrix(R, C)
    }

    /// Column-major view of the entries.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_flattened()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_flattened_mut()
    }

    /// A destination that writes `self` as its transpose.
    pub fn transposed_mut(&mut self) -> TransposedMut<'_, T, R, C> {
        TransposedMut { inner: self }
    }

    pub fn to_array2(&self) -> Array2<T> {
        Array2::from_shape_fn((R, C), |(i, j)| self.data[j][i])
    }
}

impl<T: Scalar, const N: usize> SMatrix<T, N, N> {
    pub fn identity() -> Self {
        Self::from_fn(|i, j| if i == j { T::one() } else { T::zero() })
    }
}

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for SMatrix<T, R, C> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[j][i]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for SMatrix<T, R, C> {
    #[inline(always)]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[j][i]
    }
}

impl<T: Scalar, const N: usize> SVector<T, N> {
    pub fn new(data: [T; N]) -> Self {
        Self { data }
    }

    pub fn zeros() -> Self {
        Self {
            data: [T::zero(); N],
        }
    }

    pub fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        Self {
            data: std::array::from_fn(f),
        }
    }

    pub fn random<G: Rng + ?Sized>(rng: &mut G) -> Self
    where
        StandardUniform: Distribution<T>,
    {
        Self::from_fn(|_| rng.random())
    }

    pub const fn shape() -> Shape {
        Shape::Vector(N)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn to_array1(&self) -> Array1<T> {
        Array1::from_iter(self.data.iter().copied())
    }
}

impl<T, const N: usize> Index<usize> for SVector<T, N> {
    type Output = T;

    #[inline(always)]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for SVector<T, N> {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

/// A mutable `R x C` matrix written as its `C x R` transpose.
#[derive(Debug)]
pub struct TransposedMut<'a, T, const R: usize, const C: usize> {
    inner: &'a mut SMatrix<T, R, C>,
}

/// Something a multiply can write an `M x N` result into.
///
/// `get`/`set` address the logical result; `storage_mut` exposes the
/// column-major backing storage and its leading dimension for the dense
/// kernel, which consults [`Described::descriptor`] to learn whether that
/// storage holds the result or its transpose.
pub trait Destination<T: Scalar, const M: usize, const N: usize>: Described {
    fn get(&self, i: usize, j: usize) -> T;

    fn set(&mut self, i: usize, j: usize, value: T);

    fn storage_mut(&mut self) -> (&mut [T], usize);
}

impl<T: Scalar, const R: usize, const C: usize> Described for SMatrix<T, R, C> {
    fn descriptor(&self) -> Descriptor {
        Descriptor::new(Shape::Matrix(R, C), Layout::Plain)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Destination<T, R, C> for SMatrix<T, R, C> {
    #[inline(always)]
    fn get(&self, i: usize, j: usize) -> T {
        self.data[j][i]
    }

    #[inline(always)]
    fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[j][i] = value;
    }

    fn storage_mut(&mut self) -> (&mut [T], usize) {
        (self.data.as_flattened_mut(), R)
    }
}

impl<T: Scalar, const N: usize> Described for SVector<T, N> {
    fn descriptor(&self) -> Descriptor {
        Descriptor::new(Shape::Vector(N), Layout::Plain)
    }
}

impl<T: Scalar, const N: usize> Destination<T, N, 1> for SVector<T, N> {
    #[inline(always)]
    fn get(&self, i: usize, _j: usize) -> T {
        self.data[i]
    }

    #[inline(always)]
    fn set(&mut self, i: usize, _j: usize, value: T) {
        self.data[i] = value;
    }

    fn storage_mut(&mut self) -> (&mut [T], usize) {
        (&mut self.data, N)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Described for TransposedMut<'_, T, R, C> {
    fn descriptor(&self) -> Descriptor {
        Descriptor::new(Shape::Matrix(R, C), Layout::Plain).transpose()
    }
}

impl<T: Scalar, const R: usize, const C: usize> Destination<T, C, R> for TransposedMut<'_, T, R, C> {
    #[inline(always)]
    fn get(&self, i: usize, j: usize) -> T {
        self.inner.data[i][j]
    }

    #[inline(always)]
    fn set(&mut self, i: usize, j: usize, value: T) {
        self.inner.data[i][j] = value;
    }

    fn storage_mut(&mut self) -> (&mut [T], usize) {
        (self.inner.data.as_flattened_mut(), R)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_from_rows_is_column_major() {
        let m = SMatrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(m.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(SMatrix::<f64, 2, 3>::shape(), Shape::Matrix(2, 3));
    }

    #[test]
    fn test_identity() {
        let id = SMatrix::<i32, 3, 3>::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(id[(i, j)], i32::from(i == j));
            }
        }
    }

    #[test]
    fn test_transposed_destination() {
        let mut m = SMatrix::<i64, 2, 3>::zeros();
        {
            let mut t = m.transposed_mut();
            assert_eq!(t.descriptor().shape, Shape::Matrix(3, 2));
            assert!(t.descriptor().is_transposed());
            t.set(2, 1, 7);
            assert_eq!(t.get(2, 1), 7);
            let (storage, ld) = t.storage_mut();
            assert_eq!(storage.len(), 6);
            assert_eq!(ld, 2);
        }
        assert_eq!(m[(1, 2)], 7);
    }

    #[test]
    fn test_vector_destination() {
        let mut v = SVector::<f32, 3>::zeros();
        v.set(1, 0, 2.5);
        assert_eq!(v[1], 2.5);
        assert_eq!(Destination::<f32, 3, 1>::get(&v, 1, 0), 2.5);
        assert_eq!(v.descriptor(), Descriptor::new(Shape::Vector(3), Layout::Plain));
    }

    #[test]
    fn test_to_ndarray() {
        let m = SMatrix::from_rows([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let a = m.to_array2();
        assert_eq!(a.dim(), (3, 2));
        assert_eq!(a[[2, 1]], 6.0);

        let v = SVector::new([1, 2, 3]);
        assert_eq!(v.to_array1().to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_random_is_reproducible() {
        let mut rng1 = StdRng::seed_from_u64(12345);
        let mut rng2 = StdRng::seed_from_u64(12345);
        let a = SMatrix::<f64, 3, 4>::random(&mut rng1);
        let b = SMatrix::<f64, 3, 4>::random(&mut rng2);
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|x| (0.0..1.0).contains(x)));
    }
}
