//! Allocation-free multiplication of fixed-size matrices and vectors.
//!
//! Dimensions are const generic parameters, so every multiply is
//! monomorphized for its operand shapes. A multiply picks one of three
//! strategies from those shapes (see [`strategy::select`]):
//!
//! * fully unrolled sums of products for small sizes,
//! * chunked matrix-vector products, one output column at a time,
//! * the blocked dense kernel in [`matmul`] for large `f32`/`f64` operands.
//!
//! Transposes, adjoints, triangular, symmetric, hermitian and diagonal views
//! are read through [`structure::Operand`] without copying.
//!
//! ```
//! use statmul::{multiply_in_place, SMatrix};
//!
//! let a = SMatrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
//! let b = SMatrix::from_rows([[5.0, 6.0], [7.0, 8.0]]);
//! let mut c = SMatrix::<f64, 2, 2>::zeros();
//! multiply_in_place(&mut c, a.view(), b.view()).unwrap();
//! assert_eq!(c, SMatrix::from_rows([[19.0, 22.0], [43.0, 50.0]]));
//! ```

pub mod array;
pub mod error;
pub mod fallback;
pub mod matmul;
pub mod mul;
pub mod policy;
pub mod scalar;
pub mod shape;
pub mod strategy;
pub mod structure;

pub use array::{Destination, SMatrix, SVector, TransposedMut};
pub use error::{MulError, Result};
pub use mul::{multiply_add_in_place, multiply_in_place, multiply_using, multiply_with_policy};
pub use policy::{Assign, MulAdd, ScaleAccumulate};
pub use scalar::{ElementKind, Scalar};
pub use shape::{Descriptor, Layout, Shape};
pub use strategy::{Strategy, Thresholds};
pub use structure::{Operand, Structure};

/// Rows of the dense kernel's register tile.
pub const MR: usize = 8;
/// Columns of the dense kernel's register tile.
pub const NR: usize = 4;

pub const MC: usize = MR * 16;
pub const NC: usize = NR * 32;
pub const KC: usize = 256;

/// `m * n * k` from which the dense kernel splits column blocks across the
/// rayon thread pool.
pub const PAR_THRESHOLD: usize = 64 * 64 * 64;
