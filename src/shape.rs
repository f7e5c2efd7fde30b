//! Static shapes and the transpose-aware descriptor built on top of them.

use std::fmt;

/// Extents of a fixed-size array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A column vector with `n` entries.
    Vector(usize),
    /// A `rows x cols` matrix.
    Matrix(usize, usize),
}

impl Shape {
    /// Number of axes, 1 or 2.
    pub const fn rank(&self) -> usize {
        match self {
            Shape::Vector(_) => 1,
            Shape::Matrix(_, _) => 2,
        }
    }

    /// Total number of elements.
    pub const fn product(&self) -> usize {
        match *self {
            Shape::Vector(n) => n,
            Shape::Matrix(rows, cols) => rows * cols,
        }
    }

    pub const fn rows(&self) -> usize {
        match *self {
            Shape::Vector(n) => n,
            Shape::Matrix(rows, _) => rows,
        }
    }

    /// Number of columns; a vector has one.
    pub const fn cols(&self) -> usize {
        match *self {
            Shape::Vector(_) => 1,
            Shape::Matrix(_, cols) => cols,
        }
    }

    /// The shape tuple in reverse order. Reversing a 1-tuple is the identity.
    pub const fn reversed(&self) -> Shape {
        match *self {
            Shape::Vector(n) => Shape::Vector(n),
            Shape::Matrix(rows, cols) => Shape::Matrix(cols, rows),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Vector(n) => write!(f, "({},)", n),
            Shape::Matrix(rows, cols) => write!(f, "{}x{}", rows, cols),
        }
    }
}

/// Whether storage should be read as-is or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Plain,
    Transposed,
    /// A structured view (triangular, symmetric, ...) with no dense layout.
    Unspecified,
}

/// Shape plus layout tag of an operand or destination.
///
/// For transposed operands `shape` is the logical shape, i.e. the reverse of
/// the storage shape. For vectors the shape stays rank 1 and the tag alone
/// records that the vector is read as a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub shape: Shape,
    pub layout: Layout,
}

impl Descriptor {
    pub const fn new(shape: Shape, layout: Layout) -> Self {
        Self { shape, layout }
    }

    /// Extracts the descriptor of anything that carries one.
    pub fn of<D: Described + ?Sized>(value: &D) -> Self {
        value.descriptor()
    }

    /// Reverses the shape and swaps `Plain` with `Transposed`.
    pub const fn transpose(self) -> Self {
        let layout = match self.layout {
            Layout::Plain => Layout::Transposed,
            Layout::Transposed => Layout::Plain,
            Layout::Unspecified => Layout::Unspecified,
        };
        Self {
            shape: self.shape.reversed(),
            layout,
        }
    }

    pub const fn is_transposed(&self) -> bool {
        matches!(self.layout, Layout::Transposed)
    }

    /// Logical `(rows, cols)`, accounting for vectors read as rows.
    pub const fn dims(&self) -> (usize, usize) {
        match (self.shape, self.layout) {
            (Shape::Vector(n), Layout::Transposed) => (1, n),
            (shape, _) => (shape.rows(), shape.cols()),
        }
    }

    /// `(rows, cols)` of the underlying column-major storage.
    pub const fn storage_dims(&self) -> (usize, usize) {
        let (rows, cols) = self.dims();
        if self.is_transposed() {
            (cols, rows)
        } else {
            (rows, cols)
        }
    }
}

/// Types that expose a [`Descriptor`].
pub trait Described {
    fn descriptor(&self) -> Descriptor;
}
