//! Error types for statmul operations.
//!
//! Multiplication reports failures as values instead of panicking, so callers
//! can recover from incompatible operand shapes.

use std::fmt;

use crate::shape::Shape;

/// Errors that can occur during a multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MulError {
    /// The operands (or the destination) have incompatible dimensions.
    ShapeMismatch {
        /// Logical shape of the left operand.
        a: Shape,
        /// Logical shape of the right operand.
        b: Shape,
        /// Logical shape of the destination, when it took part in the check.
        dest: Option<Shape>,
    },
}

impl fmt::Display for MulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MulError::ShapeMismatch { a, b, dest: None } => {
                write!(f, "Shape mismatch: cannot multiply {} by {}", a, b)
            }
            MulError::ShapeMismatch {
                a,
                b,
                dest: Some(dest),
            } => write!(
                f,
                "Shape mismatch: cannot multiply {} by {} into {}",
                a, b, dest
            ),
        }
    }
}

impl std::error::Error for MulError {}

/// Result type alias for statmul operations.
pub type Result<T> = std::result::Result<T, MulError>;

/// Creates a shape mismatch error.
pub fn shape_mismatch(a: Shape, b: Shape, dest: Option<Shape>) -> MulError {
    MulError::ShapeMismatch { a, b, dest }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let error = shape_mismatch(Shape::Matrix(2, 3), Shape::Matrix(4, 2), None);
        let display = format!("{}", error);
        assert!(display.contains("Shape mismatch"));
        assert!(display.contains("2x3"));
        assert!(display.contains("4x2"));
        assert!(!display.contains("into"));
    }

    #[test]
    fn test_shape_mismatch_display_with_destination() {
        let error = shape_mismatch(
            Shape::Matrix(2, 2),
            Shape::Vector(2),
            Some(Shape::Vector(3)),
        );
        let display = format!("{}", error);
        assert!(display.contains("2x2"));
        assert!(display.contains("into (3,)"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = shape_mismatch(Shape::Matrix(1, 2), Shape::Matrix(3, 4), None);
        let error2 = shape_mismatch(Shape::Matrix(1, 2), Shape::Matrix(3, 4), None);
        let error3 = shape_mismatch(Shape::Matrix(1, 2), Shape::Matrix(3, 5), None);

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = shape_mismatch(Shape::Vector(3), Shape::Vector(4), None);

        let _: &dyn std::error::Error = &error;
        assert!(std::error::Error::source(&error).is_none());
    }
}
