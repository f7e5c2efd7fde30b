//! The `dest = alpha * (A * B) + beta * dest` update rule.
//!
//! [`Assign`] is the identity policy (`alpha = 1`, `beta = 0`). Multipliers
//! are generic over the policy, so for `Assign` the scaling and the read of
//! the old destination value are compiled out entirely and the destination
//! may hold garbage (even NaN) before the call.

use crate::scalar::Scalar;

pub trait ScaleAccumulate<T: Scalar>: Copy {
    /// `true` when the old destination value never contributes to the result.
    const OVERWRITES: bool;

    fn alpha(&self) -> T;

    fn beta(&self) -> T;

    /// New destination value from `product = (A * B)[i, j]`. `old` is only
    /// evaluated when the policy needs it.
    fn update<F: FnOnce() -> T>(&self, product: T, old: F) -> T;

    /// `beta * old`, the update when the product is empty.
    fn scale(&self, old: T) -> T;

    /// `beta` as the dense kernel expects it: `None` means overwrite.
    fn kernel_beta(&self) -> Option<T> {
        if Self::OVERWRITES || self.beta() == T::zero() {
            None
        } else {
            Some(self.beta())
        }
    }
}

/// Plain assignment, `dest = A * B`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assign;

impl<T: Scalar> ScaleAccumulate<T> for Assign {
    const OVERWRITES: bool = true;

    #[inline(always)]
    fn alpha(&self) -> T {
        T::one()
    }

    #[inline(always)]
    fn beta(&self) -> T {
        T::zero()
    }

    #[inline(always)]
    fn update<F: FnOnce() -> T>(&self, product: T, _old: F) -> T {
        product
    }

    #[inline(always)]
    fn scale(&self, _old: T) -> T {
        T::zero()
    }
}

/// Scaled accumulation, `dest = alpha * (A * B) + beta * dest`.
///
/// A literal `alpha == 1` skips the multiply and a literal `beta == 0` skips
/// reading `dest`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MulAdd<T> {
    pub alpha: T,
    pub beta: T,
}

impl<T> MulAdd<T> {
    pub fn new(alpha: T, beta: T) -> Self {
        Self { alpha, beta }
    }
}

impl<T: Scalar> ScaleAccumulate<T> for MulAdd<T> {
    const OVERWRITES: bool = false;

    #[inline(always)]
    fn alpha(&self) -> T {
        self.alpha
    }

    #[inline(always)]
    fn beta(&self) -> T {
        self.beta
    }

    #[inline(always)]
    fn update<F: FnOnce() -> T>(&self, product: T, old: F) -> T {
        let scaled = if self.alpha == T::one() {
            product
        } else {
            self.alpha * product
        };
        if self.beta == T::zero() {
            scaled
        } else {
            scaled + self.beta * old()
        }
    }

    #[inline(always)]
    fn scale(&self, old: T) -> T {
        if self.beta == T::zero() {
            T::zero()
        } else {
            self.beta * old
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_assign_is_identity() {
        assert_eq!(<Assign as ScaleAccumulate<f64>>::alpha(&Assign), 1.0);
        assert_eq!(<Assign as ScaleAccumulate<f64>>::beta(&Assign), 0.0);
        assert_eq!(ScaleAccumulate::<f64>::kernel_beta(&Assign), None);
    }

    #[test]
    fn test_assign_never_reads_old() {
        let result = Assign.update(5.0f64, || panic!("old value must not be read"));
        assert_eq!(result, 5.0);
    }

    #[test]
    fn test_muladd_general() {
        let policy = MulAdd::new(2.0, 3.0);
        assert_eq!(policy.update(19.0, || 1.0), 41.0);
        assert_eq!(policy.scale(4.0), 12.0);
        assert_eq!(policy.kernel_beta(), Some(3.0));
    }

    #[test]
    fn test_muladd_beta_zero_skips_old() {
        let reads = Cell::new(0);
        let policy = MulAdd::new(2.0f32, 0.0);
        let result = policy.update(4.0, || {
            reads.set(reads.get() + 1);
            f32::NAN
        });
        assert_eq!(result, 8.0);
        assert_eq!(reads.get(), 0);
        assert_eq!(policy.kernel_beta(), None);
    }

    #[test]
    fn test_muladd_integers() {
        let policy = MulAdd::new(1i64, 1);
        assert_eq!(policy.update(10, || 5), 15);
        let policy = MulAdd::new(0i64, 2);
        assert_eq!(policy.update(10, || 5), 10);
    }
}
