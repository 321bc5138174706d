//! Exponentiation by squaring with overflow detection
//!
//! `ipow(base, exp)` needs O(log exp) multiplications. Every multiplication
//! is checked before it is carried out, both when accumulating the result and
//! when squaring the running base, so an overflow surfaces as
//! [`SVMError::RangeError`] instead of a wrapped integer or an infinity.

use crate::core::{Result, SVMError};
use num_traits::{CheckedMul, Float, PrimInt};

/// Numeric types usable as the base of [`ipow`]
pub trait PowerBase: Copy {
    /// Multiplicative identity
    fn one() -> Self;

    /// `self * rhs`, or `None` if the product is not representable
    fn checked_product(self, rhs: Self) -> Option<Self>;

    /// `1 / self` for real-valued types, `None` for integral types
    fn reciprocal(self) -> Option<Self>;
}

macro_rules! impl_integral_base {
    ($($t:ty),*) => {
        $(
            impl PowerBase for $t {
                fn one() -> Self {
                    1
                }

                fn checked_product(self, rhs: Self) -> Option<Self> {
                    CheckedMul::checked_mul(&self, &rhs)
                }

                fn reciprocal(self) -> Option<Self> {
                    None
                }
            }
        )*
    };
}

macro_rules! impl_float_base {
    ($($t:ty),*) => {
        $(
            impl PowerBase for $t {
                fn one() -> Self {
                    1.0
                }

                fn checked_product(self, rhs: Self) -> Option<Self> {
                    checked_float_product(self, rhs)
                }

                fn reciprocal(self) -> Option<Self> {
                    Some(Float::recip(self))
                }
            }
        )*
    };
}

impl_integral_base!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float_base!(f32, f64);

fn checked_float_product<F: Float>(lhs: F, rhs: F) -> Option<F> {
    if !lhs.is_finite() || !rhs.is_finite() {
        return None;
    }
    if lhs.is_zero() || rhs.is_zero() {
        return Some(lhs * rhs);
    }
    if lhs.abs() > F::max_value() / rhs.abs() {
        None
    } else {
        Some(lhs * rhs)
    }
}

/// Raise `base` to the integral power `exp`
///
/// # Errors
/// * [`SVMError::DomainError`] for a negative exponent on an integral base
/// * [`SVMError::RangeError`] if any intermediate product overflows
///
/// # Examples
/// ```
/// use svm_introspect::combinatorics::ipow;
///
/// assert_eq!(ipow(3i64, 4).unwrap(), 81);
/// assert_eq!(ipow(2.0f64, -2).unwrap(), 0.25);
/// assert!(ipow(i32::MAX, 2).is_err());
/// ```
pub fn ipow<B: PowerBase, E: PrimInt>(base: B, exp: E) -> Result<B> {
    if exp < E::zero() {
        let recip = base.reciprocal().ok_or_else(|| {
            SVMError::DomainError(
                "negative exponent in exponentiation of integral base".to_string(),
            )
        })?;
        // -exp may not exist for the most negative exponent; peel one factor off first
        let magnitude = E::zero() - (exp + E::one());
        return ipow(recip, magnitude)?
            .checked_product(recip)
            .ok_or_else(overflow);
    }

    let mut base = base;
    let mut exp = exp;
    let mut result = B::one();
    while !exp.is_zero() {
        if (exp & E::one()) == E::one() {
            result = result.checked_product(base).ok_or_else(overflow)?;
        }
        exp = exp >> 1;
        if !exp.is_zero() {
            base = base.checked_product(base).ok_or_else(overflow)?;
        }
    }
    Ok(result)
}

fn overflow() -> SVMError {
    SVMError::RangeError("overflow in ipow".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn repeated_multiplication(base: i64, exp: u32) -> i64 {
        (0..exp).fold(1, |acc, _| acc * base)
    }

    #[test]
    fn test_ipow_matches_reference_loop() {
        for base in -7i64..=7 {
            for exp in 0u32..=15 {
                assert_eq!(
                    ipow(base, exp).unwrap(),
                    repeated_multiplication(base, exp),
                    "{base}^{exp}"
                );
            }
        }
    }

    #[test]
    fn test_ipow_float_matches_powi() {
        for &base in &[0.5f64, -1.5, 2.25, 10.0, -0.1] {
            for exp in 0i32..=20 {
                assert_relative_eq!(
                    ipow(base, exp).unwrap(),
                    base.powi(exp),
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_ipow_zero_exponent() {
        assert_eq!(ipow(0i32, 0).unwrap(), 1);
        assert_eq!(ipow(0.0f64, 0usize).unwrap(), 1.0);
        assert_eq!(ipow(u8::MAX, 0u8).unwrap(), 1);
    }

    #[test]
    fn test_ipow_zero_base() {
        assert_eq!(ipow(0i32, 5).unwrap(), 0);
        assert_eq!(ipow(0.0f64, 3).unwrap(), 0.0);
    }

    #[test]
    fn test_ipow_negative_exponent_float() {
        assert_relative_eq!(ipow(2.0f64, -3).unwrap(), 0.125);
        assert_relative_eq!(ipow(-4.0f32, -1).unwrap(), -0.25);
        assert!(matches!(
            ipow(0.5f64, i64::MIN + 1),
            Err(SVMError::RangeError(_))
        ));
    }

    #[test]
    fn test_ipow_negative_exponent_integral() {
        assert!(matches!(ipow(2i32, -1), Err(SVMError::DomainError(_))));
        assert!(matches!(ipow(1u64, -3i8), Err(SVMError::DomainError(_))));
    }

    #[test]
    fn test_ipow_integral_boundaries() {
        assert_eq!(ipow(2i32, 30).unwrap(), 1 << 30);
        assert_eq!(ipow(-2i32, 31).unwrap(), i32::MIN);
        assert_eq!(ipow(i32::MAX, 1).unwrap(), i32::MAX);
        assert_eq!(ipow(2u64, 63).unwrap(), 1u64 << 63);
    }

    #[test]
    fn test_ipow_integral_overflow() {
        assert!(matches!(ipow(2i32, 31), Err(SVMError::RangeError(_))));
        assert!(matches!(ipow(i32::MAX, 2), Err(SVMError::RangeError(_))));
        assert!(matches!(ipow(2u64, 64), Err(SVMError::RangeError(_))));
        assert!(matches!(ipow(10u8, 3), Err(SVMError::RangeError(_))));
        assert!(matches!(ipow(usize::MAX, 1000), Err(SVMError::RangeError(_))));
    }

    #[test]
    fn test_ipow_float_overflow() {
        assert!(matches!(ipow(f64::MAX, 2), Err(SVMError::RangeError(_))));
        assert!(matches!(ipow(-f64::MAX, 3), Err(SVMError::RangeError(_))));
        assert!(matches!(ipow(10.0f32, 39), Err(SVMError::RangeError(_))));
        assert!(matches!(ipow(1e200f64, 2), Err(SVMError::RangeError(_))));
        assert!(ipow(10.0f32, 38).is_ok());
    }

    #[test]
    fn test_ipow_reciprocal_of_zero_overflows() {
        assert!(matches!(ipow(0.0f64, -1), Err(SVMError::RangeError(_))));
    }
}
