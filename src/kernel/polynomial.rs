//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (γ * <x, y> + c)^d
//!
//! Where:
//! - γ (gamma): scaling factor for the dot product
//! - c (coef0): independent term in the polynomial
//! - d (degree): degree of the polynomial, any non-negative integer
//!
//! Unlike kernels that are only ever evaluated, this one is also expanded
//! term by term by [`crate::introspect`], so the value is the exact power of
//! the base, negative bases included.
//!
//! Common configurations:
//! - Linear kernel: d=1, γ=1, c=0
//! - Quadratic kernel: d=2, γ=1, c=1
//! - Cubic kernel: d=3, γ=1, c=1

use crate::core::{Result, SVMError, SparseVector};
use crate::kernel::traits::Kernel;
use serde::{Deserialize, Serialize};

/// Polynomial kernel with configurable degree, gamma, and coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialKernel {
    /// Scaling factor for the dot product
    pub gamma: f64,
    /// Independent term in the polynomial
    pub coef0: f64,
    /// Degree of the polynomial
    pub degree: u32,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel with the specified parameters
    ///
    /// # Arguments
    /// * `degree` - Degree of the polynomial
    /// * `gamma` - Scaling factor for the dot product
    /// * `coef0` - Independent term in the polynomial
    ///
    /// # Examples
    /// ```
    /// use svm_introspect::kernel::PolynomialKernel;
    ///
    /// // Quadratic kernel: (x·y + 0.5)²
    /// let kernel = PolynomialKernel::new(2, 1.0, 0.5);
    /// assert_eq!(kernel.degree, 2);
    /// ```
    pub fn new(degree: u32, gamma: f64, coef0: f64) -> Self {
        Self {
            gamma,
            coef0,
            degree,
        }
    }

    /// Creates a quadratic kernel: (γ * <x,y> + 1)²
    pub fn quadratic(gamma: f64) -> Self {
        Self::new(2, gamma, 1.0)
    }

    /// Creates a cubic kernel: (γ * <x,y> + 1)³
    pub fn cubic(gamma: f64) -> Self {
        Self::new(3, gamma, 1.0)
    }

    /// Creates a polynomial kernel with gamma = 1 / n_features
    ///
    /// # Examples
    /// ```
    /// use svm_introspect::kernel::PolynomialKernel;
    ///
    /// let kernel = PolynomialKernel::auto(3, 100);
    /// assert_eq!(kernel.gamma, 0.01);
    /// ```
    pub fn auto(degree: u32, n_features: usize) -> Self {
        let gamma = 1.0 / n_features.max(1) as f64;
        Self::new(degree, gamma, 0.0)
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        let base = self.gamma * x.dot(y) + self.coef0;
        // Degrees beyond i32 fail `validate`; never evaluate a truncated power
        i32::try_from(self.degree).map_or(f64::NAN, |degree| base.powi(degree))
    }

    fn name(&self) -> &'static str {
        "polynomial"
    }

    /// Reject parameters that cannot produce a finite kernel value
    fn validate(&self) -> Result<()> {
        if !self.gamma.is_finite() {
            return Err(SVMError::InvalidParameter(format!(
                "gamma must be finite, got {}",
                self.gamma
            )));
        }
        if i32::try_from(self.degree).is_err() {
            return Err(SVMError::InvalidParameter(format!(
                "degree must not exceed {}, got {}",
                i32::MAX,
                self.degree
            )));
        }
        if !self.coef0.is_finite() {
            return Err(SVMError::InvalidParameter(format!(
                "coef0 must be finite, got {}",
                self.coef0
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_kernel_creation() {
        let kernel = PolynomialKernel::new(3, 0.5, 1.0);
        assert_eq!(kernel.degree, 3);
        assert_eq!(kernel.gamma, 0.5);
        assert_eq!(kernel.coef0, 1.0);
    }

    #[test]
    fn test_quadratic_and_cubic() {
        let quad = PolynomialKernel::quadratic(2.0);
        assert_eq!((quad.degree, quad.gamma, quad.coef0), (2, 2.0, 1.0));

        let cubic = PolynomialKernel::cubic(0.5);
        assert_eq!((cubic.degree, cubic.gamma, cubic.coef0), (3, 0.5, 1.0));
    }

    #[test]
    fn test_auto_kernel() {
        let kernel = PolynomialKernel::auto(2, 100);
        assert_eq!(kernel.degree, 2);
        assert_eq!(kernel.gamma, 0.01);
        assert_eq!(kernel.coef0, 0.0);
    }

    #[test]
    fn test_polynomial_kernel_computation() {
        let kernel = PolynomialKernel::new(2, 1.0, 1.0);

        let x = SparseVector::new(vec![0, 1], vec![1.0, 2.0]);
        let y = SparseVector::new(vec![0, 1], vec![2.0, 1.0]);

        // Dot product: 4, kernel: (4 + 1)² = 25
        assert_relative_eq!(kernel.compute(&x, &y), 25.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_kernel_same_vector() {
        let kernel = PolynomialKernel::new(3, 0.5, 2.0);
        let x = SparseVector::new(vec![0, 1], vec![3.0, 4.0]);

        // (0.5 * 25 + 2)³ = 14.5³
        assert_relative_eq!(kernel.compute(&x, &x), 3048.625, epsilon = 1e-6);
    }

    #[test]
    fn test_polynomial_kernel_negative_base_is_not_clamped() {
        let kernel = PolynomialKernel::new(3, 1.0, 0.5);
        let x = SparseVector::new(vec![0], vec![1.0]);
        let y = SparseVector::new(vec![0], vec![-2.0]);

        // (-2 + 0.5)³ = -3.375
        assert_relative_eq!(kernel.compute(&x, &y), -3.375, epsilon = 1e-12);

        let even = PolynomialKernel::new(2, 1.0, 0.5);
        assert_relative_eq!(even.compute(&x, &y), 2.25, epsilon = 1e-12);
    }

    #[test]
    fn test_polynomial_kernel_degree_zero() {
        let kernel = PolynomialKernel::new(0, 3.0, -7.0);
        let x = SparseVector::new(vec![0], vec![5.0]);
        assert_eq!(kernel.compute(&x, &x), 1.0);
    }

    #[test]
    fn test_polynomial_kernel_sparse_vectors() {
        let kernel = PolynomialKernel::new(2, 1.0, 0.0);

        let x = SparseVector::new(vec![0, 2, 5], vec![1.0, 2.0, 3.0]);
        let y = SparseVector::new(vec![1, 2, 4], vec![1.0, 2.0, 3.0]);

        // Only index 2 overlaps: (2 * 2)² = 16
        assert_relative_eq!(kernel.compute(&x, &y), 16.0, epsilon = 1e-10);
    }

    #[test]
    fn test_validate() {
        assert!(PolynomialKernel::new(2, -1.0, -0.5).validate().is_ok());
        assert!(PolynomialKernel::new(2, f64::NAN, 0.0).validate().is_err());
        assert!(PolynomialKernel::new(2, 1.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_oversized_degree_rejected() {
        let kernel = PolynomialKernel::new(u32::MAX, 1.0, 0.0);
        assert!(matches!(
            kernel.validate(),
            Err(SVMError::InvalidParameter(_))
        ));

        let x = SparseVector::from_dense(&[1.0, 1.0]);
        assert!(kernel.compute(&x, &x).is_nan());

        assert!(PolynomialKernel::new(i32::MAX as u32, 1.0, 0.0).validate().is_ok());
    }
}
