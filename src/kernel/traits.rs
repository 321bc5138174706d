//! Kernel trait definition

use crate::core::{Result, SparseVector};

/// Kernel function trait
///
/// A kernel function K(x, y) must satisfy Mercer's condition to be valid for SVM.
/// This trait provides the interface for different kernel implementations.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Reject parameters the kernel cannot be evaluated with
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
