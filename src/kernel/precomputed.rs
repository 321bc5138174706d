//! Kernel lookups in precomputed Gram rows
//!
//! A precomputed row for sample `x` stores `K(x, x_j)` at index `j` (1-based
//! serial numbers of the training samples) and, for training rows, the
//! sample's own serial number at index 0. Evaluating the kernel between a row
//! and a training row is then a single lookup.

use crate::core::SparseVector;
use crate::kernel::Kernel;

/// Kernel whose "feature vectors" are rows of a precomputed Gram matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecomputedKernel;

impl PrecomputedKernel {
    pub fn new() -> Self {
        Self
    }

    /// Serial number (1-based) stored at index 0 of a training row
    pub fn serial(row: &SparseVector) -> usize {
        row.get(0) as usize
    }
}

impl Kernel for PrecomputedKernel {
    fn compute(&self, x: &SparseVector, y: &SparseVector) -> f64 {
        x.get(Self::serial(y))
    }

    fn name(&self) -> &'static str {
        "precomputed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_serial() {
        // Gram matrix [[4, 1], [1, 9]]
        let row1 = SparseVector::new(vec![0, 1, 2], vec![1.0, 4.0, 1.0]);
        let row2 = SparseVector::new(vec![0, 1, 2], vec![2.0, 1.0, 9.0]);
        let kernel = PrecomputedKernel::new();

        assert_eq!(kernel.compute(&row1, &row1), 4.0);
        assert_eq!(kernel.compute(&row1, &row2), 1.0);
        assert_eq!(kernel.compute(&row2, &row1), 1.0);
        assert_eq!(kernel.compute(&row2, &row2), 9.0);
        assert_eq!(PrecomputedKernel::serial(&row2), 2);
    }
}
