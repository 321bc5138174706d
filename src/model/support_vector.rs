//! Borrowed support vectors
//!
//! A model stores its support vectors either as raw feature vectors or as
//! rows of a precomputed Gram matrix. Both resolve to a feature vector in
//! input space; the introspector only ever asks for single features.

pub use crate::core::FeatureAccess;
use crate::core::SparseVector;
use crate::kernel::PrecomputedKernel;

/// A support vector borrowed from a trained model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupportVector<'a> {
    /// Stored as its feature vector
    Raw(&'a SparseVector),
    /// Stored as a Gram row; `input` is the training sample it names
    Precomputed {
        kernel_row: &'a SparseVector,
        input: &'a SparseVector,
    },
}

impl<'a> SupportVector<'a> {
    /// Feature vector in input space
    pub fn input(&self) -> &'a SparseVector {
        match *self {
            SupportVector::Raw(features) => features,
            SupportVector::Precomputed { input, .. } => input,
        }
    }

    /// Stored Gram row, for precomputed models
    pub fn kernel_row(&self) -> Option<&'a SparseVector> {
        match *self {
            SupportVector::Raw(_) => None,
            SupportVector::Precomputed { kernel_row, .. } => Some(kernel_row),
        }
    }

    /// 1-based serial number of the training sample, for precomputed models
    pub fn serial(&self) -> Option<usize> {
        self.kernel_row().map(PrecomputedKernel::serial)
    }
}

impl FeatureAccess for SupportVector<'_> {
    fn feature_at(&self, index: usize) -> f64 {
        self.input().get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_support_vector() {
        let features = SparseVector::from_dense(&[0.0, 2.5, -1.0]);
        let sv = SupportVector::Raw(&features);

        assert_eq!(sv.feature_at(1), 2.5);
        assert_eq!(sv.feature_at(0), 0.0);
        assert_eq!(sv.feature_at(10), 0.0);
        assert_eq!(sv.kernel_row(), None);
        assert_eq!(sv.serial(), None);
    }

    #[test]
    fn test_precomputed_support_vector() {
        let row = SparseVector::new(vec![0, 1, 2], vec![2.0, 0.5, 4.0]);
        let features = SparseVector::from_dense(&[3.0, 1.0]);
        let sv = SupportVector::Precomputed {
            kernel_row: &row,
            input: &features,
        };

        // Features come from the resolved sample, not from the Gram row
        assert_eq!(sv.feature_at(0), 3.0);
        assert_eq!(sv.feature_at(1), 1.0);
        assert_eq!(sv.serial(), Some(2));
        assert_eq!(sv.input(), &features);
    }
}
