//! Core traits for SVM implementation

use crate::core::Sample;

/// Dataset abstraction for efficient data access
pub trait Dataset: Send + Sync {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Get a single sample by index
    ///
    /// # Panics
    /// Panics if index >= len()
    fn get_sample(&self, i: usize) -> Sample;

    /// Get multiple samples
    fn get_batch(&self, indices: &[usize]) -> Vec<Sample> {
        indices.iter().map(|&i| self.get_sample(i)).collect()
    }

    /// Get all labels as a vector
    fn get_labels(&self) -> Vec<f64>;

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to individual features of a vector
///
/// This is the single capability the tensor introspector needs from a
/// support vector, whichever way the model stores it.
pub trait FeatureAccess {
    /// Value of the feature at `index` (0 when not stored)
    fn feature_at(&self, index: usize) -> f64;
}

impl FeatureAccess for crate::core::SparseVector {
    fn feature_at(&self, index: usize) -> f64 {
        self.get(index)
    }
}

impl FeatureAccess for [f64] {
    fn feature_at(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(0.0)
    }
}
