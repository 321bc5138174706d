//! Core type definitions for SVM

use serde::{Deserialize, Serialize};

/// Prediction result: the voted label and one decision value per class pair
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted class label
    pub label: f64,
    /// Raw pairwise decision values, pairs ordered (0,1), (0,2), ..., (1,2), ...
    pub decision_values: Vec<f64>,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_values: Vec<f64>) -> Self {
        Self {
            label,
            decision_values,
        }
    }

    /// Decision value of the first (for binary models: the only) classifier
    pub fn decision_value(&self) -> f64 {
        self.decision_values.first().copied().unwrap_or(0.0)
    }
}

/// Sparse vector representation with sorted indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, ensuring indices are sorted
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Create a sparse vector from dense values, dropping exact zeros
    pub fn from_dense(values: &[f64]) -> Self {
        let (indices, values): (Vec<usize>, Vec<f64>) = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .unzip();
        Self { indices, values }
    }

    /// Create an empty sparse vector
    pub fn empty() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Get the value at a specific index (0 if not present)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with another sparse vector
    ///
    /// Both index lists are sorted, so this is a single merge pass.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut result = 0.0;
        let mut i = 0;
        let mut j = 0;

        while i < self.indices.len() && j < other.indices.len() {
            let x_idx = self.indices[i];
            let y_idx = other.indices[j];

            if x_idx == y_idx {
                result += self.values[i] * other.values[j];
                i += 1;
                j += 1;
            } else if x_idx < y_idx {
                i += 1;
            } else {
                j += 1;
            }
        }

        result
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// One past the largest stored index (0 for an empty vector)
    pub fn dim(&self) -> usize {
        self.indices.last().map_or(0, |&i| i + 1)
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Training sample with features and label
#[derive(Clone, Debug)]
pub struct Sample {
    /// Feature vector (sparse representation)
    pub features: SparseVector,
    /// Class label; any real value, classes are compared by equality
    pub label: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: SparseVector, label: f64) -> Self {
        Self { features, label }
    }
}

/// Result of a binary optimization run
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values), one per training sample
    pub alpha: Vec<f64>,
    /// Threshold; the decision function is `sum(alpha_i y_i K(x_i, x)) - rho`
    pub rho: f64,
    /// Indices of support vectors (where alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final dual objective value
    pub objective_value: f64,
}

/// Configuration for the SMO solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Tolerance on the KKT violation gap
    pub epsilon: f64,
    /// Maximum number of iterations per binary subproblem
    pub max_iterations: usize,
    /// Kernel cache size in bytes
    pub cache_size: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.001,
            max_iterations: 10000,
            cache_size: 100_000_000, // 100MB
        }
    }
}

/// How support vectors are stored in a trained model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Support vectors are the raw feature vectors
    #[default]
    Raw,
    /// Training runs on precomputed kernel rows; support vectors carry the
    /// serial number of their training sample at index 0
    Precomputed,
}
