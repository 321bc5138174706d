//! High-level API for training and inspecting one-vs-one SVMs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use svm_introspect::api::SVM;
//! use svm_introspect::kernel::PolynomialKernel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = SVM::with_kernel(PolynomialKernel::new(2, 1.0, 0.5))
//!     .with_c(1.0)
//!     .with_epsilon(0.001)
//!     .train_from_file("data.libsvm")?;
//!
//! // Coefficient of x_0 x_1 in the decision function between labels 1 and 2
//! let introspector = model.introspector(1.0, 2.0, 2)?;
//! println!("T[0, 1] = {}", introspector.tensor(&[0, 1])?);
//! # Ok(())
//! # }
//! ```

use crate::core::{Dataset, Representation, Result, Sample};
use crate::data::LibSVMDataset;
use crate::kernel::{Kernel, LinearKernel};
use crate::model::{Model, Parameters, Problem};
use std::path::Path;

/// High-level SVM interface with builder pattern
#[derive(Debug, Clone)]
pub struct SVM<K: Kernel = LinearKernel> {
    params: Parameters<K>,
}

impl SVM<LinearKernel> {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self::with_kernel(LinearKernel::new())
    }
}

impl Default for SVM<LinearKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> SVM<K> {
    /// Create SVM with custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            params: Parameters::new(kernel),
        }
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.params.solver.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.params.solver.epsilon = epsilon;
        self
    }

    /// Set maximum number of iterations per binary subproblem
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.params.solver.max_iterations = max_iterations;
        self
    }

    /// Set kernel cache size in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.params.solver.cache_size = cache_size;
        self
    }

    /// Train on raw feature vectors or on precomputed kernel rows
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.params.representation = representation;
        self
    }

    /// Fail training unless the problem has exactly this many classes
    pub fn with_expected_labels(mut self, expected_labels: usize) -> Self {
        self.params.expected_labels = Some(expected_labels);
        self
    }

    pub fn params(&self) -> &Parameters<K> {
        &self.params
    }

    /// Train on a problem
    pub fn train(self, problem: Problem) -> Result<Model<K>> {
        Model::train(problem, self.params)
    }

    /// Train on a dataset
    pub fn train_dataset<D: Dataset>(self, dataset: &D) -> Result<Model<K>> {
        self.train(Problem::from_dataset(dataset))
    }

    /// Train on samples
    pub fn train_samples(self, samples: &[Sample]) -> Result<Model<K>> {
        let dim = samples
            .iter()
            .map(|s| s.features.dim())
            .max()
            .unwrap_or(0);
        let mut problem = Problem::new(dim);
        for sample in samples {
            problem.add_sample(sample.features.clone(), sample.label)?;
        }
        self.train(problem)
    }

    /// Train from LibSVM format file
    pub fn train_from_file<P: AsRef<Path>>(self, path: P) -> Result<Model<K>> {
        let dataset = LibSVMDataset::from_file(path)?;
        self.train_dataset(&dataset)
    }
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Train a linear SVM on LibSVM data with default parameters
    pub fn train_libsvm<P: AsRef<Path>>(path: P) -> Result<Model<LinearKernel>> {
        SVM::new().train_from_file(path)
    }

    /// Train on one file, report accuracy on another
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
    ) -> Result<f64> {
        let model = train_libsvm(train_path)?;
        let test = LibSVMDataset::from_file(test_path)?;
        Ok(model.evaluate(&test))
    }
}
