//! Training problem: an owned table of labelled samples

use crate::core::{Dataset, Result, SVMError, Sample, SparseVector};
use crate::kernel::Kernel;

/// Labelled samples over a fixed number of features
///
/// The model keeps its problem for its whole lifetime. Precomputed-kernel
/// models resolve support vectors through it, and kernelize new inputs
/// against its samples.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    samples: Vec<Sample>,
    dim: usize,
}

impl Problem {
    /// Create an empty problem over `dim` features
    pub fn new(dim: usize) -> Self {
        Self {
            samples: Vec::new(),
            dim,
        }
    }

    /// Copy every sample of a dataset
    pub fn from_dataset<D: Dataset>(dataset: &D) -> Self {
        Self {
            samples: (0..dataset.len()).map(|i| dataset.get_sample(i)).collect(),
            dim: dataset.dim(),
        }
    }

    /// Append a sample
    ///
    /// Fails if the features reach past the problem's dimension.
    pub fn add_sample(&mut self, features: SparseVector, label: f64) -> Result<()> {
        if features.dim() > self.dim {
            return Err(SVMError::DimensionMismatch {
                expected: self.dim,
                actual: features.dim(),
            });
        }
        self.samples.push(Sample::new(features, label));
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Features of the sample with the given 1-based serial number
    pub fn input(&self, serial: usize) -> Option<&SparseVector> {
        serial
            .checked_sub(1)
            .and_then(|i| self.samples.get(i))
            .map(|s| &s.features)
    }

    /// Rows of the Gram matrix as training samples
    ///
    /// Row `i` holds its serial number `i + 1` at index 0 and `K(x_i, x_j)`
    /// at index `j + 1`.
    pub fn gram_rows<K: Kernel>(&self, kernel: &K) -> Vec<Sample> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                let mut row = self.kernelize(kernel, &sample.features);
                row.indices.insert(0, 0);
                row.values.insert(0, (i + 1) as f64);
                Sample::new(row, sample.label)
            })
            .collect()
    }

    /// Kernel values of `x` against every sample, at indices `1..=len`
    pub fn kernelize<K: Kernel>(&self, kernel: &K, x: &SparseVector) -> SparseVector {
        let (indices, values) = self
            .samples
            .iter()
            .enumerate()
            .map(|(j, sample)| (j + 1, kernel.compute(x, &sample.features)))
            .unzip();
        SparseVector { indices, values }
    }
}

impl Dataset for Problem {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn get_sample(&self, i: usize) -> Sample {
        self.samples[i].clone()
    }

    fn get_labels(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.label).collect()
    }
}
