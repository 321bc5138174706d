//! One-vs-one training and evaluation
//!
//! Every pair of classes gets its own binary SMO problem. The results are
//! packed into the dual layout used by libsvm: support vectors grouped by
//! class, one coefficient column per "other" class, one threshold per pair.

use crate::core::{Result, SVMError, Sample, SolverConfig, SparseVector};
use crate::kernel::Kernel;
use crate::solver::SMOSolver;
use log::debug;

/// Dual form of a trained one-vs-one classifier set
///
/// For the pair of class indices `(i, j)` with `i < j`, the class-`i` block
/// of support vectors reads its coefficients from column `j - 1` of
/// `sv_coef`, the class-`j` block from column `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedDual {
    /// Class labels in order of first appearance in the training data
    pub labels: Vec<f64>,
    /// Number of support vectors per class
    pub n_sv: Vec<usize>,
    /// Support vectors, grouped contiguously by class in label order
    pub support_vectors: Vec<SparseVector>,
    /// `nr_class - 1` columns of dual coefficients `y_i * alpha_i`
    pub sv_coef: Vec<Vec<f64>>,
    /// Thresholds, pairs ordered (0,1), (0,2), ..., (1,2), ...
    pub rho: Vec<f64>,
    /// Training-set index of each support vector
    pub sv_indices: Vec<usize>,
}

impl TrainedDual {
    pub fn nr_class(&self) -> usize {
        self.labels.len()
    }

    /// Number of pairwise classifiers
    pub fn n_classifiers(&self) -> usize {
        let n = self.nr_class();
        n * n.saturating_sub(1) / 2
    }

    /// Position of each class block in `support_vectors`
    pub fn class_starts(&self) -> Vec<usize> {
        self.n_sv
            .iter()
            .scan(0, |offset, &count| {
                let start = *offset;
                *offset += count;
                Some(start)
            })
            .collect()
    }

    /// Index into `rho` of the classifier for classes `k1 < k2`
    pub fn pair_index(&self, k1: usize, k2: usize) -> usize {
        let n = self.nr_class();
        k1 * n - k1 * (k1 + 1) / 2 + (k2 - k1 - 1)
    }
}

/// Check solver parameters, returning a description of the first problem
pub fn check_parameters(config: &SolverConfig) -> Option<String> {
    if !(config.c.is_finite() && config.c > 0.0) {
        return Some(format!("C must be positive and finite, got {}", config.c));
    }
    if !(config.epsilon.is_finite() && config.epsilon > 0.0) {
        return Some(format!("epsilon must be positive, got {}", config.epsilon));
    }
    if config.max_iterations == 0 {
        return Some("max_iterations must be at least 1".to_string());
    }
    None
}

/// Train one binary classifier per pair of classes
pub fn train_one_vs_one<K: Kernel>(
    samples: &[Sample],
    kernel: &K,
    config: &SolverConfig,
) -> Result<TrainedDual> {
    if samples.is_empty() {
        return Err(SVMError::EmptyDataset);
    }
    if let Some(message) = check_parameters(config) {
        return Err(SVMError::TrainingError(message));
    }

    // Classes in first-appearance order
    let mut labels: Vec<f64> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for (index, sample) in samples.iter().enumerate() {
        if !sample.label.is_finite() {
            return Err(SVMError::InvalidLabel(sample.label));
        }
        match labels.iter().position(|&l| l == sample.label) {
            Some(class) => members[class].push(index),
            None => {
                labels.push(sample.label);
                members.push(vec![index]);
            }
        }
    }

    let nr_class = labels.len();
    let solver = SMOSolver::new(kernel, config.clone());

    let mut nonzero = vec![false; samples.len()];
    let mut pair_alpha = Vec::with_capacity(nr_class * nr_class.saturating_sub(1) / 2);
    let mut rho = Vec::with_capacity(pair_alpha.capacity());

    for i in 0..nr_class {
        for j in (i + 1)..nr_class {
            let subproblem: Vec<Sample> = members[i]
                .iter()
                .map(|&t| Sample::new(samples[t].features.clone(), 1.0))
                .chain(
                    members[j]
                        .iter()
                        .map(|&t| Sample::new(samples[t].features.clone(), -1.0)),
                )
                .collect();

            let result = solver.solve(&subproblem)?;

            for (&t, &a) in members[i].iter().chain(&members[j]).zip(&result.alpha) {
                if a > 0.0 {
                    nonzero[t] = true;
                }
            }

            debug!(
                "classes ({}, {}): {} iterations, {} support vectors, rho = {}",
                labels[i],
                labels[j],
                result.iterations,
                result.support_vectors.len(),
                result.rho
            );

            rho.push(result.rho);
            pair_alpha.push(result.alpha);
        }
    }

    let n_sv: Vec<usize> = members
        .iter()
        .map(|class| class.iter().filter(|&&t| nonzero[t]).count())
        .collect();

    let sv_indices: Vec<usize> = members
        .iter()
        .flatten()
        .copied()
        .filter(|&t| nonzero[t])
        .collect();
    let support_vectors = sv_indices
        .iter()
        .map(|&t| samples[t].features.clone())
        .collect();

    let mut sv_start = Vec::with_capacity(nr_class);
    let mut offset = 0;
    for &count in &n_sv {
        sv_start.push(offset);
        offset += count;
    }

    let mut sv_coef = vec![vec![0.0; sv_indices.len()]; nr_class.saturating_sub(1)];
    let mut pair = 0;
    for i in 0..nr_class {
        for j in (i + 1)..nr_class {
            let alpha = &pair_alpha[pair];
            let n_i = members[i].len();

            let mut slot = sv_start[i];
            for (k, &t) in members[i].iter().enumerate() {
                if nonzero[t] {
                    sv_coef[j - 1][slot] = alpha[k];
                    slot += 1;
                }
            }

            let mut slot = sv_start[j];
            for (k, &t) in members[j].iter().enumerate() {
                if nonzero[t] {
                    sv_coef[i][slot] = -alpha[n_i + k];
                    slot += 1;
                }
            }

            pair += 1;
        }
    }

    Ok(TrainedDual {
        labels,
        n_sv,
        support_vectors,
        sv_coef,
        rho,
        sv_indices,
    })
}

/// Evaluate every pairwise decision function and vote
///
/// Returns the winning label (ties go to the class seen first) and the
/// decision values in pair order.
pub fn predict_values<K: Kernel>(
    dual: &TrainedDual,
    kernel: &K,
    x: &SparseVector,
) -> (f64, Vec<f64>) {
    let nr_class = dual.nr_class();
    let kvalue: Vec<f64> = dual
        .support_vectors
        .iter()
        .map(|sv| kernel.compute(x, sv))
        .collect();
    let start = dual.class_starts();

    let mut votes = vec![0usize; nr_class];
    let mut decision_values = Vec::with_capacity(dual.n_classifiers());

    let mut pair = 0;
    for i in 0..nr_class {
        for j in (i + 1)..nr_class {
            let first = start[i]..start[i] + dual.n_sv[i];
            let second = start[j]..start[j] + dual.n_sv[j];

            let sum: f64 = first
                .map(|k| dual.sv_coef[j - 1][k] * kvalue[k])
                .chain(second.map(|k| dual.sv_coef[i][k] * kvalue[k]))
                .sum();
            let value = sum - dual.rho[pair];

            if value > 0.0 {
                votes[i] += 1;
            } else {
                votes[j] += 1;
            }
            decision_values.push(value);
            pair += 1;
        }
    }

    let mut winner = 0;
    for (class, &count) in votes.iter().enumerate() {
        if count > votes[winner] {
            winner = class;
        }
    }

    let label = dual.labels.get(winner).copied().unwrap_or(f64::NAN);
    (label, decision_values)
}
