//! Trained one-vs-one models
//!
//! [`Model`] owns the training problem, the parameters and the trained dual.
//! Pairwise classifier views borrow from it and cannot outlive it.

pub mod classifier;
pub mod problem;
pub mod support_vector;

pub use self::classifier::*;
pub use self::problem::*;
pub use self::support_vector::*;

use crate::core::{Dataset, Prediction, Representation, Result, SVMError, Sample, SolverConfig, SparseVector};
use crate::introspect::TensorIntrospector;
use crate::kernel::{Kernel, PolynomialKernel, PrecomputedKernel};
use crate::solver::{check_parameters, predict_values, train_one_vs_one, TrainedDual};
use log::info;

/// Everything needed to train a model
#[derive(Debug, Clone)]
pub struct Parameters<K: Kernel> {
    pub kernel: K,
    pub solver: SolverConfig,
    pub representation: Representation,
    /// Number of classes the problem is supposed to contain
    pub expected_labels: Option<usize>,
}

impl<K: Kernel> Parameters<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            solver: SolverConfig::default(),
            representation: Representation::default(),
            expected_labels: None,
        }
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    pub fn with_expected_labels(mut self, expected_labels: usize) -> Self {
        self.expected_labels = Some(expected_labels);
        self
    }
}

/// A trained one-vs-one model
#[derive(Debug, Clone)]
pub struct Model<K: Kernel> {
    problem: Problem,
    params: Parameters<K>,
    dual: TrainedDual,
}

impl<K: Kernel> Model<K> {
    /// Train on `problem`
    ///
    /// Either returns a fully trained model or fails:
    /// * `TrainingError` if the parameters are rejected or a threshold comes
    ///   out non-finite;
    /// * `InconsistentModel` if the number of classes differs from
    ///   `params.expected_labels`.
    pub fn train(problem: Problem, params: Parameters<K>) -> Result<Self> {
        if let Some(message) = check_parameters(&params.solver) {
            return Err(SVMError::TrainingError(message));
        }
        params
            .kernel
            .validate()
            .map_err(|e| SVMError::TrainingError(e.to_string()))?;

        let dual = match params.representation {
            Representation::Raw => {
                train_one_vs_one(problem.samples(), &params.kernel, &params.solver)?
            }
            Representation::Precomputed => {
                let rows = problem.gram_rows(&params.kernel);
                train_one_vs_one(&rows, &PrecomputedKernel, &params.solver)?
            }
        };

        if let Some(rho) = dual.rho.iter().find(|rho| !rho.is_finite()) {
            return Err(SVMError::TrainingError(format!(
                "solver returned a non-finite threshold ({rho})"
            )));
        }
        if let Some(expected) = params.expected_labels {
            if dual.nr_class() != expected {
                return Err(SVMError::InconsistentModel {
                    expected,
                    actual: dual.nr_class(),
                });
            }
        }

        info!(
            "Trained {} kernel model on {} samples: {} classes, {} support vectors",
            params.kernel.name(),
            problem.len(),
            dual.nr_class(),
            dual.support_vectors.len()
        );

        Ok(Self {
            problem,
            params,
            dual,
        })
    }

    /// Predict the label of `input` by one-vs-one vote
    pub fn predict(&self, input: &SparseVector) -> Prediction {
        let (label, decision_values) = match self.params.representation {
            Representation::Raw => predict_values(&self.dual, &self.params.kernel, input),
            Representation::Precomputed => {
                let row = self.problem.kernelize(&self.params.kernel, input);
                predict_values(&self.dual, &PrecomputedKernel, &row)
            }
        };
        Prediction::new(label, decision_values)
    }

    pub fn predict_batch(&self, samples: &[Sample]) -> Vec<Prediction> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Fraction of samples whose label is predicted correctly
    pub fn evaluate<D: Dataset>(&self, dataset: &D) -> f64 {
        if dataset.is_empty() {
            return 0.0;
        }
        let correct = (0..dataset.len())
            .map(|i| dataset.get_sample(i))
            .filter(|s| self.predict(&s.features).label == s.label)
            .count();
        correct as f64 / dataset.len() as f64
    }

    /// View of the classifier between two labels, in either order
    pub fn classifier(&self, label_a: f64, label_b: f64) -> Result<ClassifierView<'_>> {
        let k1 = self.label_index(label_a)?;
        let k2 = self.label_index(label_b)?;
        self.classifier_at(k1, k2)
    }

    /// View of the classifier between two class indices, in either order
    pub fn classifier_at(&self, k1: usize, k2: usize) -> Result<ClassifierView<'_>> {
        ClassifierView::new(
            &self.dual,
            &self.problem,
            self.params.representation,
            k1,
            k2,
        )
    }

    /// All pairwise classifiers, pairs ordered (0,1), (0,2), ..., (1,2), ...
    pub fn classifiers(&self) -> Vec<ClassifierView<'_>> {
        let nr_class = self.nr_class();
        let mut views = Vec::with_capacity(self.dual.n_classifiers());
        for k1 in 0..nr_class {
            for k2 in (k1 + 1)..nr_class {
                views.push(ClassifierView::new(
                    &self.dual,
                    &self.problem,
                    self.params.representation,
                    k1,
                    k2,
                ));
            }
        }
        views.into_iter().flatten().collect()
    }

    /// The only classifier of a two-class model
    pub fn binary_classifier(&self) -> Result<ClassifierView<'_>> {
        if self.nr_class() != 2 {
            return Err(SVMError::InconsistentModel {
                expected: 2,
                actual: self.nr_class(),
            });
        }
        self.classifier_at(0, 1)
    }

    fn label_index(&self, label: f64) -> Result<usize> {
        self.dual
            .labels
            .iter()
            .position(|&l| l == label)
            .ok_or(SVMError::UnknownLabel(label))
    }

    /// Class labels in order of first appearance in the training data
    pub fn labels(&self) -> &[f64] {
        &self.dual.labels
    }

    /// Support-vector count per class
    pub fn n_sv(&self) -> &[usize] {
        &self.dual.n_sv
    }

    pub fn nr_class(&self) -> usize {
        self.dual.nr_class()
    }

    /// Thresholds, one per pairwise classifier
    pub fn rho(&self) -> &[f64] {
        &self.dual.rho
    }

    pub fn dim(&self) -> usize {
        self.problem.dim()
    }

    pub fn params(&self) -> &Parameters<K> {
        &self.params
    }

    pub fn kernel(&self) -> &K {
        &self.params.kernel
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn dual(&self) -> &TrainedDual {
        &self.dual
    }

    pub fn n_support_vectors(&self) -> usize {
        self.dual.support_vectors.len()
    }

    /// Training-set index of each support vector
    pub fn support_vector_indices(&self) -> &[usize] {
        &self.dual.sv_indices
    }
}

impl Model<PolynomialKernel> {
    /// Tensor introspector of the given order for the classifier between two
    /// labels
    pub fn introspector(
        &self,
        label_a: f64,
        label_b: f64,
        order: usize,
    ) -> Result<TensorIntrospector<'_>> {
        let view = self.classifier(label_a, label_b)?;
        TensorIntrospector::new(view, self.kernel(), order)
    }
}
