//! Sequential Minimal Optimization (SMO) solver implementation
//!
//! Solves the binary C-SVC dual by repeatedly optimizing the pair of
//! Lagrange multipliers that violates the KKT conditions the most.

use crate::cache::KernelCache;
use crate::core::{OptimizationResult, Result, SVMError, Sample, SolverConfig};
use crate::kernel::Kernel;
use log::{debug, warn};

/// Lower bound for the curvature along the pair direction
const TAU: f64 = 1e-12;

/// SMO solver for the binary SVM dual
///
/// Works on an error cache `E_t = f(x_t) - y_t`, where `f` is the decision
/// function without its threshold. With `G` the gradient of the dual
/// objective, `E_t = y_t G_t`.
pub struct SMOSolver<'k, K: Kernel> {
    kernel: &'k K,
    config: SolverConfig,
}

impl<'k, K: Kernel> SMOSolver<'k, K> {
    /// Create a new SMO solver with the given kernel and configuration
    pub fn new(kernel: &'k K, config: SolverConfig) -> Self {
        Self { kernel, config }
    }

    /// Compute kernel value with caching
    fn kernel_cached(
        &self,
        cache: &mut KernelCache,
        samples: &[Sample],
        i: usize,
        j: usize,
    ) -> f64 {
        cache.get_or_compute(i, j, || {
            self.kernel
                .compute(&samples[i].features, &samples[j].features)
        })
    }

    /// Solve the SVM optimization problem
    ///
    /// Labels must be exactly +1 or -1.
    pub fn solve(&self, samples: &[Sample]) -> Result<OptimizationResult> {
        if samples.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        for sample in samples {
            if sample.label != 1.0 && sample.label != -1.0 {
                return Err(SVMError::InvalidLabel(sample.label));
            }
        }

        let n = samples.len();
        let mut cache = KernelCache::with_memory_limit(self.config.cache_size);
        let mut alpha = vec![0.0; n];

        // All alphas start at zero, so f(x_t) = 0 and E_t = -y_t
        let mut error_cache: Vec<f64> = samples.iter().map(|s| -s.label).collect();

        let mut iterations = 0;
        while iterations < self.config.max_iterations {
            let Some((i, j)) = self.select_working_set(samples, &alpha, &error_cache) else {
                break;
            };

            if !self.take_step(i, j, samples, &mut alpha, &mut error_cache, &mut cache) {
                debug!("pair ({i}, {j}) admits no further progress");
                break;
            }
            iterations += 1;
        }

        if iterations == self.config.max_iterations {
            warn!(
                "SMO stopped after reaching max_iterations = {}",
                self.config.max_iterations
            );
        }

        let rho = self.calculate_rho(&alpha, &error_cache, samples);

        let support_vectors: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| if a > 0.0 { Some(i) } else { None })
            .collect();

        let objective_value = self.calculate_objective(&alpha, samples, &support_vectors, &mut cache);

        debug!(
            "SMO finished: {} iterations, {} support vectors, cache hit rate {:.2}",
            iterations,
            support_vectors.len(),
            cache.hit_rate()
        );

        Ok(OptimizationResult {
            alpha,
            rho,
            support_vectors,
            iterations,
            objective_value,
        })
    }

    /// Select the maximal violating pair
    ///
    /// `i` maximizes `-E_t` over the variables that may move up along
    /// `y_t`, `j` minimizes it over those that may move down. Returns `None`
    /// once the gap between the two is below epsilon.
    fn select_working_set(
        &self,
        samples: &[Sample],
        alpha: &[f64],
        error_cache: &[f64],
    ) -> Option<(usize, usize)> {
        let c = self.config.c;
        let mut g_max = f64::NEG_INFINITY;
        let mut g_min = f64::INFINITY;
        let mut best_i = None;
        let mut best_j = None;

        for (t, sample) in samples.iter().enumerate() {
            let positive = sample.label > 0.0;
            let a = alpha[t];
            let minus_e = -error_cache[t];

            let in_up = (positive && a < c) || (!positive && a > 0.0);
            let in_low = (positive && a > 0.0) || (!positive && a < c);

            if in_up && minus_e > g_max {
                g_max = minus_e;
                best_i = Some(t);
            }
            if in_low && minus_e < g_min {
                g_min = minus_e;
                best_j = Some(t);
            }
        }

        match (best_i, best_j) {
            (Some(i), Some(j)) if g_max - g_min >= self.config.epsilon => Some((i, j)),
            _ => None,
        }
    }

    /// Perform the analytic optimization step for variables i and j
    fn take_step(
        &self,
        i: usize,
        j: usize,
        samples: &[Sample],
        alpha: &mut [f64],
        error_cache: &mut [f64],
        cache: &mut KernelCache,
    ) -> bool {
        if i == j {
            return false;
        }

        let c = self.config.c;
        let y_i = samples[i].label;
        let y_j = samples[j].label;
        let alpha_i_old = alpha[i];
        let alpha_j_old = alpha[j];
        let e_i = error_cache[i];
        let e_j = error_cache[j];

        let s = y_i * y_j;

        // Feasible segment for alpha_j on the line y_i a_i + y_j a_j = const
        let (low, high) = if y_i != y_j {
            let diff = alpha_j_old - alpha_i_old;
            (0.0_f64.max(diff), c.min(c + diff))
        } else {
            let sum = alpha_i_old + alpha_j_old;
            (0.0_f64.max(sum - c), c.min(sum))
        };

        if low >= high {
            return false;
        }

        let k_ii = self.kernel_cached(cache, samples, i, i);
        let k_ij = self.kernel_cached(cache, samples, i, j);
        let k_jj = self.kernel_cached(cache, samples, j, j);

        let eta = (k_ii + k_jj - 2.0 * k_ij).max(TAU);

        let alpha_j_new = (alpha_j_old + y_j * (e_i - e_j) / eta).clamp(low, high);
        let alpha_i_new = (alpha_i_old + s * (alpha_j_old - alpha_j_new)).clamp(0.0, c);

        if alpha_j_new == alpha_j_old && alpha_i_new == alpha_i_old {
            return false;
        }

        alpha[i] = alpha_i_new;
        alpha[j] = alpha_j_new;

        let delta_i = y_i * (alpha_i_new - alpha_i_old);
        let delta_j = y_j * (alpha_j_new - alpha_j_old);

        for k in 0..samples.len() {
            let k_ik = self.kernel_cached(cache, samples, i, k);
            let k_jk = self.kernel_cached(cache, samples, j, k);
            error_cache[k] += delta_i * k_ik + delta_j * k_jk;
        }

        true
    }

    /// Threshold of the decision function
    ///
    /// Mean of `E_t` over free variables; without free variables, the
    /// midpoint of the interval left open by the bounded ones.
    fn calculate_rho(&self, alpha: &[f64], error_cache: &[f64], samples: &[Sample]) -> f64 {
        let c = self.config.c;
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut n_free = 0;

        for (t, sample) in samples.iter().enumerate() {
            let e = error_cache[t];
            let positive = sample.label > 0.0;

            if alpha[t] >= c {
                if positive {
                    lower = lower.max(e);
                } else {
                    upper = upper.min(e);
                }
            } else if alpha[t] <= 0.0 {
                if positive {
                    upper = upper.min(e);
                } else {
                    lower = lower.max(e);
                }
            } else {
                n_free += 1;
                sum += e;
            }
        }

        if n_free > 0 {
            sum / n_free as f64
        } else {
            (upper + lower) / 2.0
        }
    }

    /// Dual objective: sum(alpha) - 1/2 sum_ij alpha_i alpha_j y_i y_j K_ij
    fn calculate_objective(
        &self,
        alpha: &[f64],
        samples: &[Sample],
        support_vectors: &[usize],
        cache: &mut KernelCache,
    ) -> f64 {
        let mut obj: f64 = support_vectors.iter().map(|&i| alpha[i]).sum();

        for &i in support_vectors {
            for &j in support_vectors {
                let k_ij = self.kernel_cached(cache, samples, i, j);
                obj -= 0.5 * alpha[i] * alpha[j] * samples[i].label * samples[j].label * k_ij;
            }
        }

        obj
    }
}
