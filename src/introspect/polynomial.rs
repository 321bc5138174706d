//! Tensor expansion of polynomial-kernel classifiers
//!
//! With `K(s, x) = (γ⟨s, x⟩ + c)^d`, the binomial theorem gives
//!
//! ```text
//! K(s, x) = Σ_r C(d, r) γ^r c^(d-r) ⟨s, x⟩^r
//! ```
//!
//! and `⟨s, x⟩^r` expands into a sum over ordered index tuples
//! `(i_1, ..., i_r)` of `Π_k s[i_k] x[i_k]`. Collecting the terms of order `r`
//! of `f(x) = Σ_i coef_i K(sv_i, x)` yields a symmetric tensor
//!
//! ```text
//! T_r[i_1, ..., i_r] = C(d, r) γ^r c^(d-r) Σ_i coef_i Π_k sv_i[i_k]
//! ```
//!
//! so that `f(x) = Σ_r Σ_idx T_r[idx] Π_k x[idx_k]` (before subtracting the
//! threshold).

use crate::combinatorics::{binomial_f64, ipow, PowerBase};
use crate::core::{FeatureAccess, Result, SVMError};
use crate::kernel::PolynomialKernel;
use crate::model::ClassifierView;

/// Entries of the order-`r` tensor of one pairwise classifier
///
/// Each entry is computed on demand with a single pass over the classifier's
/// support vectors; nothing is cached between calls.
#[derive(Debug, Clone, Copy)]
pub struct TensorIntrospector<'a> {
    view: ClassifierView<'a>,
    order: usize,
    prefactor: f64,
}

impl<'a> TensorIntrospector<'a> {
    /// Prepare the order-`order` tensor of `view` under `kernel`
    ///
    /// Fails with `DomainError` if `order` exceeds the kernel degree, and
    /// with `RangeError` if the prefactor `C(d, r) γ^r c^(d-r)` overflows.
    pub fn new(view: ClassifierView<'a>, kernel: &PolynomialKernel, order: usize) -> Result<Self> {
        let degree = kernel.degree as usize;
        if order > degree {
            return Err(SVMError::DomainError(format!(
                "tensor order {order} exceeds kernel degree {degree}"
            )));
        }

        let multiplicity = binomial_f64(degree as u64, order as u64)?;
        let gamma_power = ipow(kernel.gamma, order)?;
        let coef0_power = ipow(kernel.coef0, degree - order)?;
        let prefactor = multiplicity
            .checked_product(gamma_power)
            .and_then(|product| product.checked_product(coef0_power))
            .ok_or_else(|| {
                SVMError::RangeError(format!(
                    "prefactor of the order-{order} tensor overflows (degree {degree})"
                ))
            })?;

        Ok(Self {
            view,
            order,
            prefactor,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// `C(d, r) γ^r c^(d-r)`
    pub fn prefactor(&self) -> f64 {
        self.prefactor
    }

    pub fn view(&self) -> &ClassifierView<'a> {
        &self.view
    }

    /// Entry `T_r[index]`; `index` must have exactly `order` elements
    pub fn tensor(&self, index: &[usize]) -> Result<f64> {
        if index.len() != self.order {
            return Err(SVMError::DomainError(format!(
                "order-{} tensor indexed with {} indices",
                self.order,
                index.len()
            )));
        }

        let sum: f64 = self
            .view
            .iter()
            .map(|(coef, sv)| coef * index.iter().map(|&i| sv.feature_at(i)).product::<f64>())
            .sum();

        Ok(self.prefactor * sum)
    }

    /// The whole tensor over the first `dim` features
    ///
    /// Holds `dim^order` entries; a size that does not fit in `usize` is a
    /// `RangeError`.
    pub fn materialize(&self, dim: usize) -> Result<DenseTensor> {
        let size = ipow(dim, self.order)?;
        let mut data = vec![0.0; size];

        for (coef, sv) in self.view.iter() {
            let features: Vec<f64> = (0..dim).map(|i| sv.feature_at(i)).collect();
            for (flat, entry) in data.iter_mut().enumerate() {
                let mut rest = flat;
                let mut term = coef;
                for _ in 0..self.order {
                    term *= features[rest % dim];
                    rest /= dim;
                }
                *entry += term;
            }
        }

        for entry in &mut data {
            *entry *= self.prefactor;
        }

        Ok(DenseTensor {
            order: self.order,
            dim,
            data,
        })
    }
}

/// A fully materialized tensor, stored in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTensor {
    order: usize,
    dim: usize,
    data: Vec<f64>,
}

impl DenseTensor {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Entry at `index`, `None` if the index has the wrong length or is out
    /// of bounds
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.order || index.iter().any(|&i| i >= self.dim) {
            return None;
        }
        let flat = index.iter().fold(0, |acc, &i| acc * self.dim + i);
        self.data.get(flat).copied()
    }

    /// `Σ_idx T[idx] Π_k x[idx_k]`
    pub fn contract<X: FeatureAccess + ?Sized>(&self, x: &X) -> f64 {
        self.data
            .iter()
            .enumerate()
            .map(|(flat, &entry)| {
                let mut rest = flat;
                let mut term = entry;
                for _ in 0..self.order {
                    term *= x.feature_at(rest % self.dim);
                    rest /= self.dim;
                }
                term
            })
            .sum()
    }
}
