//! One-vs-one support vector machines with pairwise classifier views and
//! polynomial tensor introspection
//!
//! Training produces a dual model: weighted support vectors per pair of
//! classes. [`model::ClassifierView`] walks the decision function of one pair
//! as a sequence of `(coefficient, support vector)` items, and
//! [`introspect::TensorIntrospector`] turns a polynomial-kernel decision
//! function into the coefficients of its explicit expansion.

pub mod api;
pub mod cache;
pub mod combinatorics;
pub mod core;
pub mod data;
pub mod introspect;
pub mod kernel;
pub mod model;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::SVM;
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::combinatorics::{binomial, ipow};
pub use crate::core::error::{Result, SVMError};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::LibSVMDataset;
pub use crate::introspect::{DenseTensor, TensorIntrospector};
pub use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, PrecomputedKernel};
pub use crate::model::{ClassifierView, Cursor, Model, Parameters, Problem, SupportVector};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
