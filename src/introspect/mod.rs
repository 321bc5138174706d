//! Explicit expansions of kernelized decision functions
//!
//! A pairwise classifier is stored in dual form, as weighted support
//! vectors. For polynomial kernels the same decision function can be written
//! as a finite sum of homogeneous multilinear forms; this module recovers
//! their coefficients.

pub mod polynomial;

pub use self::polynomial::*;
