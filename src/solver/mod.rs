//! Training backend
//!
//! A binary SMO solver for the C-SVC dual, and the one-vs-one scheme that
//! combines binary solutions into a multi-class dual.

pub mod one_vs_one;
pub mod smo;

pub use self::one_vs_one::*;
pub use self::smo::*;
