//! Data loading
//!
//! Readers that turn text formats into [`crate::core::Sample`]s.

pub mod libsvm;

pub use self::libsvm::*;
