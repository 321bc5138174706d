//! Exact integer combinatorics used by the tensor introspector

pub mod binomial;
pub mod ipow;

pub use self::binomial::*;
pub use self::ipow::*;
