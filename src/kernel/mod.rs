//! Kernel functions for SVM

pub mod linear;
pub mod polynomial;
pub mod precomputed;
pub mod traits;

pub use self::linear::*;
pub use self::polynomial::*;
pub use self::precomputed::*;
pub use self::traits::*;
