//! Error types for SVM training and introspection

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    /// A mathematical precondition does not hold (negative exponent on an
    /// integral base, tensor order above the kernel degree, ...).
    #[error("Domain error: {0}")]
    DomainError(String),

    /// A numeric result would not be representable in its type.
    #[error("Range error: {0}")]
    RangeError(String),

    /// The solver rejected the parameters or produced a degenerate model.
    #[error("Training failed: {0}")]
    TrainingError(String),

    #[error("Inconsistent model: expected {expected} labels, solver reported {actual}")]
    InconsistentModel { expected: usize, actual: usize },

    #[error("Unknown label: {0}")]
    UnknownLabel(f64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid label: {0}")]
    InvalidLabel(f64),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SVMError>;
