use thiserror::Error;

/// Errors raised by the algebra and network layers.
///
/// Every variant is fatal to the operation that produced it: nothing is
/// retried and no partial result is written before the error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Operand ranks are incompatible on a contracted axis.
    #[error("dimension mismatch in {operation}: expected rank {expected}, got {actual}")]
    DimensionMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Container or cursor access beyond its declared bounds.
    #[error("index {index} is out of range for rank {rank}")]
    IndexOutOfRange { index: usize, rank: usize },

    /// Initializer size does not match the declared shape, or a view does
    /// not fit inside its base container.
    #[error("invalid construction: {0}")]
    InvalidConstruction(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn mismatch(operation: &'static str, expected: usize, actual: usize) -> Error {
        Error::DimensionMismatch {
            operation,
            expected,
            actual,
        }
    }

    pub(crate) fn out_of_range(index: usize, rank: usize) -> Error {
        Error::IndexOutOfRange { index, rank }
    }

    pub(crate) fn construction(reason: impl Into<String>) -> Error {
        Error::InvalidConstruction(reason.into())
    }
}
