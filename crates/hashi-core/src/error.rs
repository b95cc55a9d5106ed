use thiserror::Error;

/// Errors that can occur while building, training or querying a mapping.
#[derive(Debug, Error)]
pub enum HashiError {
    /// The training data is empty or unusable.
    #[error("invalid training data: {0}")]
    Data(String),

    /// Two things that must agree in size do not.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    Dimension {
        /// What was being checked (e.g. "source vector for 'mother'").
        context: String,
        /// The size that was required.
        expected: usize,
        /// The size that was found.
        actual: usize,
    },

    /// A ranking was requested before any mapping was trained.
    #[error("mapping has not been trained yet")]
    NotTrained,

    /// Candle tensor operation failed.
    #[error("tensor error: {0}")]
    Tensor(String),
}

impl HashiError {
    /// Shorthand for a [`HashiError::Dimension`] error.
    pub fn dimension(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Dimension {
            context: context.into(),
            expected,
            actual,
        }
    }
}

impl From<candle_core::Error> for HashiError {
    fn from(err: candle_core::Error) -> Self {
        Self::Tensor(err.to_string())
    }
}

/// Result type alias for Hashi operations.
pub type Result<T> = std::result::Result<T, HashiError>;
