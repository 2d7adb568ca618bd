use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    /// A vector's length disagrees with the layer or network dimension it was given to.
    #[error("shape mismatch in {context}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// Training hyperparameters or the sample set are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> NetError {
        NetError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_len(context: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetError::shape(context, expected, actual))
    }
}
