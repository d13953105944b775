use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeizureError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown subject: no rows for test subject '{0}'")]
    UnknownSubject(String),

    #[error("Cannot balance classes: {0}")]
    EmptyClass(String),

    #[error("Feature '{0}' has zero variance in the training data")]
    ZeroVariance(String),

    #[error("Failed to read recording store: {0}")]
    StoreRead(String),

    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Model fitting failed: {0}")]
    ModelFit(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SeizureError>;
