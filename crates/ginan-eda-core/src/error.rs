//! Error type shared by every computation in the crate.

use thiserror::Error;

/// Result alias used throughout `ginan-eda-core`.
pub type Result<T> = std::result::Result<T, EdaError>;

#[derive(Error, Debug)]
pub enum EdaError {
    #[error("empty sample in {context}")]
    EmptySample { context: &'static str },
    #[error("sample has zero variance; cannot standardize")]
    ZeroVariance,
    #[error("sample size {requested} out of range (1..={available})")]
    SampleSizeOutOfRange { requested: usize, available: usize },
    #[error("non-finite value {value} at index {index}")]
    NonFiniteValue { index: usize, value: f64 },
    #[error("length mismatch: x has {x} points, y has {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("insufficient data: need {required} points, got {got}")]
    InsufficientData { required: usize, got: usize },
    #[error("polynomial design matrix is rank deficient")]
    SingularFit,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Make sure a value for all the selections is provided (missing {0})")]
    IncompleteSelection(&'static str),
    #[error("unknown state: {0}")]
    UnknownState(String),
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}
