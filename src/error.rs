//! Error types for the zone-demand library.

use thiserror::Error;

/// Result type alias for demand prediction operations.
pub type Result<T> = std::result::Result<T, DemandError>;

/// Errors that can occur while loading artifacts or predicting demand.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemandError {
    /// A model, corrector or scaler artifact is missing or unreadable.
    #[error("failed to load {artifact}: {reason}")]
    ArtifactLoad { artifact: String, reason: String },

    /// No usable history exists for a zone; callers see the synthetic fallback instead.
    #[error("historical data unavailable: {0}")]
    HistoricalDataUnavailable(String),

    /// Input timestamp does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp '{input}': {reason}")]
    TimestampFormat { input: String, reason: String },

    /// Model input has the wrong shape.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Inference or denormalization failed.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DemandError {
    pub(crate) fn artifact(artifact: impl Into<String>, reason: impl ToString) -> Self {
        DemandError::ArtifactLoad {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }
}
