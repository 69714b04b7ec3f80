//! Error taxonomy for encoding, inference and artifact loading

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictorError>;

/// Errors surfaced by the prediction core
///
/// None of these carry a fallback value: a failed request produces no
/// prediction at all.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// Encoded column layout differs from the training-time schema
    #[error("feature schema mismatch: expected {expected:?}, got {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Classifier rejected the input or is not loaded
    #[error("inference failed: {0}")]
    Inference(String),

    /// Classifier artifact could not be loaded at startup
    #[error("failed to load classifier artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },
}

impl PredictorError {
    pub fn inference(reason: impl Into<String>) -> Self {
        Self::Inference(reason.into())
    }

    pub fn artifact_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable identifier used in metric labels and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::Inference(_) => "inference_error",
            Self::ArtifactLoad { .. } => "artifact_load_error",
        }
    }
}
