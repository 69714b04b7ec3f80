//! Frozen binary classifier backends
//!
//! A classifier is loaded once at startup and is read-only afterwards. It
//! exposes the discrete class and the class-probability pair as two
//! separate operations; callers take both verbatim.

mod linear;
mod onnx;

pub use linear::{LogisticRegressionArtifact, LogisticRegressionClassifier};
pub use onnx::OnnxClassifier;

use crate::error::{PredictorError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Trait for frozen classifier implementations
pub trait Classifier: Send + Sync {
    /// Discrete predicted class, 0 or 1
    fn predict_class(&self, features: &[f64]) -> Result<u8>;

    /// `[P(class=0), P(class=1)]`
    fn predict_probabilities(&self, features: &[f64]) -> Result<[f64; 2]>;

    /// Backend that produced this classifier
    fn backend(&self) -> ClassifierBackend;
}

/// Supported artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    LogisticRegression,
    Onnx,
}

impl ClassifierBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierBackend::LogisticRegression => "logistic_regression",
            ClassifierBackend::Onnx => "onnx",
        }
    }

    /// Pick the backend from the artifact file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ClassifierBackend::LogisticRegression),
            "onnx" => Some(ClassifierBackend::Onnx),
            _ => None,
        }
    }
}

impl fmt::Display for ClassifierBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load a classifier artifact from disk
///
/// Every failure (missing, unreadable, corrupt, wrong schema, checksum
/// mismatch, unknown format) is reported as `ArtifactLoad`.
pub fn load_classifier(path: &Path, expected_sha256: Option<&str>) -> Result<Box<dyn Classifier>> {
    let backend = ClassifierBackend::from_path(path).ok_or_else(|| {
        PredictorError::artifact_load(path, "unsupported artifact format (expected .json or .onnx)")
    })?;

    let bytes = std::fs::read(path)
        .map_err(|e| PredictorError::artifact_load(path, format!("failed to read artifact: {}", e)))?;

    let checksum = hex::encode(Sha256::digest(&bytes));
    if let Some(expected) = expected_sha256 {
        if !checksum.eq_ignore_ascii_case(expected.trim()) {
            return Err(PredictorError::artifact_load(
                path,
                format!("checksum mismatch: expected {}, got {}", expected.trim(), checksum),
            ));
        }
        debug!(checksum = %checksum, "Artifact checksum verified");
    }

    let classifier: Box<dyn Classifier> = match backend {
        ClassifierBackend::LogisticRegression => Box::new(
            LogisticRegressionClassifier::from_json(&bytes)
                .map_err(|reason| PredictorError::artifact_load(path, reason))?,
        ),
        ClassifierBackend::Onnx => Box::new(
            OnnxClassifier::from_bytes(&bytes)
                .map_err(|reason| PredictorError::artifact_load(path, reason))?,
        ),
    };

    info!(
        path = %path.display(),
        backend = %backend,
        size_bytes = bytes.len(),
        checksum = %checksum,
        "Classifier artifact loaded"
    );
    Ok(classifier)
}

/// Reject inputs that do not match the training arity
pub(crate) fn check_arity(features: &[f64]) -> Result<()> {
    if features.len() != crate::encoder::FEATURE_COUNT {
        return Err(PredictorError::inference(format!(
            "expected {} features, got {}",
            crate::encoder::FEATURE_COUNT,
            features.len()
        )));
    }
    Ok(())
}
