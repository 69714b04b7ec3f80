//! Inference service over a frozen classifier
//!
//! The classifier lives in a [`ClassifierHandle`] that moves from
//! `Uninitialized` to `Ready` exactly once. After that it is shared
//! read-only by every request.

use crate::classifier::{load_classifier, Classifier, ClassifierBackend};
use crate::error::{PredictorError, Result};
use crate::models::{EncodedFeatureVector, HabitabilityLabel, PredictionResult};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Default probability cutoff used to cross-check the discrete label
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Lifecycle of the classifier slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Ready,
}

/// Load-once holder for the process-wide classifier
#[derive(Default)]
pub struct ClassifierHandle {
    classifier: OnceLock<Arc<dyn Classifier>>,
}

impl ClassifierHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that is already `Ready`
    pub fn ready(classifier: Arc<dyn Classifier>) -> Self {
        let handle = Self::new();
        // A fresh OnceLock is always empty.
        let _ = handle.classifier.set(classifier);
        handle
    }

    /// Install the classifier; a second install is rejected (no hot reload)
    pub fn install(&self, classifier: Arc<dyn Classifier>) -> Result<()> {
        self.classifier
            .set(classifier)
            .map_err(|_| PredictorError::inference("classifier already loaded; reloading is not supported"))
    }

    /// Load an artifact from disk and install it
    pub fn load(&self, path: &Path, expected_sha256: Option<&str>) -> Result<ClassifierBackend> {
        if self.state() == ServiceState::Ready {
            return Err(PredictorError::inference(
                "classifier already loaded; reloading is not supported",
            ));
        }
        let classifier: Arc<dyn Classifier> = Arc::from(load_classifier(path, expected_sha256)?);
        let backend = classifier.backend();
        self.install(classifier)?;
        Ok(backend)
    }

    pub fn state(&self) -> ServiceState {
        if self.classifier.get().is_some() {
            ServiceState::Ready
        } else {
            ServiceState::Uninitialized
        }
    }

    pub fn get(&self) -> Result<&Arc<dyn Classifier>> {
        self.classifier
            .get()
            .ok_or_else(|| PredictorError::inference("classifier not loaded"))
    }
}

/// Wraps the frozen classifier and turns its outputs into a prediction
pub struct InferenceService {
    handle: ClassifierHandle,
    decision_threshold: f64,
}

impl InferenceService {
    pub fn new(handle: ClassifierHandle) -> Self {
        Self {
            handle,
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
        }
    }

    pub fn from_classifier(classifier: Arc<dyn Classifier>) -> Self {
        Self::new(ClassifierHandle::ready(classifier))
    }

    /// Threshold used only to flag label/probability disagreement
    pub fn with_decision_threshold(mut self, threshold: f64) -> Self {
        self.decision_threshold = threshold;
        self
    }

    pub fn handle(&self) -> &ClassifierHandle {
        &self.handle
    }

    pub fn state(&self) -> ServiceState {
        self.handle.state()
    }

    pub fn decision_threshold(&self) -> f64 {
        self.decision_threshold
    }

    /// Run the classifier on one encoded vector
    ///
    /// The label comes from the classifier's discrete prediction and the
    /// probability from its probability output. Both are returned as given,
    /// even when they disagree under the decision threshold; callers check
    /// [`InferenceService::is_consistent`] to record the disagreement.
    pub fn classify(&self, vector: &EncodedFeatureVector) -> Result<PredictionResult> {
        let classifier = self.handle.get()?;
        let features = vector.as_slice();

        let class = classifier.predict_class(features)?;
        if class > 1 {
            return Err(PredictorError::inference(format!(
                "classifier returned unknown class {}",
                class
            )));
        }

        let probabilities = classifier.predict_probabilities(features)?;
        if probabilities
            .iter()
            .any(|p| !p.is_finite() || !(0.0..=1.0).contains(p))
        {
            return Err(PredictorError::inference(format!(
                "classifier returned invalid probabilities {:?}",
                probabilities
            )));
        }

        let result = PredictionResult {
            label: HabitabilityLabel::from_class(class),
            probability_habitable: probabilities[1],
        };

        debug!(
            label = %result.label,
            probability_habitable = result.probability_habitable,
            backend = %classifier.backend(),
            "Classification completed"
        );
        Ok(result)
    }

    /// Whether the label matches `probability >= threshold`
    pub fn is_consistent(&self, result: &PredictionResult) -> bool {
        let positive = result.probability_habitable >= self.decision_threshold;
        positive == (result.label == HabitabilityLabel::Habitable)
    }
}
